use serde::{Deserialize, Deserializer, Serialize};

use super::role::Role;

fn default_role() -> Role {
    Role::Admin
}

// An empty or null role in an update leaves the row's role as it is.
fn non_empty_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|r| !r.is_empty()).map(|r| Role::from_token(&r)))
}

/// A staff account as returned by `POST /staff/usr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, fullname: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            fullname: fullname.into(),
            role,
        }
    }
}

/// Partial record returned by `PUT /staff/usr/{username}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "non_empty_role")]
    pub role: Option<Role>,
}

/// A row of the server-rendered listing the table starts from.
///
/// Roles here come from page markup or operator files, so labels and bare
/// names are accepted next to wire tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRow {
    pub username: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub role: String,
}

impl From<SeedRow> for UserRecord {
    fn from(row: SeedRow) -> Self {
        let role = Role::parse(&row.role).unwrap_or(Role::Admin);
        UserRecord {
            username: row.username,
            fullname: row.fullname,
            role,
        }
    }
}

/// Parse a JSON array of seed rows.
pub fn parse_seed_rows(text: &str) -> Result<Vec<UserRecord>, serde_json::Error> {
    let rows: Vec<SeedRow> = serde_json::from_str(text)?;
    Ok(rows.into_iter().map(UserRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_record_decodes_wire_role() {
        let rec: UserRecord = serde_json::from_str(
            r#"{"username":"kim","fullname":"Kim Lee","role":":role/reporter"}"#,
        )
        .unwrap();
        assert_eq!(rec, UserRecord::new("kim", "Kim Lee", Role::Reporter));
    }

    #[test]
    fn missing_role_is_admin() {
        let rec: UserRecord = serde_json::from_str(r#"{"username":"kim"}"#).unwrap();
        assert_eq!(rec.role, Role::Admin);
        assert_eq!(rec.fullname, "");
    }

    #[test]
    fn update_is_partial() {
        let upd: UserUpdate =
            serde_json::from_str(r#"{"username":"kim","fullname":"Jane Doe"}"#).unwrap();
        assert_eq!(upd.fullname.as_deref(), Some("Jane Doe"));
        assert_eq!(upd.role, None);
    }

    #[test]
    fn empty_update_role_is_absent() {
        let upd: UserUpdate =
            serde_json::from_str(r#"{"username":"kim","fullname":"Jane Doe","role":""}"#).unwrap();
        assert_eq!(upd.role, None);
        let upd: UserUpdate = serde_json::from_str(r#"{"role":null}"#).unwrap();
        assert_eq!(upd.role, None);
        let upd: UserUpdate = serde_json::from_str(r#"{"role":":role/odd"}"#).unwrap();
        assert_eq!(upd.role, Some(Role::Admin));
    }

    #[test]
    fn seed_rows_accept_labels() {
        let rows = parse_seed_rows(
            r#"[{"username":"a","fullname":"A","role":"Reporter"},
                {"username":"b","fullname":"B","role":":role/user"},
                {"username":"c","role":"Owner"}]"#,
        )
        .unwrap();
        let roles: Vec<Role> = rows.iter().map(|r| r.role).collect();
        assert_eq!(roles, vec![Role::Reporter, Role::User, Role::Admin]);
    }
}

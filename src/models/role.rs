use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Permission class of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Reporter,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Reporter, Role::Admin];

    /// Decode a wire token.
    ///
    /// Only `:role/user` and `:role/reporter` are recognized; every other
    /// token is admin-equivalent.
    ///
    /// ```
    /// use staffusr::models::Role;
    ///
    /// assert_eq!(Role::from_token(":role/reporter"), Role::Reporter);
    /// assert_eq!(Role::from_token(":role/superuser"), Role::Admin);
    /// ```
    pub fn from_token(token: &str) -> Self {
        match token {
            ":role/user" => Role::User,
            ":role/reporter" => Role::Reporter,
            _ => Role::Admin,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Role::User => ":role/user",
            Role::Reporter => ":role/reporter",
            Role::Admin => ":role/admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Reporter => "Reporter",
            Role::Admin => "Admin",
        }
    }

    /// Parse operator input: a wire token, a bare name or a label.
    pub fn parse(input: &str) -> Option<Self> {
        let t = input.trim();
        if t.starts_with(":role/") {
            return Some(Self::from_token(t));
        }
        match t.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "reporter" => Some(Role::Reporter),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_token(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_map_to_labels() {
        assert_eq!(Role::from_token(":role/user").label(), "User");
        assert_eq!(Role::from_token(":role/reporter").label(), "Reporter");
        assert_eq!(Role::from_token(":role/admin").label(), "Admin");
    }

    #[test]
    fn unknown_token_falls_back_to_admin() {
        assert_eq!(Role::from_token(""), Role::Admin);
        assert_eq!(Role::from_token("user"), Role::Admin);
        assert_eq!(Role::from_token(":role/owner"), Role::Admin);
    }

    #[test]
    fn parse_accepts_names_and_labels() {
        assert_eq!(Role::parse("Reporter"), Some(Role::Reporter));
        assert_eq!(Role::parse(" user "), Some(Role::User));
        assert_eq!(Role::parse(":role/user"), Some(Role::User));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let json = serde_json::to_string(&Role::Reporter).unwrap();
        assert_eq!(json, "\":role/reporter\"");
        let back: Role = serde_json::from_str("\":role/whatever\"").unwrap();
        assert_eq!(back, Role::Admin);
        let bare: Role = serde_json::from_str("\"reporter\"").unwrap();
        assert_eq!(bare, Role::Admin);
    }
}

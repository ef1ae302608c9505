use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};

use crate::models::{Role, UserRecord};

/// Display switches of the user table. All off for the staff panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub paginate: bool,
    pub ordering: bool,
    /// Show the "N users" summary under the table
    pub info: bool,
}

/// Row identifier of a username, e.g. `row_kim`.
pub fn row_id(username: &str) -> String {
    format!("row_{}", username)
}

/// The users shown on the panel, in display order, one row per username.
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    rows: Vec<UserRecord>,
    options: TableOptions,
}

impl UserTable {
    pub fn new(options: TableOptions) -> Self {
        Self {
            rows: Vec::new(),
            options,
        }
    }

    /// Build the table from server-provided rows. A repeated username
    /// overwrites the earlier row in place.
    pub fn from_rows(rows: impl IntoIterator<Item = UserRecord>, options: TableOptions) -> Self {
        let mut table = Self::new(options);
        for row in rows {
            table.add_row(row);
        }
        table
    }

    pub fn options(&self) -> TableOptions {
        self.options
    }

    pub fn rows(&self) -> &[UserRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.username == username)
    }

    pub fn row(&self, username: &str) -> Option<&UserRecord> {
        self.position(username).map(|i| &self.rows[i])
    }

    pub fn contains(&self, username: &str) -> bool {
        self.position(username).is_some()
    }

    /// Append a row, or replace the existing row of the same username.
    /// Returns true when a row was replaced.
    pub fn add_row(&mut self, record: UserRecord) -> bool {
        match self.position(&record.username) {
            Some(i) => {
                self.rows[i] = record;
                true
            }
            None => {
                self.rows.push(record);
                false
            }
        }
    }

    pub fn set_fullname(&mut self, username: &str, fullname: &str) -> bool {
        match self.position(username) {
            Some(i) => {
                self.rows[i].fullname = fullname.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_role(&mut self, username: &str, role: Role) -> bool {
        match self.position(username) {
            Some(i) => {
                self.rows[i].role = role;
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, username: &str) -> Option<UserRecord> {
        self.position(username).map(|i| self.rows.remove(i))
    }

    pub fn summary(&self) -> Option<String> {
        if !self.options.info {
            return None;
        }
        Some(match self.rows.len() {
            1 => "Showing 1 user".to_string(),
            n => format!("Showing {} users", n),
        })
    }

    /// Boxed terminal rendering, in row order.
    pub fn render_terminal(&self) -> String {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some((Width(w), _)) = terminal_size() {
            table.set_width(w.saturating_sub(4));
        }
        table.set_header(vec!["Username", "Full name", "Role"]);
        for r in &self.rows {
            table.add_row(vec![r.username.as_str(), r.fullname.as_str(), r.role.label()]);
        }
        match self.summary() {
            Some(summary) => format!("{table}\n{summary}"),
            None => table.to_string(),
        }
    }
}

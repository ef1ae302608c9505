use serde::Serialize;
use std::collections::BTreeMap;

use super::role::Role;

/// Named form inputs, serialized as one flat JSON object of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set the field only when a value was given.
    pub fn set_opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.set(name, v);
        }
        self
    }

    /// Apply a `name=value` assignment. Returns false when there is no `=`.
    pub fn assign(&mut self, assignment: &str) -> bool {
        match assignment.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                self.set(name.trim(), value);
                true
            }
            _ => false,
        }
    }

    /// Apply several assignments, stopping at the first malformed one.
    pub fn assign_all<'a>(&mut self, assignments: impl IntoIterator<Item = &'a str>) -> Result<(), String> {
        for a in assignments {
            if !self.assign(a) {
                return Err(format!("expected name=value, got '{}'", a));
            }
        }
        Ok(())
    }

    /// Rewrite a `role` typed as a name or label (`reporter`, `Admin`) into
    /// its wire token. Tokens and unknown names are sent as typed.
    pub fn normalize_role(&mut self) -> &mut Self {
        let token = self
            .get("role")
            .filter(|r| !r.starts_with(':'))
            .and_then(Role::parse)
            .map(|r| r.token());
        if let Some(token) = token {
            self.set("role", token);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Clear every input, like resetting the form.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Drop every field left blank.
    pub fn without_blank(mut self) -> Self {
        self.0.retain(|_, v| !v.is_empty());
        self
    }

    /// Build the `PUT` payload of an edit: the target username is attached,
    /// blank fields are dropped, and nothing is produced without a username.
    pub fn into_update_payload(mut self, username: Option<&str>) -> Option<Self> {
        match username {
            Some(u) => {
                self.set("username", u);
            }
            None => {
                self.remove("username");
            }
        }
        let payload = self.without_blank();
        payload.get("username").is_some().then_some(payload)
    }
}

//! The user table controller.
//!
//! Owns everything a staff panel session shows: the table, the create form,
//! the delete confirmation, the edit dialog and the banners. Each flow sends
//! one request through a [`UserApi`] and touches the table only once the
//! server has confirmed the change.
//!
//! Dialog actions read the dialog's current target when they run, so opening
//! a dialog any number of times still leaves exactly one confirm action and
//! one save action.

use crate::api::UserApi;
use crate::error::ApiError;
use crate::models::{FormFields, UserRecord, UserUpdate};
use crate::notify::{Banners, Notification, Placement};
use crate::table::{TableOptions, UserTable};

pub const UNKNOWN_REASON: &str = "Unknown reason.";

/// The delete confirmation dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteDialog {
    pub visible: bool,
    /// Username the confirm button acts on
    pub target: Option<String>,
}

/// The edit dialog of one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDialog {
    pub open: bool,
    /// Hidden reference to the user being edited
    pub target: Option<String>,
    pub form: FormFields,
}

/// Result of saving the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// No username to edit, nothing was sent
    NotSent,
    /// The server accepted the change; the dialog is closed
    Saved(UserUpdate),
    /// The server refused; the dialog stays open with this banner
    Failed(Notification),
}

pub struct UserTableController<A: UserApi> {
    api: A,
    table: UserTable,
    banners: Banners,
    create_form: FormFields,
    delete_dialog: DeleteDialog,
    edit_dialog: EditDialog,
}

impl<A: UserApi> UserTableController<A> {
    /// Start a session over the server-provided rows.
    pub fn new(api: A, rows: Vec<UserRecord>) -> Self {
        Self::with_options(api, rows, TableOptions::default())
    }

    pub fn with_options(api: A, rows: Vec<UserRecord>, options: TableOptions) -> Self {
        let table = UserTable::from_rows(rows, options);
        tracing::info!(rows = table.len(), "user table initialized");
        Self {
            api,
            table,
            banners: Banners::default(),
            create_form: FormFields::new(),
            delete_dialog: DeleteDialog::default(),
            edit_dialog: EditDialog::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn table(&self) -> &UserTable {
        &self.table
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn take_banners(&mut self) -> Vec<Notification> {
        self.banners.take()
    }

    pub fn create_form(&self) -> &FormFields {
        &self.create_form
    }

    pub fn create_form_mut(&mut self) -> &mut FormFields {
        &mut self.create_form
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.delete_dialog
    }

    pub fn edit_dialog(&self) -> &EditDialog {
        &self.edit_dialog
    }

    pub fn edit_form_mut(&mut self) -> &mut FormFields {
        &mut self.edit_dialog.form
    }

    fn notify(&mut self, notification: Notification) -> Notification {
        self.banners.push(notification.clone());
        notification
    }

    // Delete flow

    /// Show the confirmation for the row of `username`.
    pub fn open_delete_dialog(&mut self, username: &str) {
        self.delete_dialog = DeleteDialog {
            visible: true,
            target: Some(username.to_string()),
        };
    }

    pub fn cancel_delete(&mut self) {
        self.delete_dialog = DeleteDialog::default();
    }

    /// Confirm the pending delete. Returns `None` when no delete was pending.
    pub async fn confirm_delete(&mut self) -> Option<Notification> {
        let username = self.delete_dialog.target.take()?;
        let result = self.api.delete_user(&username).await;
        let notification = match result {
            Ok(()) => {
                self.table.remove_row(&username);
                tracing::info!(%username, "user deleted");
                Notification::success(Placement::Table, format!("{} deleted", username))
            }
            Err(e) => {
                tracing::warn!(%username, error = %e, "delete failed");
                Notification::error(Placement::Table, delete_failure_message(&username, &e))
            }
        };
        self.delete_dialog.visible = false;
        Some(self.notify(notification))
    }

    // Create flow

    /// Submit the create form.
    pub async fn submit_create(&mut self) -> Notification {
        let form = std::mem::take(&mut self.create_form);
        match self.api.create_user(&form).await {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "user created");
                let notification =
                    Notification::success(Placement::CreateForm, format!("Added user {}", user.username));
                if self.table.add_row(user) {
                    tracing::debug!("created user replaced an existing row");
                }
                self.notify(notification)
            }
            Err(e) => {
                tracing::warn!(error = %e, "create failed");
                let message = e
                    .server_error()
                    .or_else(|| e.body_text())
                    .unwrap_or(UNKNOWN_REASON)
                    .to_string();
                self.notify(Notification::error(Placement::CreateForm, message))
            }
        }
    }

    // Edit flow

    /// Open the edit dialog for `username` with an empty form.
    pub fn open_edit_dialog(&mut self, username: &str) {
        if !self.table.contains(username) {
            tracing::debug!(%username, "editing a user without a visible row");
        }
        self.edit_dialog = EditDialog {
            open: true,
            target: Some(username.to_string()),
            form: FormFields::new(),
        };
    }

    /// Save the edit dialog. Blank fields are left out of the request.
    pub async fn save_edit(&mut self) -> EditOutcome {
        let payload = self
            .edit_dialog
            .form
            .clone()
            .into_update_payload(self.edit_dialog.target.as_deref());
        let Some(payload) = payload else {
            return EditOutcome::NotSent;
        };
        let username = payload.get("username").unwrap_or_default().to_string();

        match self.api.update_user(&username, &payload).await {
            Ok(update) => {
                let row = update.username.clone().unwrap_or_else(|| username.clone());
                if let Some(fullname) = update.fullname.as_deref().filter(|f| !f.is_empty()) {
                    self.table.set_fullname(&row, fullname);
                }
                if let Some(role) = update.role {
                    self.table.set_role(&row, role);
                }
                tracing::info!(username = %row, "user updated");
                self.close_edit_dialog();
                EditOutcome::Saved(update)
            }
            Err(e) => {
                tracing::warn!(%username, error = %e, "update failed");
                let notification = self.notify(Notification::error(Placement::EditForm, edit_failure_message(&e)));
                EditOutcome::Failed(notification)
            }
        }
    }

    /// Close the edit dialog, dropping its target, form and banners.
    pub fn close_edit_dialog(&mut self) {
        self.edit_dialog = EditDialog::default();
        self.banners.dismiss(Placement::EditForm);
    }
}

/// Banner text of a failed delete.
pub fn delete_failure_message(username: &str, error: &ApiError) -> String {
    match error.status() {
        Some(404) => format!("{} doesn't exist", username),
        Some(403) => "Don't delete yourself".to_string(),
        _ => format!("Failed to delete {}", username),
    }
}

/// Banner text of a failed edit.
pub fn edit_failure_message(error: &ApiError) -> String {
    match (error.server_error(), error.body_text()) {
        (Some(msg), _) => format!("Failure: {}", msg),
        (None, Some(body)) => format!("Failure: {}", body),
        (None, None) => UNKNOWN_REASON.to_string(),
    }
}

use askama::Template;

use crate::config::PanelConfig;
use crate::controller::{DeleteDialog, EditDialog};
use crate::models::{Role, UserRecord};
use crate::notify::{Banners, Notification, NotificationKind, Placement};
use crate::table::{row_id, UserTable};

#[derive(Template)]
#[template(path = "alert.html")]
pub struct AlertTemplate<'a> {
    /// Bootstrap level: `success` or `danger`
    pub level: &'a str,
    pub message: &'a str,
}

impl<'a> AlertTemplate<'a> {
    pub fn for_notification(notification: &'a Notification) -> Self {
        let level = match notification.kind {
            NotificationKind::Success => "success",
            NotificationKind::Error => "danger",
        };
        Self {
            level,
            message: &notification.message,
        }
    }
}

#[derive(Template)]
#[template(path = "user_row.html")]
pub struct UserRowTemplate<'a> {
    pub row_id: String,
    pub username: &'a str,
    pub fullname: &'a str,
    pub role: &'a str,
    pub edit_url: String,
}

impl<'a> UserRowTemplate<'a> {
    pub fn for_record(record: &'a UserRecord, config: &PanelConfig) -> Self {
        Self {
            row_id: row_id(&record.username),
            username: &record.username,
            fullname: &record.fullname,
            role: record.role.label(),
            edit_url: config.user_url(&record.username),
        }
    }
}

#[derive(Template)]
#[template(path = "panel.html")]
pub struct PanelTemplate<'a> {
    pub users_url: String,
    pub roles: Vec<(&'static str, &'static str)>,
    pub create_alerts: Vec<String>,
    pub table_alerts: Vec<String>,
    pub edit_alerts: Vec<String>,
    pub rows: Vec<String>,
    pub summary: Option<String>,
    pub delete_visible: bool,
    pub delete_target: &'a str,
    pub edit_open: bool,
    pub edit_target: &'a str,
}

fn render_alerts(banners: &Banners, placement: Placement) -> askama::Result<Vec<String>> {
    banners
        .at(placement)
        .map(|n| AlertTemplate::for_notification(n).render())
        .collect()
}

/// Render the whole panel page: banners, the table and both dialogs.
pub fn render_panel(
    table: &UserTable,
    banners: &Banners,
    delete_dialog: &DeleteDialog,
    edit_dialog: &EditDialog,
    config: &PanelConfig,
) -> askama::Result<String> {
    let rows = table
        .rows()
        .iter()
        .map(|r| UserRowTemplate::for_record(r, config).render())
        .collect::<askama::Result<Vec<String>>>()?;
    PanelTemplate {
        users_url: config.users_url(),
        roles: Role::ALL.iter().map(|r| (r.token(), r.label())).collect(),
        create_alerts: render_alerts(banners, Placement::CreateForm)?,
        table_alerts: render_alerts(banners, Placement::Table)?,
        edit_alerts: render_alerts(banners, Placement::EditForm)?,
        rows,
        summary: table.summary(),
        delete_visible: delete_dialog.visible,
        delete_target: delete_dialog.target.as_deref().unwrap_or(""),
        edit_open: edit_dialog.open,
        edit_target: edit_dialog.target.as_deref().unwrap_or(""),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableOptions;

    #[test]
    fn alert_escapes_message() {
        let n = Notification::error(Placement::Table, "<b>kim</b> doesn't exist");
        let html = AlertTemplate::for_notification(&n).render().unwrap();
        assert!(html.contains("alert-danger alert-dismissable"));
        assert!(html.contains("&lt;b&gt;kim&lt;/b&gt;"));
    }

    #[test]
    fn row_carries_identifier_and_cells() {
        let rec = UserRecord::new("kim", "Kim Lee", Role::Reporter);
        let config = PanelConfig::default().with_server_root("https://admin.example.org");
        let html = UserRowTemplate::for_record(&rec, &config).render().unwrap();
        assert!(html.contains(r#"<tr id="row_kim">"#));
        assert!(html.contains(r#"<td class="cell-roles">Reporter</td>"#));
        assert!(html.contains(r#"data-user="kim""#));
        assert!(html.contains("https://admin.example.org/staff/usr/kim"));
    }

    #[test]
    fn panel_groups_banners_by_placement() {
        let table = UserTable::from_rows(
            vec![UserRecord::new("kim", "Kim Lee", Role::User)],
            TableOptions::default(),
        );
        let mut banners = Banners::default();
        banners.push(Notification::success(Placement::Table, "ana deleted"));
        let html = render_panel(
            &table,
            &banners,
            &DeleteDialog::default(),
            &EditDialog::default(),
            &PanelConfig::default(),
        )
        .unwrap();
        let alert_at = html.find("ana deleted").unwrap();
        let table_at = html.find(r#"id="user-table""#).unwrap();
        let form_at = html.find(r#"id="new-user""#).unwrap();
        assert!(form_at < alert_at && alert_at < table_at);
        assert!(html.contains(r#"<tr id="row_kim">"#));
        assert!(!html.contains("table-info"));
    }

    #[test]
    fn edit_dialog_offers_role_choice() {
        let table = UserTable::from_rows(
            vec![UserRecord::new("kim", "Kim Lee", Role::User)],
            TableOptions::default(),
        );
        let edit = EditDialog {
            open: true,
            target: Some("kim".into()),
            form: Default::default(),
        };
        let html = render_panel(
            &table,
            &Banners::default(),
            &DeleteDialog::default(),
            &edit,
            &PanelConfig::default(),
        )
        .unwrap();
        let dialog = &html[html.find(r#"id="editForm""#).unwrap()..];
        assert!(dialog.contains(r#"<select name="role">"#));
        assert!(dialog.contains(r#"<option value="">Unchanged</option>"#));
        assert!(dialog.contains(r#"<option value=":role/reporter">Reporter</option>"#));
    }
}

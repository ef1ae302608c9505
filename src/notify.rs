//! Success/error banners raised by the panel flows.
//!
//! A banner is plain data: what happened, where it belongs on the panel and
//! the text to show. Rendering lives in [`render_terminal`] and in the HTML
//! alert template.

use yansi::Paint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Where a banner is shown on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Above the create-user form
    CreateForm,
    /// Above the user table
    Table,
    /// Above the form inside the edit dialog
    EditForm,
}

impl Placement {
    pub fn describe(&self) -> &'static str {
        match self {
            Placement::CreateForm => "new user",
            Placement::Table => "users",
            Placement::EditForm => "edit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub placement: Placement,
    pub message: String,
}

impl Notification {
    pub fn success(placement: Placement, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            placement,
            message: message.into(),
        }
    }

    pub fn error(placement: Placement, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            placement,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Banners currently shown, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Banners {
    items: Vec<Notification>,
}

impl Banners {
    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    pub fn at(&self, placement: Placement) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(move |n| n.placement == placement)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dismiss every banner at one placement.
    pub fn dismiss(&mut self, placement: Placement) {
        self.items.retain(|n| n.placement != placement);
    }

    /// Hand over all banners and dismiss them.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }
}

pub fn render_terminal(notification: &Notification) -> String {
    let place = Paint::new(format!("[{}]", notification.placement.describe())).dim();
    match notification.kind {
        NotificationKind::Success => format!(
            "{} {} {}",
            place,
            Paint::new("✓").green().bold(),
            Paint::new(&notification.message).green()
        ),
        NotificationKind::Error => format!(
            "{} {} {}",
            place,
            Paint::new("✗").red().bold(),
            Paint::new(&notification.message).red()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_only_touches_one_placement() {
        let mut banners = Banners::default();
        banners.push(Notification::error(Placement::EditForm, "Failure: nope"));
        banners.push(Notification::success(Placement::Table, "kim deleted"));
        banners.dismiss(Placement::EditForm);
        assert_eq!(banners.len(), 1);
        assert_eq!(banners.at(Placement::Table).count(), 1);
    }

    #[test]
    fn take_empties_banners() {
        let mut banners = Banners::default();
        banners.push(Notification::success(Placement::CreateForm, "Added user kim"));
        let taken = banners.take();
        assert_eq!(taken.len(), 1);
        assert!(banners.is_empty());
    }

    #[test]
    fn terminal_rendering_contains_message() {
        yansi::disable();
        let line = render_terminal(&Notification::error(Placement::Table, "Don't delete yourself"));
        assert_eq!(line, "[users] ✗ Don't delete yourself");
    }
}

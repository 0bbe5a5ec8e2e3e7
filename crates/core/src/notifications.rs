//! User-facing notifications

use std::fmt;

use mockall::automock;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Something worked.
    Success,

    /// Something failed.
    Error,

    /// Neutral information.
    Info,
}

impl NotificationKind {
    /// Lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,

    /// One-line title.
    pub title: String,

    /// Optional detail line.
    pub description: Option<String>,
}

impl Notification {
    fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
        }
    }

    /// Success notification.
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title)
    }

    /// Error notification.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title)
    }

    /// Informational notification.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title)
    }

    /// Attach a detail line. Blank descriptions are dropped.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();

        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }
}

/// Fire-and-forget destination for notifications.
#[automock]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification. Must not block on rendering.
    fn notify(&self, notification: Notification);
}

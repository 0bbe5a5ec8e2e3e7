//! Notifications written to the log.

use couponbook::notifications::{Notification, NotificationKind, NotificationSink};
use tracing::{info, warn};

/// Sink that turns user notifications into log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or_default();

        match notification.kind {
            NotificationKind::Error => {
                warn!(title = %notification.title, description, "notification");
            }
            NotificationKind::Success | NotificationKind::Info => {
                info!(title = %notification.title, description, "notification");
            }
        }
    }
}

//! User-facing notifications.
//!
//! The view-model layer reports outcomes (a failed lookup, a saved contact) through a
//! [`Notifier`]. The service itself has no toast surface, so the default [`TracingNotifier`]
//! writes notifications to the log; embedders provide their own implementation.

use serde::Serialize;

/// Visual treatment of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Delivers notifications to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => tracing::info!(title = %notification.title, "{}", notification.description),
            Variant::Destructive => tracing::warn!(title = %notification.title, "{}", notification.description),
        }
    }
}

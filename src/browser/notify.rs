//! User-visible notifications emitted by the file browser.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Maximum number of notifications to buffer in the broadcast channel.
const CHANNEL_CAPACITY: usize = 100;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    /// Informational.
    #[default]
    Default,
    /// Failure or irreversible action.
    Destructive,
}

impl NotificationVariant {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationVariant::Default => "default",
            NotificationVariant::Destructive => "destructive",
        }
    }
}

impl std::fmt::Display for NotificationVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A toast-like notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Visual weight.
    pub variant: NotificationVariant,
    /// When the notification was raised.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create an informational notification.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
            timestamp: Utc::now(),
        }
    }

    /// Create a destructive notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    /// A file was renamed.
    pub fn renamed(old_name: &str, new_name: &str) -> Self {
        Self::new(
            "File renamed",
            format!("\"{old_name}\" was renamed to \"{new_name}\"."),
        )
    }

    /// A file or folder was deleted.
    pub fn deleted(name: &str) -> Self {
        Self::destructive("File deleted", format!("\"{name}\" has been deleted."))
    }

    /// A download was requested.
    pub fn download(name: &str) -> Self {
        Self::new(
            "Preparing Download",
            format!("Your download for \"{name}\" will start shortly."),
        )
    }

    /// Tag generation failed for an upload.
    pub fn tagging_failed(error: &str) -> Self {
        Self::destructive("AI Tagging Failed", error)
    }

    /// An upload failed outside tag generation.
    pub fn upload_failed(error: &str) -> Self {
        Self::destructive("Upload Failed", error)
    }

    /// Format the notification for display.
    pub fn format(&self) -> String {
        match self.variant {
            NotificationVariant::Default => format!("{}: {}", self.title, self.description),
            NotificationVariant::Destructive => format!("!! {}: {}", self.title, self.description),
        }
    }
}

/// Broadcast hub for notifications.
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl NotificationHub {
    /// Create a new hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to notifications raised from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Raise a notification.
    ///
    /// Returns the number of subscribers that received it.
    pub fn send(&self, notification: Notification) -> usize {
        debug!(
            "Notification [{}] {}: {}",
            notification.variant, notification.title, notification.description
        );
        // No subscribers is not an error.
        self.sender.send(notification).unwrap_or(0)
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

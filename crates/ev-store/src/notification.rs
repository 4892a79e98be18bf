//! Dismissible user-facing notifications.

use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Request Failed";
pub const DEFAULT_MESSAGE: &str = "An unknown error occurred, please try again later.";

pub fn default_auto_hide() -> Duration {
    Duration::from_millis(6_000)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    /// Assigned by the store when the notification is queued.
    pub id: u64,
    pub title: String,
    pub message: String,
    /// `None` keeps the notification until dismissed.
    pub auto_hide: Option<Duration>,
}

impl Notification {
    pub fn request_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: 0,
            title: DEFAULT_TITLE.to_string(),
            message: if message.trim().is_empty() {
                DEFAULT_MESSAGE.to_string()
            } else {
                message
            },
            auto_hide: Some(default_auto_hide()),
        }
    }

    #[must_use]
    pub fn sticky(self) -> Self {
        Self {
            auto_hide: None,
            ..self
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notifications {
    next_id: u64,
    pub active: Vec<Notification>,
}

impl Notifications {
    #[must_use]
    pub fn push(mut self, mut notification: Notification) -> Self {
        self.next_id += 1;
        notification.id = self.next_id;
        self.active.push(notification);
        self
    }

    #[must_use]
    pub fn dismiss(mut self, id: u64) -> Self {
        self.active.retain(|n| n.id != id);
        self
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.active.last()
    }
}

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A user-facing notice, the toast a storefront would show.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

/// Sending half of the notification feed.
///
/// Never blocks: if the feed is full the notice is dropped with a warning,
/// and a closed feed is ignored. Every notice is also logged.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::Sender<Notification>,
}

impl Notifier {
    pub fn channel(buffer_size: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }

    pub fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                warn!(title = %notification.title, description = %notification.description, "Notification")
            }
            _ => info!(title = %notification.title, description = %notification.description, "Notification"),
        }
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => warn!(title = %dropped.title, "Notification feed full, dropping"),
            Err(TrySendError::Closed(_)) => debug!("Notification feed closed"),
        }
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.send(NotificationLevel::Success, title.into(), description.into());
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.send(NotificationLevel::Info, title.into(), description.into());
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.send(NotificationLevel::Error, title.into(), description.into());
    }

    fn send(&self, level: NotificationLevel, title: String, description: String) {
        self.notify(Notification { level, title, description });
    }
}

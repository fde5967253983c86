//! User-facing notifications.
//!
//! The session reports transport and server events as short titled
//! messages; the consumer decides how to show them.

use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Something went wrong.
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Short title.
    pub title: String,
    /// Details.
    pub description: String,
}

impl Notification {
    /// Creates an informational notification.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Transport opened.
    #[must_use]
    pub fn connected() -> Self {
        Self::info("Connected", "WebSocket connection established")
    }

    /// Transport closed.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::error("Disconnected", "WebSocket connection closed")
    }

    /// Transport failed.
    #[must_use]
    pub fn connection_error() -> Self {
        Self::error("Connection Error", "Failed to establish WebSocket connection")
    }

    /// Error reported by the server.
    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::error("Server Error", message)
    }

    /// Connect attempted with an unusable URL.
    #[must_use]
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::error("Error", reason)
    }

    /// Returns true for error notifications.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_display() {
        let n = Notification::server_error("rate limited");
        assert_eq!(n.to_string(), "[error] Server Error: rate limited");
        assert!(n.is_error());
    }

    #[test]
    fn test_notification_connected_is_info() {
        let n = Notification::connected();
        assert_eq!(n.level, NotificationLevel::Info);
        assert!(!n.is_error());
    }
}

//! Connection status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness state of the transport as seen by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Whether the feed is considered online.
    pub online: bool,

    /// Time of the last transition or valid message, in milliseconds since epoch.
    pub last_updated: i64,
}

impl ConnectionStatus {
    /// Creates an offline status stamped at `now_ms`.
    #[must_use]
    pub const fn offline(now_ms: i64) -> Self {
        Self {
            online: false,
            last_updated: now_ms,
        }
    }

    /// Creates an online status stamped at `now_ms`.
    #[must_use]
    pub const fn online(now_ms: i64) -> Self {
        Self {
            online: true,
            last_updated: now_ms,
        }
    }

    /// Returns the last update as a UTC time.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_updated)
    }

    /// Milliseconds since the last update.
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.last_updated)
    }
}

/// Payload of a `status` message pushed by the server.
///
/// Any timestamp the server sends is ignored; the receiver stamps arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    /// Server-reported liveness.
    pub online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constructors() {
        let status = ConnectionStatus::offline(10);
        assert!(!status.online);
        assert_eq!(status.last_updated, 10);

        let status = ConnectionStatus::online(20);
        assert!(status.online);
        assert_eq!(status.last_updated, 20);
    }

    #[test]
    fn test_status_elapsed() {
        let status = ConnectionStatus::online(1_000);
        assert_eq!(status.elapsed_ms(31_500), 30_500);
    }

    #[test]
    fn test_status_payload_ignores_extra_fields() {
        let json = r#"{"online":true,"lastUpdated":5}"#;
        let payload: StatusPayload = serde_json::from_str(json).expect("deserialize");
        assert!(payload.online);
    }

    #[test]
    fn test_status_serialize() {
        let json = serde_json::to_string(&ConnectionStatus::online(7)).expect("serialize");
        assert_eq!(json, r#"{"online":true,"lastUpdated":7}"#);
    }
}

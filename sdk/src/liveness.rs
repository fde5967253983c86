//! Liveness tracking for the feed connection.
//!
//! Derives an online/offline status from transport events and message
//! traffic, and downgrades it when the feed goes silent.

use std::time::Duration;

use crate::types::{ConnectionStatus, StatusPayload};

/// Default silence window after which an open feed is reported offline.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracks the online flag and the time of the last known-good activity.
#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    /// Current status.
    status: ConnectionStatus,

    /// Whether the transport reported open and has not closed since.
    transport_open: bool,

    /// Silence window in milliseconds.
    timeout_ms: i64,
}

impl LivenessMonitor {
    /// Creates an offline monitor stamped at `now_ms`.
    #[must_use]
    pub fn new(timeout: Duration, now_ms: i64) -> Self {
        Self {
            status: ConnectionStatus::offline(now_ms),
            transport_open: false,
            timeout_ms: i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Returns true if the transport is open.
    #[must_use]
    pub const fn is_transport_open(&self) -> bool {
        self.transport_open
    }

    /// Records a successful open.
    pub fn mark_open(&mut self, now_ms: i64) {
        self.transport_open = true;
        self.status = ConnectionStatus::online(now_ms);
    }

    /// Records a close of the transport.
    pub fn mark_closed(&mut self, now_ms: i64) {
        self.transport_open = false;
        self.status = ConnectionStatus::offline(now_ms);
    }

    /// Records a valid message other than a status report.
    pub fn record_activity(&mut self, now_ms: i64) {
        self.status = ConnectionStatus::online(now_ms);
    }

    /// Applies a server status report, stamped with arrival time.
    pub fn apply_status(&mut self, payload: StatusPayload, now_ms: i64) {
        self.status = ConnectionStatus {
            online: payload.online,
            last_updated: now_ms,
        };
    }

    /// Periodic check. Flips the status offline when the transport is open
    /// but nothing arrived for longer than the timeout.
    ///
    /// Returns true if this call changed the status. Never touches
    /// `last_updated`.
    pub fn check(&mut self, now_ms: i64) -> bool {
        if self.transport_open
            && self.status.online
            && self.status.elapsed_ms(now_ms) > self.timeout_ms
        {
            self.status.online = false;
            return true;
        }
        false
    }
}

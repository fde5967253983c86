//! Session metrics.
//!
//! Provides atomic counters for monitoring the feed session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics for a connection session.
#[derive(Debug)]
pub struct SessionMetrics {
    /// Sockets that reported open.
    connections_opened: AtomicU64,

    /// Sockets that closed.
    connections_closed: AtomicU64,

    /// Text frames received.
    frames_received: AtomicU64,

    /// Frames dropped by the codec.
    frames_dropped: AtomicU64,

    /// Listings inserted.
    listings_inserted: AtomicU64,

    /// Listings replaced.
    listings_updated: AtomicU64,

    /// Status reports applied.
    status_updates: AtomicU64,

    /// Error messages from the server.
    server_errors: AtomicU64,

    /// Liveness checks that flipped the status offline.
    liveness_timeouts: AtomicU64,

    /// Events from superseded sockets.
    stale_events: AtomicU64,

    /// Start time for uptime.
    start_time: Instant,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMetrics {
    /// Creates a new metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections_opened: AtomicU64::new(0),
            connections_closed: AtomicU64::new(0),
            frames_received: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            listings_inserted: AtomicU64::new(0),
            listings_updated: AtomicU64::new(0),
            status_updates: AtomicU64::new(0),
            server_errors: AtomicU64::new(0),
            liveness_timeouts: AtomicU64::new(0),
            stale_events: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a socket open.
    pub fn record_connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a socket close.
    pub fn record_connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a received frame.
    pub fn record_frame(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a frame the codec rejected.
    pub fn record_dropped_frame(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an inserted listing.
    pub fn record_insert(&self) {
        self.listings_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a replaced listing.
    pub fn record_update(&self) {
        self.listings_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an applied status report.
    pub fn record_status(&self) {
        self.status_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a server error message.
    pub fn record_server_error(&self) {
        self.server_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a liveness timeout.
    pub fn record_liveness_timeout(&self) {
        self.liveness_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an event ignored because its socket was superseded.
    pub fn record_stale_event(&self) {
        self.stale_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns sockets opened.
    #[must_use]
    pub fn connections_opened(&self) -> u64 {
        self.connections_opened.load(Ordering::Relaxed)
    }

    /// Returns sockets closed.
    #[must_use]
    pub fn connections_closed(&self) -> u64 {
        self.connections_closed.load(Ordering::Relaxed)
    }

    /// Returns frames received.
    #[must_use]
    pub fn frames_received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }

    /// Returns frames dropped.
    #[must_use]
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    /// Returns listings inserted.
    #[must_use]
    pub fn listings_inserted(&self) -> u64 {
        self.listings_inserted.load(Ordering::Relaxed)
    }

    /// Returns listings replaced.
    #[must_use]
    pub fn listings_updated(&self) -> u64 {
        self.listings_updated.load(Ordering::Relaxed)
    }

    /// Returns status reports applied.
    #[must_use]
    pub fn status_updates(&self) -> u64 {
        self.status_updates.load(Ordering::Relaxed)
    }

    /// Returns server errors.
    #[must_use]
    pub fn server_errors(&self) -> u64 {
        self.server_errors.load(Ordering::Relaxed)
    }

    /// Returns liveness timeouts.
    #[must_use]
    pub fn liveness_timeouts(&self) -> u64 {
        self.liveness_timeouts.load(Ordering::Relaxed)
    }

    /// Returns stale events ignored.
    #[must_use]
    pub fn stale_events(&self) -> u64 {
        self.stale_events.load(Ordering::Relaxed)
    }

    /// Returns the uptime.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the share of received frames the codec dropped (0.0 to 1.0).
    #[must_use]
    pub fn drop_rate(&self) -> f64 {
        let received = self.frames_received();
        if received > 0 {
            self.frames_dropped() as f64 / received as f64
        } else {
            0.0
        }
    }

    /// Returns a snapshot of all metrics.
    #[must_use]
    pub fn snapshot(&self) -> SessionMetricsSnapshot {
        SessionMetricsSnapshot {
            connections_opened: self.connections_opened(),
            connections_closed: self.connections_closed(),
            frames_received: self.frames_received(),
            frames_dropped: self.frames_dropped(),
            listings_inserted: self.listings_inserted(),
            listings_updated: self.listings_updated(),
            status_updates: self.status_updates(),
            server_errors: self.server_errors(),
            liveness_timeouts: self.liveness_timeouts(),
            stale_events: self.stale_events(),
            uptime: self.uptime(),
            drop_rate: self.drop_rate(),
        }
    }
}

/// A point-in-time snapshot of session metrics.
#[derive(Debug, Clone)]
pub struct SessionMetricsSnapshot {
    /// Sockets opened.
    pub connections_opened: u64,
    /// Sockets closed.
    pub connections_closed: u64,
    /// Frames received.
    pub frames_received: u64,
    /// Frames dropped.
    pub frames_dropped: u64,
    /// Listings inserted.
    pub listings_inserted: u64,
    /// Listings replaced.
    pub listings_updated: u64,
    /// Status reports applied.
    pub status_updates: u64,
    /// Server errors.
    pub server_errors: u64,
    /// Liveness timeouts.
    pub liveness_timeouts: u64,
    /// Stale events ignored.
    pub stale_events: u64,
    /// Uptime.
    pub uptime: Duration,
    /// Drop rate.
    pub drop_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.frames_received(), 0);
        assert_eq!(metrics.connections_opened(), 0);
    }

    #[test]
    fn test_metrics_record_frames() {
        let metrics = SessionMetrics::new();

        metrics.record_frame();
        metrics.record_frame();
        metrics.record_frame();
        metrics.record_frame();
        metrics.record_dropped_frame();

        assert_eq!(metrics.frames_received(), 4);
        assert_eq!(metrics.frames_dropped(), 1);
        assert!((metrics.drop_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_drop_rate_empty() {
        assert_eq!(SessionMetrics::new().drop_rate(), 0.0);
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = SessionMetrics::new();

        metrics.record_connection_opened();
        metrics.record_insert();
        metrics.record_update();
        metrics.record_update();
        metrics.record_liveness_timeout();
        metrics.record_stale_event();

        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.connections_opened, 1);
        assert_eq!(snapshot.listings_inserted, 1);
        assert_eq!(snapshot.listings_updated, 2);
        assert_eq!(snapshot.liveness_timeouts, 1);
        assert_eq!(snapshot.stale_events, 1);
    }
}

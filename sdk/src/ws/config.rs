//! Session configuration.
//!
//! Provides configuration options for the connection session.

use std::time::Duration;

use super::error::WsError;
use crate::liveness::DEFAULT_LIVENESS_TIMEOUT;

/// Default liveness check interval in seconds.
pub const DEFAULT_LIVENESS_CHECK_SECS: u64 = 5;

/// Default capacity of the internal event and command queues.
pub const DEFAULT_EVENT_BUFFER: usize = 1000;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Silence window before an open feed is reported offline.
    pub liveness_timeout: Duration,

    /// How often the liveness check runs.
    pub liveness_check_interval: Duration,

    /// Capacity of the internal event and command queues.
    pub event_buffer: usize,

    /// Seed the store with a sample listing.
    pub seed_demo: bool,

    /// URL to connect to as soon as the session starts.
    pub auto_connect_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
            liveness_check_interval: Duration::from_secs(DEFAULT_LIVENESS_CHECK_SECS),
            event_buffer: DEFAULT_EVENT_BUFFER,
            seed_demo: false,
            auto_connect_url: None,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the liveness timeout.
    #[must_use]
    pub fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    /// Sets the liveness check interval.
    #[must_use]
    pub fn with_liveness_check_interval(mut self, interval: Duration) -> Self {
        self.liveness_check_interval = interval;
        self
    }

    /// Sets the queue capacity.
    #[must_use]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Seeds the store with the demo listing.
    #[must_use]
    pub fn with_demo_listing(mut self, seed: bool) -> Self {
        self.seed_demo = seed;
        self
    }

    /// Connects to `url` when the session starts.
    #[must_use]
    pub fn with_auto_connect(mut self, url: impl Into<String>) -> Self {
        self.auto_connect_url = Some(url.into());
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), WsError> {
        if self.liveness_timeout.is_zero() {
            return Err(WsError::InvalidConfig(
                "liveness timeout cannot be zero".to_string(),
            ));
        }

        if self.liveness_check_interval.is_zero() {
            return Err(WsError::InvalidConfig(
                "liveness check interval cannot be zero".to_string(),
            ));
        }

        if self.event_buffer == 0 {
            return Err(WsError::InvalidConfig(
                "event buffer cannot be zero".to_string(),
            ));
        }

        if let Some(url) = &self.auto_connect_url {
            validate_url(url).map_err(|e| WsError::InvalidConfig(e.to_string()))?;
        }

        Ok(())
    }
}

/// Checks that `url` is a usable WebSocket endpoint.
///
/// # Errors
///
/// Returns `WsError::InvalidUrl` if the URL is blank or not `ws://`/`wss://`.
pub fn validate_url(url: &str) -> Result<(), WsError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(WsError::InvalidUrl(
            "Please enter a WebSocket URL".to_string(),
        ));
    }

    if !url.starts_with("ws://") && !url.starts_with("wss://") {
        return Err(WsError::InvalidUrl(
            "url must start with ws:// or wss://".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    #[test]
    fn test_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.liveness_timeout, Duration::from_secs(30));
        assert_eq!(config.liveness_check_interval, Duration::from_secs(5));
        assert!(!config.seed_demo);
        assert!(config.auto_connect_url.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new()
            .with_liveness_timeout(Duration::from_secs(10))
            .with_liveness_check_interval(Duration::from_millis(500))
            .with_event_buffer(16)
            .with_demo_listing(true)
            .with_auto_connect("ws://localhost:8080");

        assert_eq!(config.liveness_timeout, Duration::from_secs(10));
        assert_eq!(config.liveness_check_interval, Duration::from_millis(500));
        assert_eq!(config.event_buffer, 16);
        assert!(config.seed_demo);
        assert_eq!(config.auto_connect_url.as_deref(), Some("ws://localhost:8080"));
        assert_ok!(config.validate());
    }

    #[test]
    fn test_config_validate_zero_timeout() {
        let config = SessionConfig::new().with_liveness_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_zero_buffer() {
        let config = SessionConfig::new().with_event_buffer(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_bad_auto_connect() {
        let config = SessionConfig::new().with_auto_connect("http://localhost");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_url() {
        assert_ok!(validate_url("ws://localhost:8080"));
        assert_ok!(validate_url("wss://feed.example.com/stream"));
        assert_err!(validate_url(""));
        assert_err!(validate_url("   "));
        assert_err!(validate_url("https://example.com"));
    }
}

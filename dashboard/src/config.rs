//! Dashboard configuration.
//!
//! Provides configuration options for the dashboard, loaded from an
//! optional JSON file and `SKINWATCH_*` environment variables.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skinwatch_sdk::SessionConfig;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_FILE_VAR: &str = "SKINWATCH_CONFIG";

/// Configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Connect to the local feed instead of the production one.
    pub use_local_websocket: bool,

    /// Local feed URL.
    pub local_websocket_url: String,

    /// Production feed URL.
    pub production_websocket_url: String,

    /// Password accepted by the login gate.
    pub login_secret: String,

    /// Show the sample listing before any data arrives.
    pub seed_demo: bool,

    /// Connect to the selected feed on startup.
    pub auto_connect: bool,

    /// Silence window before the feed is reported offline, in seconds.
    pub liveness_timeout_secs: u64,

    /// Liveness check interval in seconds.
    pub liveness_check_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            use_local_websocket: true,
            local_websocket_url: "ws://localhost:8080".to_string(),
            production_websocket_url: "wss://your-production-url.com".to_string(),
            login_secret: "admin123".to_string(),
            seed_demo: true,
            auto_connect: false,
            liveness_timeout_secs: 30,
            liveness_check_secs: 5,
        }
    }
}

impl DashboardConfig {
    /// Loads the configuration from the process environment.
    ///
    /// Starts from the JSON file named by `SKINWATCH_CONFIG` if set,
    /// otherwise from defaults, then applies `SKINWATCH_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_FILE_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Parses a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `SKINWATCH_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("SKINWATCH_USE_LOCAL_WS") {
            self.use_local_websocket = parse_var("SKINWATCH_USE_LOCAL_WS", &value)?;
        }
        if let Some(value) = lookup("SKINWATCH_LOCAL_WS_URL") {
            self.local_websocket_url = value;
        }
        if let Some(value) = lookup("SKINWATCH_PRODUCTION_WS_URL") {
            self.production_websocket_url = value;
        }
        if let Some(value) = lookup("SKINWATCH_PASSWORD") {
            self.login_secret = value;
        }
        if let Some(value) = lookup("SKINWATCH_SEED_DEMO") {
            self.seed_demo = parse_var("SKINWATCH_SEED_DEMO", &value)?;
        }
        if let Some(value) = lookup("SKINWATCH_AUTO_CONNECT") {
            self.auto_connect = parse_var("SKINWATCH_AUTO_CONNECT", &value)?;
        }
        if let Some(value) = lookup("SKINWATCH_LIVENESS_TIMEOUT_SECS") {
            self.liveness_timeout_secs = parse_var("SKINWATCH_LIVENESS_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("SKINWATCH_LIVENESS_CHECK_SECS") {
            self.liveness_check_secs = parse_var("SKINWATCH_LIVENESS_CHECK_SECS", &value)?;
        }
        Ok(self)
    }

    /// Returns the feed URL selected by `use_local_websocket`.
    #[must_use]
    pub fn websocket_url(&self) -> &str {
        if self.use_local_websocket {
            &self.local_websocket_url
        } else {
            &self.production_websocket_url
        }
    }

    /// Builds the session configuration.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::new()
            .with_liveness_timeout(Duration::from_secs(self.liveness_timeout_secs))
            .with_liveness_check_interval(Duration::from_secs(self.liveness_check_secs))
            .with_demo_listing(self.seed_demo);

        if self.auto_connect {
            config.with_auto_connect(self.websocket_url())
        } else {
            config
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.login_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        if self.liveness_timeout_secs == 0 || self.liveness_check_secs == 0 {
            return Err(ConfigError::InvalidLiveness);
        }

        if self.auto_connect {
            skinwatch_sdk::ws::validate_url(self.websocket_url())
                .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed.
    #[error("{var} has invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// Configuration file could not be read.
    #[error("cannot read {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// Configuration file is not valid JSON.
    #[error("invalid configuration file: {0}")]
    Parse(String),

    /// Login secret is empty.
    #[error("login_secret cannot be empty")]
    EmptySecret,

    /// Liveness settings are zero.
    #[error("liveness_timeout_secs and liveness_check_secs must be > 0")]
    InvalidLiveness,

    /// Auto-connect URL is unusable.
    #[error("invalid websocket url: {0}")]
    InvalidUrl(String),
}

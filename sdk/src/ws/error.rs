//! WebSocket error types.
//!
//! Provides error types for session and codec operations.

use std::fmt;

use crate::error::SdkError;

/// WebSocket errors.
#[derive(Debug)]
pub enum WsError {
    /// URL rejected before connecting.
    InvalidUrl(String),

    /// Invalid configuration.
    InvalidConfig(String),

    /// Session is no longer running.
    Closed,
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "invalid url: {}", msg),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::Closed => write!(f, "session closed"),
        }
    }
}

impl std::error::Error for WsError {}

/// Reasons an inbound frame could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Frame is not JSON.
    #[error("invalid json: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Frame has no string `type` field.
    #[error("missing message type")]
    MissingType,

    /// Frame has a `type` this client does not know.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Payload does not match the shape required by its type.
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        /// Message type.
        kind: &'static str,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Listing payload failed validation.
    #[error("invalid listing: {0}")]
    InvalidListing(#[from] SdkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_error_invalid_config() {
        let err = WsError::InvalidConfig("event_buffer must be > 0".to_string());
        assert_eq!(err.to_string(), "invalid configuration: event_buffer must be > 0");
    }

    #[test]
    fn test_ws_error_invalid_url() {
        let err = WsError::InvalidUrl("url cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid url: url cannot be empty");
    }

    #[test]
    fn test_ws_error_closed() {
        assert_eq!(WsError::Closed.to_string(), "session closed");
    }

    #[test]
    fn test_codec_error_unknown_type() {
        let err = CodecError::UnknownType("trade".to_string());
        assert_eq!(err.to_string(), "unknown message type: trade");
    }

    #[test]
    fn test_codec_error_from_sdk_error() {
        let err: CodecError = SdkError::EmptyName.into();
        assert_eq!(err.to_string(), "invalid listing: listing name cannot be empty");
    }
}

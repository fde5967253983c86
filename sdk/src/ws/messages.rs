//! WebSocket message types.
//!
//! Defines the frames pushed by the listings feed and decodes raw text
//! into them.

use std::fmt;

use serde_json::Value;

use super::error::CodecError;
use crate::types::{Listing, StatusPayload};

/// Discriminant of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Listing upsert.
    Update,
    /// Server status report.
    Status,
    /// Server-side error text.
    Error,
}

impl MessageKind {
    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Status => "status",
            Self::Error => "error",
        }
    }

    /// Parses a wire tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "update" => Some(Self::Update),
            "status" => Some(Self::Status),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-to-client messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Insert or replace a listing.
    Update(Listing),
    /// Server status report.
    Status(StatusPayload),
    /// Error text to surface to the operator.
    Error(String),
}

impl InboundMessage {
    /// Returns the message discriminant.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Update(_) => MessageKind::Update,
            Self::Status(_) => MessageKind::Status,
            Self::Error(_) => MessageKind::Error,
        }
    }

    /// Decodes a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not JSON, has no or an unknown
    /// `type`, or carries a payload that does not fit its type.
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        let mut value: Value = serde_json::from_str(text).map_err(CodecError::InvalidJson)?;

        let kind = {
            let tag = value
                .get("type")
                .and_then(Value::as_str)
                .ok_or(CodecError::MissingType)?;
            MessageKind::from_tag(tag).ok_or_else(|| CodecError::UnknownType(tag.to_string()))?
        };

        let data = value.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        let invalid = |source: serde_json::Error| CodecError::InvalidPayload {
            kind: kind.as_str(),
            source,
        };

        match kind {
            MessageKind::Update => {
                let listing: Listing = serde_json::from_value(data).map_err(invalid)?;
                listing.validate()?;
                Ok(Self::Update(listing))
            }
            MessageKind::Status => serde_json::from_value(data)
                .map(Self::Status)
                .map_err(invalid),
            MessageKind::Error => serde_json::from_value(data)
                .map(Self::Error)
                .map_err(invalid),
        }
    }
}

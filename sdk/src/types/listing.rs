//! Listing types for the skinwatch SDK.
//!
//! Provides the marketplace listing pushed by the upstream feed.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SdkError;

/// Name of the sample listing seeded into demo stores.
pub const DEMO_LISTING_NAME: &str = "PP-Bizon | Water Sigil (Factory New)";

/// A marketplace item offer.
///
/// Listings are keyed by `name`. The `id` is carried through from the
/// feed but never used for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Upstream identifier. Numeric ids are kept in their decimal form.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,

    /// Item name, unique within a store.
    pub name: String,

    /// Sticker or attribute text.
    #[serde(default)]
    pub sticker: String,

    /// Price in dollars.
    pub price: Decimal,

    /// Market page for the item.
    #[serde(default)]
    pub market_link: String,

    /// First-seen time in milliseconds since epoch.
    #[serde(default, deserialize_with = "deserialize_epoch_ms")]
    pub timestamp: i64,

    /// Last update time in milliseconds since epoch.
    #[serde(default, deserialize_with = "deserialize_epoch_ms")]
    pub last_updated: i64,

    /// Item image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Listing {
    /// Creates a listing with the given name and price.
    ///
    /// Timestamps start at zero; stores stamp them on insert.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            sticker: String::new(),
            price,
            market_link: String::new(),
            timestamp: 0,
            last_updated: 0,
            image_url: None,
        }
    }

    /// Sets the upstream identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the sticker text.
    #[must_use]
    pub fn with_sticker(mut self, sticker: impl Into<String>) -> Self {
        self.sticker = sticker.into();
        self
    }

    /// Sets the market link.
    #[must_use]
    pub fn with_market_link(mut self, link: impl Into<String>) -> Self {
        self.market_link = link.into();
        self
    }

    /// The sample listing used to give an empty dashboard some content.
    #[must_use]
    pub fn demo(now_ms: i64) -> Self {
        Self {
            id: "sample-1".to_string(),
            name: DEMO_LISTING_NAME.to_string(),
            sticker: "compLexity Gaming | Katowice 2014".to_string(),
            price: Decimal::new(20720, 2),
            market_link: "https://steamcommunity.com/market/listings/730/PP-Bizon%20%7C%20Water%20Sigil%20%28Factory%20New%29?filter=%22compLexity%20Gaming%20Katowice%202014%22".to_string(),
            timestamp: now_ms,
            last_updated: now_ms,
            image_url: None,
        }
    }

    /// Checks the invariants a listing must satisfy before it is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the price is negative.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.name.trim().is_empty() {
            return Err(SdkError::EmptyName);
        }

        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(SdkError::NegativePrice {
                name: self.name.clone(),
                price: self.price.to_string(),
            });
        }

        Ok(())
    }

    /// Returns the last update time.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_updated)
    }

    /// Milliseconds elapsed since the listing was first seen.
    #[must_use]
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp).max(0)
    }
}

/// Feeds send ids as strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => id,
        Some(RawId::Number(id)) => id.to_string(),
        None => String::new(),
    })
}

/// Epoch milliseconds may arrive as integers or floats.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMillis {
    Int(i64),
    Float(f64),
}

// Fractional milliseconds are truncated; out-of-range floats saturate.
fn deserialize_epoch_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Option::<RawMillis>::deserialize(deserializer)? {
        Some(RawMillis::Int(ms)) => ms,
        Some(RawMillis::Float(ms)) => ms as i64,
        None => 0,
    })
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sticker.is_empty() {
            write!(f, "{} @ {}", self.name, self.price)
        } else {
            write!(f, "{} [{}] @ {}", self.name, self.sticker, self.price)
        }
    }
}

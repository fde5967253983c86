//! Skinwatch SDK - live marketplace listings over WebSocket.
//!
//! This crate provides the core of the skinwatch dashboard: decoding the
//! feed's frames, keeping the listing store, tracking feed liveness and
//! managing the single socket to the feed.
//!
//! # Core Types
//!
//! - [`Listing`] - A marketplace offer, keyed by name
//! - [`ConnectionStatus`] - Online flag and time of last activity
//! - [`InboundMessage`] - Decoded `update` / `status` / `error` frame
//!
//! # Components
//!
//! - [`ListingStore`] - Ordered listings with upsert semantics
//! - [`LivenessMonitor`] - Online/offline derivation with a silence timeout
//! - [`ConnectionSession`] - Single-socket actor tying everything together
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use skinwatch_sdk::{InboundMessage, Listing, ListingStore};
//!
//! let mut store = ListingStore::new();
//! let msg = InboundMessage::decode(r#"{"type":"update","data":{"name":"Knife A","price":100}}"#)
//!     .expect("valid frame");
//! if let InboundMessage::Update(listing) = msg {
//!     store.upsert(listing, 1_000);
//! }
//! assert_eq!(store.get("Knife A").map(|l| l.price), Some(Decimal::from(100)));
//! ```

pub mod error;
pub mod liveness;
pub mod notify;
pub mod store;
pub mod types;
pub mod ws;

pub use error::SdkError;
pub use liveness::LivenessMonitor;
pub use notify::{Notification, NotificationLevel};
pub use store::{ListingStore, UpsertOutcome};
pub use types::{ConnectionStatus, Listing, StatusPayload, DEMO_LISTING_NAME};
pub use ws::{
    ConnectionSession, InboundMessage, SessionConfig, SessionHandle, SessionMetrics, SessionSnapshot,
};

//! Core types for the skinwatch SDK.
//!
//! This module provides the data carried over the feed and kept by the
//! session.

pub mod listing;
pub mod status;

pub use listing::{Listing, DEMO_LISTING_NAME};
pub use status::{ConnectionStatus, StatusPayload};

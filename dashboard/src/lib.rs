//! Skinwatch Dashboard - terminal dashboard for live marketplace listings.
//!
//! This crate wraps the SDK's connection session in an operator-facing
//! command loop with a login gate, filtering, sorting and statistics.
//!
//! # Components
//!
//! - [`config`]: Dashboard configuration
//! - [`auth`]: Login gate
//! - [`view`]: Sticker/price filters and sorting
//! - [`stats`]: Price statistics
//! - [`format`]: Currency and relative-time formatting
//! - [`render`]: Plain-text dashboard
//! - [`command`]: Operator commands
//! - [`app`]: Command loop

pub mod app;
pub mod auth;
pub mod command;
pub mod config;
pub mod format;
pub mod render;
pub mod stats;
pub mod view;

pub use app::{DashboardApp, Flow};
pub use auth::{AuthError, AuthSession, LoginGate};
pub use command::{Command, CommandError};
pub use config::{ConfigError, DashboardConfig};
pub use render::DashboardView;
pub use stats::ListingStats;
pub use view::{PriceRange, SortConfig, SortDirection, SortKey, ViewState};

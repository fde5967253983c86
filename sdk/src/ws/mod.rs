//! WebSocket session for the live listings feed.
//!
//! This module provides the connection session that keeps at most one
//! socket open to the feed, decodes its frames and maintains the listing
//! store and liveness status.
//!
//! # Example
//!
//! ```rust,ignore
//! use skinwatch_sdk::ws::{ConnectionSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (session, mut notifications) = ConnectionSession::spawn(SessionConfig::default())?;
//!
//!     session.connect("ws://localhost:8080").await?;
//!
//!     while let Some(notification) = notifications.recv().await {
//!         println!("{notification}");
//!         println!("{} listings", session.snapshot().listings.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod messages;
pub mod metrics;
pub mod session;
pub mod transport;

pub use config::{validate_url, SessionConfig};
pub use error::{CodecError, WsError};
pub use messages::{InboundMessage, MessageKind};
pub use metrics::{SessionMetrics, SessionMetricsSnapshot};
pub use session::{
    now_ms, ConnectionSession, SessionCommand, SessionHandle, SessionSnapshot, SessionState,
};
pub use transport::{SocketEvent, SocketHandle, SocketId, TransportEvent};

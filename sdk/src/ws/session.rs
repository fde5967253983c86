//! Connection session.
//!
//! A session owns at most one socket, the listing store and the liveness
//! monitor. Operator commands, socket events and liveness ticks are all
//! handled one at a time by a single actor loop, so state is never touched
//! concurrently. Consumers read published [`SessionSnapshot`]s and receive
//! [`Notification`]s; they never write session state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::config::{validate_url, SessionConfig};
use super::error::WsError;
use super::messages::InboundMessage;
use super::metrics::SessionMetrics;
use super::transport::{SocketEvent, SocketHandle, SocketId, TransportEvent};
use crate::liveness::LivenessMonitor;
use crate::notify::Notification;
use crate::store::{ListingStore, UpsertOutcome};
use crate::types::{ConnectionStatus, Listing};

/// Current wall-clock time in milliseconds since epoch.
#[must_use]
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Liveness status.
    pub status: ConnectionStatus,
    /// Whether the session currently holds a socket.
    pub connected: bool,
    /// Listings in arrival order.
    pub listings: Vec<Listing>,
    /// Most recent decoded message.
    pub last_message: Option<InboundMessage>,
}

/// Commands accepted by a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Replace any current socket with one to this URL.
    Connect(String),
    /// Close the current socket, if any.
    Disconnect,
    /// Close everything and stop the actor.
    Shutdown,
}

/// Session state without any I/O.
///
/// Every transition takes the current time so the rules can be exercised
/// directly.
#[derive(Debug)]
pub struct SessionState {
    store: ListingStore,
    liveness: LivenessMonitor,
    current: Option<SocketId>,
    last_message: Option<InboundMessage>,
    metrics: Arc<SessionMetrics>,
}

impl SessionState {
    /// Creates an offline state.
    #[must_use]
    pub fn new(config: &SessionConfig, metrics: Arc<SessionMetrics>, now_ms: i64) -> Self {
        let store = if config.seed_demo {
            ListingStore::with_demo_listing(now_ms)
        } else {
            ListingStore::new()
        };

        Self {
            store,
            liveness: LivenessMonitor::new(config.liveness_timeout, now_ms),
            current: None,
            last_message: None,
            metrics,
        }
    }

    /// Returns the liveness status.
    #[must_use]
    pub const fn status(&self) -> ConnectionStatus {
        self.liveness.status()
    }

    /// Returns the listing store.
    #[must_use]
    pub const fn store(&self) -> &ListingStore {
        &self.store
    }

    /// Returns the socket events are currently accepted from.
    #[must_use]
    pub const fn current_socket(&self) -> Option<SocketId> {
        self.current
    }

    /// Returns the most recent decoded message.
    #[must_use]
    pub const fn last_message(&self) -> Option<&InboundMessage> {
        self.last_message.as_ref()
    }

    /// Starts accepting events from `socket`.
    pub fn attach(&mut self, socket: SocketId) {
        self.current = Some(socket);
    }

    /// Stops accepting events from the current socket and marks the feed
    /// offline. Does nothing when no socket is attached.
    pub fn detach(&mut self, now_ms: i64) -> Option<Notification> {
        let socket = self.current.take()?;
        debug!(socket, "socket detached");
        if self.liveness.is_transport_open() {
            self.metrics.record_connection_closed();
        }
        self.liveness.mark_closed(now_ms);
        Some(Notification::disconnected())
    }

    /// Applies a socket event.
    ///
    /// Events from any socket other than the attached one are ignored.
    pub fn handle(&mut self, event: SocketEvent, now_ms: i64) -> Option<Notification> {
        if self.current != Some(event.socket) {
            debug!(socket = event.socket, "ignoring event from stale socket");
            self.metrics.record_stale_event();
            return None;
        }

        match event.event {
            TransportEvent::Opened => {
                info!(socket = event.socket, "feed connected");
                self.liveness.mark_open(now_ms);
                self.metrics.record_connection_opened();
                Some(Notification::connected())
            }
            TransportEvent::Closed => {
                info!(socket = event.socket, "feed disconnected");
                self.detach(now_ms)
            }
            // The transport always follows an error with `Closed`, which
            // performs the offline transition.
            TransportEvent::Error(error) => {
                warn!(socket = event.socket, %error, "feed transport error");
                Some(Notification::connection_error())
            }
            TransportEvent::Frame(text) => self.handle_frame(&text, now_ms),
        }
    }

    fn handle_frame(&mut self, text: &str, now_ms: i64) -> Option<Notification> {
        self.metrics.record_frame();

        match InboundMessage::decode(text) {
            Ok(message) => self.apply(message, now_ms),
            Err(e) => {
                warn!(error = %e, "dropping malformed frame");
                self.metrics.record_dropped_frame();
                None
            }
        }
    }

    /// Applies a decoded message.
    pub fn apply(&mut self, message: InboundMessage, now_ms: i64) -> Option<Notification> {
        debug!(kind = %message.kind(), "message received");
        self.last_message = Some(message.clone());

        match message {
            InboundMessage::Update(listing) => {
                match self.store.upsert(listing, now_ms) {
                    UpsertOutcome::Inserted => self.metrics.record_insert(),
                    UpsertOutcome::Updated => self.metrics.record_update(),
                }
                self.liveness.record_activity(now_ms);
                None
            }
            InboundMessage::Status(payload) => {
                self.liveness.apply_status(payload, now_ms);
                self.metrics.record_status();
                None
            }
            InboundMessage::Error(text) => {
                warn!(error = %text, "server reported error");
                self.liveness.record_activity(now_ms);
                self.metrics.record_server_error();
                Some(Notification::server_error(text))
            }
        }
    }

    /// Runs the liveness check. Returns true if the status flipped offline.
    pub fn check_liveness(&mut self, now_ms: i64) -> bool {
        let flipped = self.liveness.check(now_ms);
        if flipped {
            warn!(
                last_updated = self.liveness.status().last_updated,
                "feed silent, marking offline"
            );
            self.metrics.record_liveness_timeout();
        }
        flipped
    }

    /// Returns a read-only copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.liveness.status(),
            connected: self.current.is_some(),
            listings: self.store.all().to_vec(),
            last_message: self.last_message.clone(),
        }
    }
}

/// Connection session actor.
///
/// Dropping the session drops its socket handle, which closes the socket.
pub struct ConnectionSession {
    config: SessionConfig,
    state: SessionState,
    socket: Option<SocketHandle>,
    next_socket_id: SocketId,
    events_tx: mpsc::Sender<SocketEvent>,
    events_rx: mpsc::Receiver<SocketEvent>,
    notifications: mpsc::UnboundedSender<Notification>,
    snapshots: watch::Sender<SessionSnapshot>,
    metrics: Arc<SessionMetrics>,
}

impl ConnectionSession {
    /// Creates a session and the receiver for its notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: SessionConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Notification>), WsError> {
        config.validate()?;

        let metrics = Arc::new(SessionMetrics::new());
        let state = SessionState::new(&config, Arc::clone(&metrics), now_ms());
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer);
        let (notifications, notifications_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(state.snapshot());

        Ok((
            Self {
                config,
                state,
                socket: None,
                next_socket_id: 1,
                events_tx,
                events_rx,
                notifications,
                snapshots,
                metrics,
            },
            notifications_rx,
        ))
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Returns the session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns a receiver of published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Returns true if a socket is held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Opens a socket to `url`, closing any current socket first.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `WsError::InvalidUrl` if `url` is blank or not a WebSocket
    /// URL. Nothing is opened or closed in that case.
    pub fn connect(&mut self, url: &str) -> Result<(), WsError> {
        if let Err(e) = validate_url(url) {
            warn!(%url, error = %e, "connect rejected");
            self.notify(Notification::invalid_url(match &e {
                WsError::InvalidUrl(reason) => reason.clone(),
                other => other.to_string(),
            }));
            return Err(e);
        }

        self.release();

        let id = self.next_socket_id;
        self.next_socket_id = self.next_socket_id.saturating_add(1);

        info!(socket = id, url = %url.trim(), "connecting to feed");
        self.state.attach(id);
        self.socket = Some(SocketHandle::spawn(
            id,
            url.trim().to_string(),
            self.events_tx.clone(),
        ));

        Ok(())
    }

    /// Closes the current socket. Calling it with no socket is a no-op.
    pub fn disconnect(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(socket) = self.socket.take() {
            debug!(socket = socket.id(), "closing current socket");
            socket.close();
        }
        if let Some(notification) = self.state.detach(now_ms()) {
            self.notify(notification);
        }
    }

    /// Feeds one socket event to the state.
    pub fn dispatch(&mut self, event: SocketEvent) {
        let socket = event.socket;
        let closing = event.event == TransportEvent::Closed;

        if let Some(notification) = self.state.handle(event, now_ms()) {
            self.notify(notification);
        }

        if closing && self.socket.as_ref().map(SocketHandle::id) == Some(socket) {
            self.socket = None;
        }
    }

    /// Runs the liveness check.
    pub fn check_liveness(&mut self) -> bool {
        self.state.check_liveness(now_ms())
    }

    fn notify(&self, notification: Notification) {
        debug!(%notification, "notify");
        let _ = self.notifications.send(notification);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }

    /// Runs the actor until shutdown or until every command sender is gone.
    ///
    /// The liveness ticker lives only as long as this loop; the socket is
    /// closed on the way out.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        if let Some(url) = self.config.auto_connect_url.clone() {
            let _ = self.connect(&url);
            self.publish();
        }

        let period = self.config.liveness_check_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("session started");

        loop {
            let changed = tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Connect(url)) => {
                        let _ = self.connect(&url);
                        true
                    }
                    Some(SessionCommand::Disconnect) => {
                        self.disconnect();
                        true
                    }
                    Some(SessionCommand::Shutdown) | None => break,
                },
                Some(event) = self.events_rx.recv() => {
                    self.dispatch(event);
                    true
                }
                _ = ticker.tick() => self.check_liveness(),
            };

            if changed {
                self.publish();
            }
        }

        self.disconnect();
        self.publish();
        info!("session stopped");
    }

    /// Spawns the actor and returns a handle to it plus its notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn spawn(
        config: SessionConfig,
    ) -> Result<(SessionHandle, mpsc::UnboundedReceiver<Notification>), WsError> {
        let buffer = config.event_buffer;
        let (session, notifications) = Self::new(config)?;
        let (commands, commands_rx) = mpsc::channel(buffer);

        let snapshots = session.subscribe();
        let metrics = session.metrics();
        let task = tokio::spawn(session.run(commands_rx));

        Ok((
            SessionHandle {
                commands,
                snapshots,
                metrics,
                task,
            },
            notifications,
        ))
    }
}

/// Handle to a spawned session.
///
/// Dropping the handle stops the session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    metrics: Arc<SessionMetrics>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    async fn send(&self, command: SessionCommand) -> Result<(), WsError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| WsError::Closed)
    }

    /// Asks the session to connect to `url`.
    ///
    /// An unusable URL is reported through the notification channel.
    ///
    /// # Errors
    ///
    /// Returns `WsError::Closed` if the session has stopped.
    pub async fn connect(&self, url: impl Into<String>) -> Result<(), WsError> {
        self.send(SessionCommand::Connect(url.into())).await
    }

    /// Asks the session to disconnect.
    ///
    /// # Errors
    ///
    /// Returns `WsError::Closed` if the session has stopped.
    pub async fn disconnect(&self) -> Result<(), WsError> {
        self.send(SessionCommand::Disconnect).await
    }

    /// Returns the latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver that is notified whenever a snapshot is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Returns the metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Stops the session and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns `WsError::Closed` if the session task panicked or was
    /// cancelled.
    pub async fn shutdown(self) -> Result<(), WsError> {
        let _ = self.commands.send(SessionCommand::Shutdown).await;
        self.task.await.map_err(|_| WsError::Closed)
    }
}

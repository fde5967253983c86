//! Socket task.
//!
//! Each socket runs in its own task and reports what happens to it as
//! [`SocketEvent`]s tagged with the socket's id. The task never touches
//! session state.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// Identifier of a socket within one session.
pub type SocketId = u64;

/// Something that happened on a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened,
    /// A text frame arrived.
    Frame(String),
    /// The transport failed. Always followed by `Closed`.
    Error(String),
    /// The socket is gone.
    Closed,
}

/// A transport event tagged with its socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEvent {
    /// Socket the event belongs to.
    pub socket: SocketId,
    /// What happened.
    pub event: TransportEvent,
}

impl SocketEvent {
    /// Creates a tagged event.
    #[must_use]
    pub const fn new(socket: SocketId, event: TransportEvent) -> Self {
        Self { socket, event }
    }
}

/// Owner's side of a running socket task.
///
/// Dropping the handle closes the socket.
#[derive(Debug)]
pub struct SocketHandle {
    id: SocketId,
    close_tx: Option<oneshot::Sender<()>>,
}

impl SocketHandle {
    /// Opens a socket to `url` in a new task.
    #[must_use]
    pub fn spawn(id: SocketId, url: String, events: mpsc::Sender<SocketEvent>) -> Self {
        let (close_tx, close_rx) = oneshot::channel();
        tokio::spawn(run_socket(id, url, events, close_rx));

        Self {
            id,
            close_tx: Some(close_tx),
        }
    }

    /// Returns the socket id.
    #[must_use]
    pub const fn id(&self) -> SocketId {
        self.id
    }

    /// Asks the task to send a close frame and exit.
    pub fn close(mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn emit(events: &mpsc::Sender<SocketEvent>, id: SocketId, event: TransportEvent) -> bool {
    events.send(SocketEvent::new(id, event)).await.is_ok()
}

/// Drives one socket until it closes, fails, or its handle goes away.
///
/// A dropped handle resolves `close_rx` with an error, which is treated the
/// same as an explicit close.
async fn run_socket(
    id: SocketId,
    url: String,
    events: mpsc::Sender<SocketEvent>,
    mut close_rx: oneshot::Receiver<()>,
) {
    debug!(socket = id, %url, "opening socket");

    let connected = tokio::select! {
        biased;
        _ = &mut close_rx => {
            debug!(socket = id, "socket closed before handshake completed");
            return;
        }
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
    };

    let ws_stream = match connected {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            warn!(socket = id, error = %e, "socket handshake failed");
            if emit(&events, id, TransportEvent::Error(e.to_string())).await {
                emit(&events, id, TransportEvent::Closed).await;
            }
            return;
        }
    };

    if !emit(&events, id, TransportEvent::Opened).await {
        return;
    }

    let (mut sink, mut source) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = &mut close_rx => {
                debug!(socket = id, "closing socket");
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
                break;
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !emit(&events, id, TransportEvent::Frame(text.as_str().to_owned())).await {
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(socket = id, ?frame, "server closed socket");
                    emit(&events, id, TransportEvent::Closed).await;
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(socket = id, error = %e, "socket error");
                    if emit(&events, id, TransportEvent::Error(e.to_string())).await {
                        emit(&events, id, TransportEvent::Closed).await;
                    }
                    break;
                }
                None => {
                    emit(&events, id, TransportEvent::Closed).await;
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_socket_event_new() {
        let event = SocketEvent::new(3, TransportEvent::Opened);
        assert_eq!(event.socket, 3);
        assert_eq!(event.event, TransportEvent::Opened);
    }

    #[tokio::test]
    async fn test_unreachable_url_reports_error_then_closed() {
        // Bind then release a port so nothing is listening on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let (tx, mut rx) = mpsc::channel(8);
        let _handle = SocketHandle::spawn(1, format!("ws://{addr}"), tx);

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timely event")
            .expect("event");
        assert_eq!(first.socket, 1);
        assert!(matches!(first.event, TransportEvent::Error(_)));

        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timely event")
            .expect("event");
        assert_eq!(second.event, TransportEvent::Closed);
    }

    #[tokio::test]
    async fn test_close_before_handshake_emits_nothing() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = SocketHandle::spawn(2, "ws://10.255.255.1:81".to_string(), tx);
        handle.close();

        let next = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("task should exit promptly");
        assert!(next.is_none());
    }
}

//! Realtime notification channel.
//!
//! One [`ChannelHub`] per process, shared by every connected client. There
//! is no per-room partitioning and no authentication on the channel itself;
//! any socket connection can send and receive.
//!
//! The hub offers no delivery guarantees beyond "eventually visible to
//! currently-connected sockets if no error occurred": no acknowledgements,
//! no ordering across concurrent senders, no reconnection protocol. Two
//! concurrent `message` events may interleave their persist/re-fetch pairs
//! in either order; that race is accepted. Store failures are logged
//! server-side and the affected client receives nothing.

pub mod protocol;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::db::RepositoryError;
use crate::models::message::ChatMessage;

pub use protocol::{ClientEvent, ServerEvent};

/// Persistence port for chat messages.
///
/// Implemented by the sqlx-backed `MessageRepository`; tests substitute an
/// in-memory store.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message.
    async fn append(&self, user: &str, body: &str) -> Result<ChatMessage, RepositoryError>;

    /// Fetch the full history in insertion order.
    async fn history(&self) -> Result<Vec<ChatMessage>, RepositoryError>;
}

/// Identifier for one connected socket, used to address "everyone else"
/// broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnId(u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A broadcast envelope: the event plus an optional excluded connection.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Connection that must NOT receive this event, if any.
    pub except: Option<ConnId>,
    /// The event to deliver.
    pub event: ServerEvent,
}

/// Broadcast buffer size per receiver. A slow client that falls further
/// behind than this loses frames (logged as lag), never blocks the sender.
const CHANNEL_CAPACITY: usize = 64;

/// The process-wide realtime channel.
///
/// Cheaply cloneable; all clones share one broadcast sender and one store
/// handle.
#[derive(Clone)]
pub struct ChannelHub {
    tx: broadcast::Sender<Envelope>,
    next_conn_id: Arc<AtomicU64>,
    store: Arc<dyn MessageStore>,
}

impl ChannelHub {
    /// Create a new hub over the given message store.
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            next_conn_id: Arc::new(AtomicU64::new(0)),
            store,
        }
    }

    /// Register a new connection: returns its ID and a receiver of
    /// broadcast envelopes.
    #[must_use]
    pub fn subscribe(&self) -> (ConnId, broadcast::Receiver<Envelope>) {
        let id = ConnId(self.next_conn_id.fetch_add(1, Ordering::Relaxed));
        (id, self.tx.subscribe())
    }

    /// Emit an event to every connected client.
    pub fn emit_all(&self, event: ServerEvent) {
        // Send only fails when no receiver exists, which is fine
        let _ = self.tx.send(Envelope {
            except: None,
            event,
        });
    }

    /// Emit an event to every connected client except one.
    pub fn emit_except(&self, conn: ConnId, event: ServerEvent) {
        let _ = self.tx.send(Envelope {
            except: Some(conn),
            event,
        });
    }

    /// Run the on-connect sequence for a new client.
    ///
    /// Alerts everyone else, then returns the history event to send to the
    /// new client only. A history fetch failure is logged and yields `None`:
    /// the client receives nothing and no error frame is emitted.
    pub async fn connect_events(&self, conn: ConnId) -> Option<ServerEvent> {
        self.emit_except(conn, ServerEvent::Alert);

        match self.store.history().await {
            Ok(messages) => Some(ServerEvent::Messages(messages)),
            Err(e) => {
                tracing::error!(error = %e, %conn, "failed to fetch chat history on connect");
                None
            }
        }
    }

    /// Handle one client event.
    ///
    /// `message`: persist, then re-fetch the full history and broadcast it
    /// to all clients, sender included. `productList`: relay the payload
    /// verbatim to all clients. Failures are logged only; no client is
    /// notified and nothing is retried.
    pub async fn handle_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::Message { user, message } => {
                match self.store.append(&user, &message).await {
                    Ok(_) => match self.store.history().await {
                        Ok(messages) => self.emit_all(ServerEvent::Messages(messages)),
                        Err(e) => {
                            tracing::error!(error = %e, "failed to re-fetch chat history");
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "failed to persist chat message");
                    }
                }
            }
            ClientEvent::ProductList(payload) => {
                self.emit_all(ServerEvent::UpdatedProducts(payload));
            }
        }
    }
}

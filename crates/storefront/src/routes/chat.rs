//! Chat view and the realtime channel socket handler.
//!
//! The socket endpoint itself performs no authentication check: any
//! connection, logged in or not, can send and receive (see DESIGN.md).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::{IntoResponse, Response},
};
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::sync::broadcast::error::RecvError;

use crate::middleware::RequireUser;
use crate::models::session::CurrentUser;
use crate::realtime::{ChannelHub, ClientEvent, ServerEvent};
use crate::state::AppState;

// =============================================================================
// View
// =============================================================================

/// Chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    /// The logged-in user; the widget pre-fills the sender label with their
    /// email.
    pub user: CurrentUser,
}

/// Display the chat page.
pub async fn chat_page(RequireUser(user): RequireUser) -> impl IntoResponse {
    ChatTemplate { user }
}

// =============================================================================
// Socket
// =============================================================================

/// Upgrade the connection and hand it to the channel.
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one socket: run the on-connect sequence, then pump broadcasts out
/// and client events in until either side closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let hub = state.channel().clone();
    let (conn_id, mut rx) = hub.subscribe();
    tracing::info!(%conn_id, "channel client connected");

    let (mut sender, receiver) = socket.split();

    // Alert everyone else; seed this client with the history. A fetch
    // failure was already logged and the client simply receives nothing.
    if let Some(event) = hub.connect_events(conn_id).await
        && send_event(&mut sender, &event).await.is_err()
    {
        tracing::info!(%conn_id, "channel client left during handshake");
        return;
    }

    // Outbound: forward broadcast envelopes not addressed away from us
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(envelope) => {
                    if envelope.except == Some(conn_id) {
                        continue;
                    }
                    if send_event(&mut sender, &envelope.event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%conn_id, skipped, "channel receiver lagging");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Inbound: parse client frames and hand them to the hub
    let mut recv_task = tokio::spawn(read_client_events(receiver, hub.clone()));

    // Whichever half finishes first tears down the other
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(%conn_id, "channel client disconnected");
}

/// Read loop for one client's incoming frames.
///
/// Malformed frames are logged and dropped; no error frame goes back.
async fn read_client_events(mut receiver: SplitStream<WebSocket>, hub: ChannelHub) {
    while let Some(Ok(frame)) = receiver.next().await {
        match frame {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => hub.handle_event(event).await,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed channel frame");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
}

/// Serialize and send one event on a socket.
///
/// A serialization failure is logged and swallowed; only transport errors
/// propagate, signalling the connection is gone.
async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize server event");
            Ok(())
        }
    }
}

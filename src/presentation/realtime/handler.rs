//! WebSocket connection handler.
//!
//! One task per connection: the socket is split, outbound events flow through
//! an unbounded channel owned by a forwarding task, inbound frames are parsed
//! into `ClientEvent`s and dispatched against the shared hub. Teardown is
//! unconditional; the hub handles the rest.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use super::bridge;
use super::events::{ClientEvent, ConnectionId, ServerEvent};
use super::hub::Hub;
use super::voice;
use crate::domain::{RoomKey, User};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Handshake query parameters.
#[derive(Debug, Deserialize)]
pub struct GatewayParams {
    token: Option<String>,
}

/// WebSocket upgrade handler. The session bridge runs before the upgrade is
/// accepted; unauthenticated attempts are refused at the handshake.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<GatewayParams>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);
    let token = params.token.or(bearer);

    let identity = bridge::resolve_identity(&state, token.as_deref()).await?;

    let max_message_size = state.settings.websocket.max_message_size;
    Ok(ws
        .max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

/// Drive one connection until the peer goes away.
async fn handle_socket(socket: WebSocket, state: AppState, identity: User) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Outbound queue: the hub pushes events here, this task owns the write
    // half of the socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let user_id = identity.id;
    let connection_id = state.hub.connect(user_id, tx);

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => dispatch(&state.hub, connection_id, event),
                    Err(e) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            error = %e,
                            "Ignoring malformed frame"
                        );
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // Ping/pong handled by axum, binary frames ignored.
            }
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    state.hub.disconnect(connection_id);
    sender_task.abort();

    tracing::info!(user_id, connection_id = %connection_id, "User disconnected");
}

/// Route one inbound event to the membership table, typing notifier or
/// signaling relay.
fn dispatch(hub: &Hub, connection_id: ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::RoomJoin { room } => match room.parse::<RoomKey>() {
            Ok(key) => hub.join(connection_id, key),
            Err(e) => tracing::debug!(room = %room, error = %e, "Rejected room join"),
        },
        ClientEvent::RoomLeave { room } => match room.parse::<RoomKey>() {
            Ok(key) => hub.leave(connection_id, &key),
            Err(e) => tracing::debug!(room = %room, error = %e, "Rejected room leave"),
        },
        ClientEvent::Typing { room } => match room.parse::<RoomKey>() {
            Ok(key) => hub.notify_typing(connection_id, &key),
            Err(e) => tracing::debug!(room = %room, error = %e, "Rejected typing notify"),
        },
        ClientEvent::VoiceJoin { room } => voice::join(hub, connection_id, &room),
        ClientEvent::VoiceLeave { room } => voice::leave(hub, connection_id, &room),
        ClientEvent::VoiceSignal { room, data, to } => {
            voice::signal(hub, connection_id, &room, data, to)
        }
    }
}

//! `WebSocket` boundary.
//!
//! Clients connect to `GET /ws` and send one `{action, data, sessionId}`
//! envelope per text frame. Every frame is answered with a
//! [`ServerMessage`], including frames that fail to decode; a bad frame
//! never closes the connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use endless_types::{ClientEnvelope, ClientMessage, GetMapData, RawEnvelope, ServerMessage};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Action name echoed when the envelope itself could not be read.
const UNKNOWN_ACTION: &str = "unknown";

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "WebSocket client connected");

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = dispatch(&state, text.as_str()).await;
                debug!(
                    %connection_id,
                    action = %reply.action,
                    reply_type = ?reply.reply_type,
                    "WebSocket message handled"
                );
                let json = match serde_json::to_string(&reply) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!(%connection_id, "Failed to serialize reply: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(%connection_id, "WebSocket send failed");
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    debug!(%connection_id, "WebSocket pong failed");
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!(%connection_id, "WebSocket error: {e}");
                break;
            }
            Ok(Message::Binary(_) | Message::Pong(_)) => {}
        }
    }

    info!(%connection_id, "WebSocket client disconnected");
}

/// Decode one text frame, run its action, and build the reply.
pub async fn dispatch(state: &AppState, text: &str) -> ServerMessage {
    let raw: RawEnvelope = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(e) => return ServerMessage::failure(UNKNOWN_ACTION, format!("invalid message: {e}")),
    };
    let action = raw.action.clone();
    let envelope = match ClientEnvelope::try_from(raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            let reason = format!("invalid {action} payload: {e}");
            return ServerMessage::failure(action, reason);
        }
    };

    match handle_message(state, envelope).await {
        Ok(data) => ServerMessage::success(action, data),
        Err(e) => ServerMessage::failure(action, e.to_string()),
    }
}

async fn handle_message(state: &AppState, envelope: ClientEnvelope) -> Result<Value, ApiError> {
    let ClientEnvelope {
        session_id,
        message,
    } = envelope;
    match message {
        ClientMessage::JoinGame => reply_data(&state.get_session(&session_id).await?),
        ClientMessage::Move(data) => {
            reply_data(&state.update_session(&session_id, &data.into()).await?)
        }
        ClientMessage::SaveGameState(patch) => {
            reply_data(&state.update_session(&session_id, &patch).await?)
        }
        ClientMessage::GetMap(GetMapData { map_id }) => reply_data(&state.get_map(&map_id).await?),
        ClientMessage::GenerateMap(request) => reply_data(&state.generate_map(request).await?),
    }
}

fn reply_data<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::Storage(format!("failed to encode reply: {e}")))
}

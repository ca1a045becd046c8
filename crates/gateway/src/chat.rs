//! The chat protocol.
//!
//! - `GET  /ws`  : WebSocket, one JSON frame per message
//! - `POST /chat`: the same request and response bodies over plain HTTP
//!
//! Client frame: `{"type":"chat_message","message":"...","history":[...]}`
//! Server frame: `{"type":"chat_response","response":"..."}` or
//! `{"type":"chat_response","error":"..."}`
//!
//! The server keeps no conversation state; the client resends its history
//! with every message.

use axum::{
    extract::{
        State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use personachat_core::message::Message;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{MAX_BODY_BYTES, SharedState};

/// A visitor message plus the conversation so far.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

/// Frames a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    ChatMessage(ChatRequest),
}

/// The reply to one chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    const KIND: &'static str = "chat_response";

    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            kind: Self::KIND,
            response: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: Self::KIND,
            response: None,
            error: Some(message.into()),
        }
    }
}

async fn answer(state: &SharedState, request: ChatRequest) -> Result<ChatResponse, ChatResponse> {
    if request.message.trim().is_empty() {
        return Err(ChatResponse::error("Message must not be empty"));
    }
    let text = state.engine.respond(&request.message, &request.history).await;
    Ok(ChatResponse::reply(text))
}

/// Handle one raw socket frame. Malformed frames produce an error reply.
pub async fn handle_frame(state: &SharedState, connection_id: Uuid, raw: &str) -> ChatResponse {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(%connection_id, error = %e, "Malformed frame");
            return ChatResponse::error(format!("Invalid message: {e}"));
        }
    };

    let ClientFrame::ChatMessage(request) = frame;
    info!(
        %connection_id,
        message_len = request.message.len(),
        history = request.history.len(),
        "Chat message received"
    );
    answer(state, request).await.unwrap_or_else(|err| err)
}

/// `GET /ws`: upgrade to a chat WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.max_message_size(MAX_BODY_BYTES)
        .max_frame_size(MAX_BODY_BYTES)
        .on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(mut socket: WebSocket, state: SharedState) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "WebSocket connection established");

    // Frames are answered one at a time, in arrival order.
    while let Some(msg) = socket.recv().await {
        let text = match msg {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue, // ignore binary, ping, pong
            Err(e) => {
                debug!(%connection_id, error = %e, "WebSocket receive failed");
                break;
            }
        };

        let reply = handle_frame(&state, connection_id, text.as_str()).await;
        let json = serde_json::to_string(&reply).unwrap_or_default();
        if socket.send(WsMessage::Text(json.into())).await.is_err() {
            break; // client disconnected
        }
    }

    info!(%connection_id, "WebSocket connection closed");
}

/// `POST /chat`: one message, one reply.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    info!(
        message_len = request.message.len(),
        history = request.history.len(),
        "Chat request received"
    );
    match answer(&state, request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(err) => (StatusCode::BAD_REQUEST, Json(err)),
    }
}

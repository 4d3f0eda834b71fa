//! WebSocket handling for Viewer connections.
//!
//! Handles the WebSocket protocol between Engine and Viewer clients.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use lampioni_domain::Viewport;
use lampioni_shared::{ClientMessage, ServerMessage};

use super::connections::ConnectionManager;
use crate::app::App;
use crate::use_cases::TimelineError;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Combined state for WebSocket handlers.
pub struct WsState {
    pub app: Arc<App>,
    pub connections: Arc<ConnectionManager>,
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = Uuid::new_v4();

    // Bounded channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    state.connections.register(connection_id, tx.clone());
    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // A fresh connection gets the full current state before anything else.
    for message in state.app.timeline.connection_snapshot().await {
        if tx.send(message).await.is_err() {
            break;
        }
    }

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state).await {
                        if tx.try_send(response).is_err() {
                            tracing::warn!(
                                connection_id = %connection_id,
                                "Failed to send response, channel full or closed"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
                    let _ = tx.try_send(ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {e}"),
                    });
                }
            },
            Ok(Message::Ping(_)) => {
                let _ = tx.try_send(ServerMessage::Pong);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    state.connections.unregister(connection_id);
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}

/// Dispatch a parsed client message to the appropriate use case.
///
/// Cursor-moving messages answer through the broadcast publish, not a
/// direct reply; only rejections come back on this connection.
async fn handle_message(msg: ClientMessage, state: &WsState) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        ClientMessage::SetCursor { index } => {
            timeline_result(state.app.timeline.set_cursor(index).await)
        }

        ClientMessage::StartPlayback => {
            timeline_result(state.app.timeline.clone().start_playback().await)
        }

        ClientMessage::StopPlayback => {
            state.app.timeline.stop_playback().await;
            None
        }

        ClientMessage::ResetTimeline => timeline_result(state.app.timeline.reset().await),

        ClientMessage::SetViewport { zoom, lat, lng } => {
            state.app.timeline.set_viewport(Viewport { zoom, lat, lng }).await;
            None
        }

        ClientMessage::SetLayerVisibility { layer, visible } => {
            state.app.layers.execute(&layer, visible).await;
            None
        }

        ClientMessage::ApplyHash { hash } => {
            state.app.timeline.apply_hash(&hash).await;
            None
        }
    }
}

/// Convert a timeline rejection into a protocol error.
fn timeline_result(result: Result<(), TimelineError>) -> Option<ServerMessage> {
    match result {
        Ok(()) => None,
        Err(e @ TimelineError::Domain(_)) => Some(ServerMessage::Error {
            code: "CURSOR_OUT_OF_RANGE".to_string(),
            message: e.to_string(),
        }),
        Err(e) => Some(ServerMessage::Error {
            code: "DATA_UNAVAILABLE".to_string(),
            message: e.to_string(),
        }),
    }
}

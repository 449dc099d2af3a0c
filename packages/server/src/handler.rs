//! WebSocket connection handler and HTTP endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use banter_shared::event::ClientEvent;
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{relay, state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4();

    // Create a channel for this connection to receive relayed events
    let (tx, mut rx) = mpsc::unbounded_channel();
    {
        let mut room = state.room.lock().await;
        room.attach(conn_id, tx);
    }
    tracing::info!("Connection '{}' attached", conn_id);

    let (mut sender, mut receiver) = socket.split();

    // Task that parses inbound frames and dispatches them to the relay.
    // Dispatch happens under the room lock, so each event is fully applied
    // before the next one from any connection is considered.
    let state_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", conn_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        tracing::debug!("Connection '{}' sent {:?}", conn_id, event);
                        let mut room = state_recv.room.lock().await;
                        relay::handle_event(&mut room, conn_id, event);
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Dropping unparseable frame from '{}': {}",
                            conn_id,
                            e
                        );
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", conn_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Task that serializes queued events and pushes them to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Abrupt drops and clean closes take the same cleanup path
    {
        let mut room = state.room.lock().await;
        relay::handle_disconnect(&mut room, conn_id);
    }
    tracing::info!("Connection '{}' detached", conn_id);
}

/// Read-only view of the relay for `GET /api/users`. Connection and user
/// counts differ while connections are still anonymous.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersResponse {
    pub num_users: usize,
    pub num_connections: usize,
    pub usernames: Vec<String>,
}

pub async fn get_online_users(State(state): State<Arc<AppState>>) -> Json<OnlineUsersResponse> {
    let room = state.room.lock().await;
    let mut usernames: Vec<String> = room.registry.snapshot().into_keys().collect();
    // Sort for consistent ordering
    usernames.sort();
    Json(OnlineUsersResponse {
        num_users: room.registry.user_count(),
        num_connections: room.client_count(),
        usernames,
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

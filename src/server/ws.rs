//! WebSocket handler for the volume event channel.
//!
//! Each connection becomes the bridge's sole subscriber. Captured events are
//! sent as text frames carrying the literal tag (`volume_up` / `volume_down`).
//! A connection that gets replaced by a newer one stops receiving frames but
//! is left open until the client closes it.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::server::auth::is_authorized;
use crate::server::state::AppState;

/// WebSocket upgrade handler.
///
/// Auth is checked before the upgrade headers, so an unauthorized request
/// always gets an empty `204`.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    if !is_authorized(&headers, &state.token) {
        return StatusCode::NO_CONTENT.into_response();
    }
    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state)),
        Err(rejection) => rejection.into_response(),
    }
}

/// Handles an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut subscription = state.bridge.subscribe();
    let id = subscription.id();

    // Resolves to true when the subscription ended (replaced or cancelled),
    // false when the client could no longer be written to.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            if sender
                .send(Message::Text(event.as_str().to_string()))
                .await
                .is_err()
            {
                return false;
            }
        }
        true
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        ended = &mut send_task => {
            if matches!(ended, Ok(true)) {
                tracing::debug!(subscription = %id, "Subscription ended, waiting for client to close");
                let _ = recv_task.await;
            } else {
                recv_task.abort();
            }
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    state.bridge.broker().cancel(id);
    tracing::debug!(subscription = %id, "WebSocket connection closed");
}

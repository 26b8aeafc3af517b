//! WebSocket endpoint for live sessions
//!
//! Each socket is split. Outbound frames are queued on an unbounded channel and
//! written by a dedicated task, so nothing in the session layer ever waits on a
//! peer. Inbound text frames are handled one at a time, in arrival order.

use crate::api::AppState;
use crate::session::SessionHandler;
use crate::transport::{ChannelTransport, Transport};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use shared::{CommandType, GameId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, sessions))
}

async fn handle_socket(socket: WebSocket, sessions: SessionHandler) {
    let (mut sender, mut receiver) = socket.split();
    let (transport, mut outbound) = ChannelTransport::pair();
    let transport: Arc<dyn Transport> = Arc::new(transport);
    info!("[WS] socket opened");

    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Groups this socket joined, released on close
    let mut joined: HashSet<(GameId, String)> = HashSet::new();

    while let Some(Ok(message)) = receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let command = match sessions.handle_text(text.as_str(), &transport).await {
            Ok(command) => command,
            Err(e) => {
                debug!("[WS] command refused: {}", e);
                continue;
            }
        };
        let key = (command.game_id, command.auth_token);
        match command.command_type {
            CommandType::Connect => {
                joined.insert(key);
            }
            CommandType::Leave => {
                joined.remove(&key);
            }
            _ => {}
        }
    }

    for (game_id, token) in &joined {
        sessions.registry().release(*game_id, token, &transport);
    }
    writer.abort();
    debug!("[WS] socket closed after joining {} game(s)", joined.len());
}

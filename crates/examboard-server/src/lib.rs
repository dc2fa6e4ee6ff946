//! Examboard relay.
//!
//! Generic publish/broadcast rooms keyed by board identifier: every text
//! frame a client sends on `/ws/board/{board}` is forwarded verbatim to all
//! other clients of the same board. The relay never parses, validates, or
//! stores board content — the clients own the protocol
//! (`examboard_core::sync::SyncMessage`). No history, no acknowledgement,
//! no authentication.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::{collections::HashSet, sync::Arc};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// One shared board: the fan-out channel and its connected peers.
struct Board {
    tx: broadcast::Sender<(String, String)>,
    peers: HashSet<String>,
}

impl Board {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            peers: HashSet::new(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    boards: DashMap<String, Board>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            boards: DashMap::new(),
        }
    }

    /// Subscribe a peer to a board, creating the board on first join.
    fn join(&self, board_id: &str, peer_id: &str) -> (broadcast::Receiver<(String, String)>, usize) {
        let mut board = self
            .boards
            .entry(board_id.to_string())
            .or_insert_with(Board::new);
        board.peers.insert(peer_id.to_string());
        (board.tx.subscribe(), board.peers.len())
    }

    /// Drop a peer; empty boards are removed.
    fn leave(&self, board_id: &str, peer_id: &str) {
        if let Some(mut board) = self.boards.get_mut(board_id) {
            board.peers.remove(peer_id);
            if board.peers.is_empty() {
                drop(board);
                self.boards.remove(board_id);
            }
        }
    }

    /// Forward a frame to every subscriber of the board. Receivers filter
    /// out their own frames by peer id.
    fn publish(&self, board_id: &str, from: &str, frame: String) {
        if let Some(board) = self.boards.get(board_id) {
            let _ = board.tx.send((from.to_string(), frame));
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the relay router.
pub fn router() -> Router {
    let state = Arc::new(AppState::new());
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws/board/{board}", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "Examboard relay - connect via WebSocket at /ws/board/{board}"
}

async fn health() -> &'static str {
    "ok"
}

/// WebSocket upgrade handler for one board.
async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(board): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, board, state))
}

/// Pump one peer's connection until it closes.
async fn handle_socket(socket: WebSocket, board_id: String, state: Arc<AppState>) {
    let peer_id = Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();

    let (mut board_rx, peer_count) = state.join(&board_id, &peer_id);
    info!("peer {peer_id} joined board {board_id} ({peer_count} connected)");

    loop {
        tokio::select! {
            // Frames from this peer fan out to the rest of the board.
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        state.publish(&board_id, &peer_id, text.to_string());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // binary/ping/pong ignored
                    Some(Err(e)) => {
                        warn!("socket error for peer {peer_id}: {e}");
                        break;
                    }
                }
            }

            // Frames from the rest of the board go out to this peer.
            published = board_rx.recv() => {
                match published {
                    Ok((from, frame)) => {
                        if from != peer_id
                            && sender.send(Message::Text(frame.into())).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("peer {peer_id} lagged, {n} frames dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    state.leave(&board_id, &peer_id);
    info!("peer {peer_id} left board {board_id}");
}

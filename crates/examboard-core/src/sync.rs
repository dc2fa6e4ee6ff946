//! Sync wire protocol and the per-board message channel.
//!
//! One channel exists per board identifier, shared by every viewer of that
//! board. Local mutations are broadcast as [`SyncMessage`]s; remote ones are
//! surfaced as [`ChannelEvent`]s for the session to apply. Delivery is
//! best-effort: there is no queue, no retry, no acknowledgement.

use crate::shapes::BoardObject;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tungstenite::{connect, Message};
use url::Url;

/// A board mutation crossing the relay.
///
/// Messages carry no sender identity, timestamp, or version counter;
/// removal is keyed by the sender's index at time of removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncMessage {
    AddObject { object: BoardObject },
    RemoveObject { index: usize },
    ClearAll,
}

/// Channel errors.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("invalid relay url: {0}")]
    InvalidUrl(String),
    #[error("already connected")]
    AlreadyConnected,
    #[error("channel is not open")]
    NotOpen,
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events surfaced by the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connected,
    Disconnected,
    /// A mutation from another viewer of this board.
    Message(SyncMessage),
    Error(String),
}

/// Endpoint for one board on the relay, e.g.
/// `board_url("ws://localhost:8000", "algebra-v12")`.
pub fn board_url(base: &str, board_id: &str) -> Result<String, ChannelError> {
    let parsed = Url::parse(base).map_err(|e| ChannelError::InvalidUrl(e.to_string()))?;
    if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
        return Err(ChannelError::InvalidUrl(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    let endpoint = parsed
        .join(&format!("/ws/board/{board_id}"))
        .map_err(|e| ChannelError::InvalidUrl(e.to_string()))?;
    Ok(endpoint.to_string())
}

/// Commands sent to the socket thread.
enum WsCommand {
    Send(String),
    Close,
}

/// Duplex message channel to the relay for one board.
///
/// A background thread owns the socket so the event-loop side never blocks;
/// events are drained with [`poll_events`](Self::poll_events).
pub struct BoardChannel {
    state: ChannelState,
    events: Vec<ChannelEvent>,
    cmd_tx: Option<Sender<WsCommand>>,
    event_rx: Option<Receiver<ChannelEvent>>,
    _thread: Option<JoinHandle<()>>,
}

impl BoardChannel {
    /// Create a new disconnected channel.
    pub fn new() -> Self {
        Self {
            state: ChannelState::Disconnected,
            events: Vec::new(),
            cmd_tx: None,
            event_rx: None,
            _thread: None,
        }
    }

    /// Connect to the relay endpoint for one board.
    pub fn connect(&mut self, url: &str) -> Result<(), ChannelError> {
        if self.cmd_tx.is_some() {
            return Err(ChannelError::AlreadyConnected);
        }

        let parsed = Url::parse(url).map_err(|e| ChannelError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
            return Err(ChannelError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        self.state = ChannelState::Connecting;

        let (cmd_tx, cmd_rx) = channel::<WsCommand>();
        let (event_tx, event_rx) = channel::<ChannelEvent>();
        let url = url.to_string();

        let handle = thread::spawn(move || {
            log::info!("board channel: connecting to {url}");
            socket_loop(&url, &cmd_rx, &event_tx);
        });

        self.cmd_tx = Some(cmd_tx);
        self.event_rx = Some(event_rx);
        self._thread = Some(handle);

        Ok(())
    }

    /// Disconnect from the relay.
    pub fn disconnect(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(WsCommand::Close);
        }
        self.event_rx = None;
        self._thread = None;
        self.state = ChannelState::Disconnected;
    }

    /// Send an encoded sync message.
    ///
    /// Callers treat failure as "channel not open" and drop the broadcast —
    /// the local mutation has already been applied.
    pub fn send(&self, json: &str) -> Result<(), ChannelError> {
        match self.cmd_tx {
            Some(ref tx) => tx
                .send(WsCommand::Send(json.to_string()))
                .map_err(|_| ChannelError::NotOpen),
            None => Err(ChannelError::NotOpen),
        }
    }

    /// Drain pending events (non-blocking) and track connection state.
    pub fn poll_events(&mut self) -> Vec<ChannelEvent> {
        if let Some(ref rx) = self.event_rx {
            while let Ok(event) = rx.try_recv() {
                match event {
                    ChannelEvent::Connected => self.state = ChannelState::Connected,
                    ChannelEvent::Disconnected => self.state = ChannelState::Disconnected,
                    ChannelEvent::Error(_) => self.state = ChannelState::Error,
                    ChannelEvent::Message(_) => {}
                }
                self.events.push(event);
            }
        }
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Connected
    }
}

/// Blocking socket loop run on the channel's background thread.
fn socket_loop(url: &str, cmd_rx: &Receiver<WsCommand>, event_tx: &Sender<ChannelEvent>) {
    let (mut socket, response) = match connect(url) {
        Ok(ok) => ok,
        Err(e) => {
            log::error!("board channel connection failed: {e}");
            let _ = event_tx.send(ChannelEvent::Error(format!("connection failed: {e}")));
            return;
        }
    };

    log::info!("board channel connected, status: {}", response.status());
    let _ = event_tx.send(ChannelEvent::Connected);

    // Short read timeout keeps the loop responsive to outgoing commands
    // without spinning.
    if let tungstenite::stream::MaybeTlsStream::Plain(tcp) = socket.get_mut() {
        let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
        let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
    }

    loop {
        match cmd_rx.try_recv() {
            Ok(WsCommand::Send(json)) => {
                log::debug!("board channel sending: {}", &json[..json.len().min(120)]);
                if let Err(e) = socket.send(Message::Text(json)) {
                    log::error!("board channel send error: {e}");
                    break;
                }
            }
            Ok(WsCommand::Close) | Err(TryRecvError::Disconnected) => {
                let _ = socket.close(None);
                break;
            }
            Err(TryRecvError::Empty) => {}
        }

        match socket.read() {
            Ok(Message::Text(text)) => match serde_json::from_str::<SyncMessage>(&text) {
                Ok(message) => {
                    let _ = event_tx.send(ChannelEvent::Message(message));
                }
                // Malformed remote messages are skipped, never fatal.
                Err(e) => log::warn!("board channel: unparseable message ({e}): {text}"),
            },
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut => {}
            Err(e) => {
                log::error!("board channel read error: {e}");
                break;
            }
        }
    }

    let _ = event_tx.send(ChannelEvent::Disconnected);
}

impl Default for BoardChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BoardChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Color, Stroke};
    use kurbo::Point;

    #[test]
    fn test_add_object_wire_format() {
        let stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            Color::black(),
            3.0,
        );
        let msg = SyncMessage::AddObject {
            object: BoardObject::Line(stroke),
        };
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains(r#""action":"add_object""#));
        assert!(json.contains(r#""type":"line""#));

        let parsed: SyncMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_remove_and_clear_wire_format() {
        assert_eq!(
            serde_json::to_string(&SyncMessage::RemoveObject { index: 4 }).unwrap(),
            r#"{"action":"remove_object","index":4}"#
        );
        assert_eq!(
            serde_json::to_string(&SyncMessage::ClearAll).unwrap(),
            r#"{"action":"clear_all"}"#
        );
    }

    #[test]
    fn test_malformed_message_is_rejected() {
        assert!(serde_json::from_str::<SyncMessage>("{\"action\":\"resize\"}").is_err());
        assert!(serde_json::from_str::<SyncMessage>("not json").is_err());
    }

    #[test]
    fn test_board_url() {
        assert_eq!(
            board_url("ws://localhost:8000", "test").unwrap(),
            "ws://localhost:8000/ws/board/test"
        );
        assert!(board_url("http://localhost:8000", "test").is_err());
        assert!(board_url("not a url", "test").is_err());
    }

    #[test]
    fn test_send_without_connection() {
        let channel = BoardChannel::new();
        assert!(matches!(
            channel.send("{}"),
            Err(ChannelError::NotOpen)
        ));
    }
}

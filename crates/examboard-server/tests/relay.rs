//! End-to-end relay tests driving real WebSocket clients.

use std::time::Duration;

use examboard_core::shapes::{BoardObject, Color, Stroke};
use examboard_core::surface::SurfaceGeometry;
use examboard_core::sync::{board_url, BoardChannel, ChannelEvent, SyncMessage};
use examboard_core::tools::Tool;
use examboard_core::{BoardSession, PointerEvent};
use futures_util::{SinkExt, StreamExt};
use kurbo::{Point, Size};
use tokio::time::{sleep, timeout, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

/// Serve the relay on an ephemeral port, return its ws base url.
async fn spawn_relay() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, examboard_server::router())
            .await
            .unwrap();
    });
    format!("ws://{addr}")
}

/// Poll a channel until a sync message arrives.
async fn recv_message(channel: &mut BoardChannel) -> SyncMessage {
    let deadline = Instant::now() + WAIT;
    loop {
        for event in channel.poll_events() {
            if let ChannelEvent::Message(message) = event {
                return message;
            }
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for a sync message"
        );
        sleep(Duration::from_millis(20)).await;
    }
}

fn add_object_json() -> String {
    let stroke = Stroke::from_points(
        vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
        ],
        Color::black(),
        3.0,
    );
    serde_json::to_string(&SyncMessage::AddObject {
        object: BoardObject::Line(stroke),
    })
    .unwrap()
}

#[tokio::test]
async fn relay_forwards_frames_verbatim_to_other_peers() {
    let base = spawn_relay().await;
    let endpoint = format!("{base}/ws/board/demo");

    let (mut a, _) = connect_async(endpoint.as_str()).await.unwrap();
    let (mut b, _) = connect_async(endpoint.as_str()).await.unwrap();
    // Let both peers finish subscribing before the first publish.
    sleep(Duration::from_millis(100)).await;

    let json = add_object_json();
    a.send(Message::Text(json.clone().into())).await.unwrap();

    let frame = timeout(WAIT, b.next())
        .await
        .expect("no frame within deadline")
        .expect("stream ended")
        .expect("socket error");
    let Message::Text(text) = frame else {
        panic!("expected a text frame");
    };
    assert_eq!(text.as_str(), json);
    assert!(matches!(
        serde_json::from_str::<SyncMessage>(&text).unwrap(),
        SyncMessage::AddObject { .. }
    ));

    // The sender must not receive its own frame back.
    assert!(
        timeout(Duration::from_millis(300), a.next()).await.is_err(),
        "frame was echoed to its sender"
    );
}

#[tokio::test]
async fn boards_are_isolated() {
    let base = spawn_relay().await;
    let (mut a, _) = connect_async(format!("{base}/ws/board/alpha")).await.unwrap();
    let (mut b, _) = connect_async(format!("{base}/ws/board/beta")).await.unwrap();
    sleep(Duration::from_millis(100)).await;

    a.send(Message::Text(r#"{"action":"clear_all"}"#.into()))
        .await
        .unwrap();

    assert!(
        timeout(Duration::from_millis(300), b.next()).await.is_err(),
        "frame crossed the board boundary"
    );
}

#[tokio::test]
async fn shared_stroke_lifecycle_across_real_channels() {
    let base = spawn_relay().await;
    let endpoint = board_url(&base, "variant-7").unwrap();

    let mut chan_a = BoardChannel::new();
    chan_a.connect(&endpoint).unwrap();
    let mut chan_b = BoardChannel::new();
    chan_b.connect(&endpoint).unwrap();

    let deadline = Instant::now() + WAIT;
    while !(chan_a.is_open() && chan_b.is_open()) {
        chan_a.poll_events();
        chan_b.poll_events();
        assert!(Instant::now() < deadline, "channels failed to open");
        sleep(Duration::from_millis(20)).await;
    }
    sleep(Duration::from_millis(100)).await;

    let surface = SurfaceGeometry::new(Size::new(800.0, 600.0));
    let mut a = BoardSession::new(surface);
    let mut b = BoardSession::new(surface);
    a.set_connected(true);
    b.set_connected(true);

    // Client A draws a three-point stroke.
    a.handle_pointer_event(PointerEvent::Down {
        position: Point::new(0.0, 0.0),
        pointer: 1,
    });
    a.handle_pointer_event(PointerEvent::Move {
        position: Point::new(5.0, 5.0),
    });
    a.handle_pointer_event(PointerEvent::Up {
        position: Point::new(5.0, 5.0),
        pointer: 1,
    });
    assert_eq!(a.store().len(), 1);
    for json in a.take_outgoing() {
        chan_a.send(&json).unwrap();
    }

    // Client B converges to the same store.
    let message = recv_message(&mut chan_b).await;
    b.apply_remote(message);
    assert_eq!(b.store().snapshot(), a.store().snapshot());

    // Client A erases the stroke; B receives index 0 and empties too.
    a.set_tool(Tool::Eraser);
    a.handle_pointer_event(PointerEvent::Down {
        position: Point::new(3.0, 3.0),
        pointer: 1,
    });
    assert!(a.store().is_empty());
    for json in a.take_outgoing() {
        chan_a.send(&json).unwrap();
    }

    let message = recv_message(&mut chan_b).await;
    assert_eq!(message, SyncMessage::RemoveObject { index: 0 });
    b.apply_remote(message);
    assert!(b.store().is_empty());

    // Nothing was echoed back to A.
    sleep(Duration::from_millis(200)).await;
    assert!(
        !chan_a
            .poll_events()
            .iter()
            .any(|event| matches!(event, ChannelEvent::Message(_))),
        "sender received its own mutation"
    );

    chan_a.disconnect();
    chan_b.disconnect();
}

//! Examboard relay server binary.

use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "examboard_server=info,tower_http=info".into()),
        )
        .init();

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    info!("examboard relay listening on {addr}");
    info!("board endpoint: ws://localhost:8000/ws/board/{{board}}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind relay address");
    axum::serve(listener, examboard_server::router())
        .await
        .expect("relay server failed");
}

//! In-process test server and WebSocket helpers shared by integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::StreamExt;
use hiroba_server::{
    ServerError,
    domain::{ConnectionRegistry, TokenService, Username},
    infrastructure::auth::JwtTokenService,
    ui::{Stores, serve, state::AppState},
};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{oneshot, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::CloseFrame},
};

pub const TEST_SECRET: &str = "integration-test-secret";

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Server bound to an ephemeral port with in-memory stores
pub struct TestServer {
    port: u16,
    pub state: Arc<AppState>,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let stores = Stores::in_memory(200);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(AppState::new(
            stores.messages.clone(),
            stores.users.clone(),
            TEST_SECRET,
            shutdown_rx,
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local address").port();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, state.clone(), shutdown_tx, async move {
            let _ = stop_rx.await;
        }));

        Self {
            port,
            state,
            stop: Some(stop_tx),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, path: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://127.0.0.1:{}{}?token={}", self.port, path, token),
            None => format!("ws://127.0.0.1:{}{}", self.port, path),
        }
    }

    /// Token for `username` signed with the server's secret (no user record needed)
    pub fn token_for(&self, username: &str) -> String {
        JwtTokenService::new(TEST_SECRET)
            .issue(&Username::new(username.to_string()).expect("Invalid username"))
            .expect("Failed to issue token")
    }

    /// Open an authenticated WebSocket and wait until it is registered
    pub async fn connect(&self, username: &str) -> WsClient {
        let before = self.state.registry.count().await;
        let url = self.ws_url("/ws", Some(&self.token_for(username)));
        let (ws, _) = connect_async(url).await.expect("Failed to connect");
        self.wait_for_connections(before + 1).await;
        ws
    }

    /// Poll the registry until it holds exactly `expected` connections
    pub async fn wait_for_connections(&self, expected: usize) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while self.state.registry.count().await != expected {
            assert!(
                tokio::time::Instant::now() < deadline,
                "Registry never reached {} connections",
                expected
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Trigger the shutdown signal and wait for `serve` to return
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.expect("Server task panicked")
    }
}

/// Next text frame parsed as JSON
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        match recv(ws).await {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected a text frame, got {:?}", other),
        }
    }
}

/// Next close frame
pub async fn recv_close(ws: &mut WsClient) -> CloseFrame {
    loop {
        match recv(ws).await {
            Message::Close(Some(frame)) => return frame,
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected a close frame, got {:?}", other),
        }
    }
}

/// Assert that nothing arrives within `wait`
pub async fn assert_silent(ws: &mut WsClient, wait: Duration) {
    if let Ok(Some(msg)) = tokio::time::timeout(wait, ws.next()).await {
        panic!("Expected no frame, got {:?}", msg);
    }
}

async fn recv(ws: &mut WsClient) -> Message {
    tokio::time::timeout(RECV_TIMEOUT, ws.next())
        .await
        .expect("Timed out waiting for a frame")
        .expect("Stream ended")
        .expect("WebSocket error")
}

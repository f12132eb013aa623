//! HTTP and WebSocket routes.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_history, get_users, health_check, login, register, websocket_handler},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket handshake (`/` is kept for older clients)
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/history", get(get_history))
        .route("/users", get(get_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Handler modules for HTTP and WebSocket endpoints.

pub mod auth;
pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_history, get_users, health_check, login, register};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;

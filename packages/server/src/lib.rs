//! Real-time chat relay.
//!
//! Authenticated WebSocket clients send text messages; every message is
//! stamped with the sender's identity, appended to a bounded history and
//! broadcast to all live connections.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::run as run_server;

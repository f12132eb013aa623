//! Terminal client for the Hiroba chat relay.
//!
//! Logs in (or registers) over HTTP, prints recent history, then relays typed
//! lines over the WebSocket and prints every broadcast.

pub mod api;
pub mod config;
pub mod error;
pub mod formatter;
pub mod session;

// Re-export entry points
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::run as run_client;

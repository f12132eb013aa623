//! Client error definitions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

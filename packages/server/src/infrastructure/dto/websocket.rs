//! WebSocket message DTOs for the chat application.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// Query parameters for the WebSocket handshake
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Frame sent by a client.
///
/// Only `text` is read. Any other field, `author` included, is ignored: the
/// author is always the identity bound to the connection.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub text: String,
}

/// Chat message broadcast to every live connection and returned by history reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFrame {
    pub author: String,
    pub text: String,
    /// ISO 8601, server-assigned
    pub timestamp: String,
}

impl From<&ChatMessage> for ChatFrame {
    fn from(message: &ChatMessage) -> Self {
        Self {
            author: message.author.as_str().to_string(),
            text: message.text.as_str().to_string(),
            timestamp: message.timestamp.to_iso8601(),
        }
    }
}

//! Core domain models for the chat application.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::value_object::{MessageText, Timestamp, Username};

/// Default maximum number of messages kept in the history
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identity bound to the sending connection
    pub author: Username,
    /// Message body
    pub text: MessageText,
    /// Server time at receipt
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(author: Username, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            author,
            text,
            timestamp,
        }
    }
}

/// A registered user as held by the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: Username,
    /// PHC-formatted password hash
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl User {
    /// Create a new user record
    pub fn new(username: Username, password_hash: String, created_at: Timestamp) -> Self {
        Self {
            username,
            password_hash,
            created_at,
        }
    }
}

/// Bounded, insertion-ordered message log.
///
/// Pushing past `capacity` evicts the oldest entries in the same call, so the
/// log never holds more than `capacity` messages between operations.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl MessageHistory {
    /// Create an empty history with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a message as the newest entry, evicting the oldest overflow.
    ///
    /// Returns the number of evicted messages.
    pub fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push_back(message);
        let mut evicted = 0;
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Up to `limit` newest messages, oldest first
    pub fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages.iter().skip(skip).cloned().collect()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

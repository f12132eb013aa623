//! Repository and registry traits.
//!
//! The domain owns these abstractions; `infrastructure` provides the
//! implementations (dependency inversion).

use async_trait::async_trait;

use super::{
    ChatMessage, Connection, ConnectionId, RepositoryError, User, Username,
};

/// Durable, bounded, insertion-ordered message log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message as the newest entry.
    ///
    /// If the log grows past its capacity the oldest entries are discarded in
    /// the same atomic step. Fullness is never an error.
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// Up to `limit` newest messages, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Maximum number of retained messages.
    fn capacity(&self) -> usize;
}

/// Credential store: username to password hash records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// `RepositoryError::UserAlreadyExists` if the username is taken.
    async fn insert(&self, user: User) -> Result<(), RepositoryError>;

    async fn find(&self, username: &Username) -> Result<Option<User>, RepositoryError>;

    /// All users ordered by creation time.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Result of one broadcast call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the frame was queued for
    pub delivered: usize,
    /// Connections whose send failed; they have been deregistered
    pub dropped: Vec<ConnectionId>,
}

/// Set of live authenticated connections and fan-out over them.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection under a unique handle.
    async fn register(&self, connection_id: ConnectionId, connection: Connection);

    /// Remove a connection. Unknown handles are a no-op.
    ///
    /// Returns whether the handle was registered.
    async fn deregister(&self, connection_id: &ConnectionId) -> bool;

    /// Deliver `message` to every registered connection, sender included.
    ///
    /// Iterates a snapshot of the live set. Failed recipients are deregistered
    /// and reported, never propagated.
    async fn broadcast(&self, message: &ChatMessage) -> BroadcastReport;

    async fn count(&self) -> usize;
}

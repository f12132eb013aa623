//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username starts or ends with whitespace
    #[error("Username cannot start or end with whitespace")]
    UsernameSurroundingWhitespace,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// MessageText validation error
    #[error("MessageText cannot be empty")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },

    /// Timestamp is not ISO 8601
    #[error("Timestamp must be ISO 8601 (got: {0})")]
    TimestampInvalidFormat(String),
}

/// Errors raised by repositories (message store, credential store)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The username is already taken
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    /// Underlying storage failed (I/O, SQL, corrupted row)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors raised when verifying or issuing identity tokens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, format or claims are wrong
    #[error("invalid token")]
    Invalid,

    /// Token was valid but its lifetime has passed
    #[error("token expired")]
    Expired,

    /// Token could not be signed
    #[error("failed to issue token: {0}")]
    Issue(String),
}

/// Errors raised by the password hasher
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// The stored hash could not be parsed
    #[error("malformed password hash: {0}")]
    MalformedHash(String),
}

/// Errors raised when pushing a frame to one connection
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side of the connection is gone
    #[error("connection closed")]
    Closed,

    /// The connection's outbound buffer is full (stalled client)
    #[error("outbound buffer full")]
    Full,
}

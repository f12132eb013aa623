//! Authentication collaborator traits.

use super::{PasswordHashError, TokenError, Username};

/// Issues and verifies signed, time-limited identity tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, identity: &Username) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<Username, TokenError>;
}

/// Slow, salted one-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Compare a plain password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

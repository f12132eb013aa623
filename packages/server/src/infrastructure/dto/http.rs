//! HTTP API request and response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Body of `POST /login` and `POST /register`.
///
/// Fields are optional so that a missing field yields a 400 with a readable
/// error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Token issued after login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

/// Error body for every failed HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Entry of `GET /users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    pub created_at: String, // ISO 8601
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.as_str().to_string(),
            created_at: user.created_at.to_iso8601(),
        }
    }
}

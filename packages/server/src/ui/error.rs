//! HTTP error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::RepositoryError, infrastructure::dto::http::ErrorResponse, usecase::AuthError,
};

/// Error returned by HTTP handlers, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// No credentials were presented
    #[error("{0}")]
    Unauthorized(String),

    /// Credentials were presented but rejected
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::InvalidUsername(_) => {
                ApiError::BadRequest(err.to_string())
            }
            // ログイン失敗は 401（トークン検証の失敗は 403）
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::UserAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::Internal(detail) => ApiError::Internal(detail),
        }
    }
}

/// Unreadable request bodies (bad JSON, wrong field types, missing content type)
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

//! Bearer token extractor for protected HTTP endpoints.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    domain::Username,
    ui::{error::ApiError, state::AppState},
};

/// Identity of the caller, taken from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Username);

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Err(ApiError::Unauthorized("Access token required".to_string()));
        };

        match state.token_service.verify(token) {
            Ok(identity) => Ok(AuthenticatedUser(identity)),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                Err(ApiError::Forbidden("Invalid or expired token".to_string()))
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

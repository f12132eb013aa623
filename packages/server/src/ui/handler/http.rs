//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    infrastructure::dto::{
        http::{AuthResponse, CredentialsRequest, UserDto},
        websocket::ChatFrame,
    },
    ui::{error::ApiError, handler::auth::AuthenticatedUser, state::AppState},
    usecase::{
        FetchHistoryUseCase, IssuedToken, ListUsersUseCase, LoginUseCase, RegisterUserUseCase,
    },
};

impl From<IssuedToken> for AuthResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            username: issued.username.into_string(),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = LoginUseCase::new(
        state.user_repository.clone(),
        state.password_hasher.clone(),
        state.token_service.clone(),
    );

    let issued = usecase.execute(body.username, body.password).await?;
    Ok(Json(issued.into()))
}

/// `POST /register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = RegisterUserUseCase::new(
        state.user_repository.clone(),
        state.password_hasher.clone(),
        state.token_service.clone(),
    );

    let issued = usecase.execute(body.username, body.password).await?;
    Ok(Json(issued.into()))
}

/// `GET /history`: recent messages, oldest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<Vec<ChatFrame>>, ApiError> {
    let usecase = FetchHistoryUseCase::new(state.message_repository.clone());
    let messages = usecase.execute().await?;

    tracing::debug!(identity = %identity, count = messages.len(), "Serving history");
    Ok(Json(messages.iter().map(ChatFrame::from).collect()))
}

/// `GET /users`
pub async fn get_users(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(_): AuthenticatedUser,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let usecase = ListUsersUseCase::new(state.user_repository.clone());
    let users = usecase.execute().await?;

    Ok(Json(users.iter().map(UserDto::from).collect()))
}

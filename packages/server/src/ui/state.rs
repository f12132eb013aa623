//! Shared application state.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{
    domain::{ConnectionRegistry, MessageRepository, PasswordHasher, TokenService, UserRepository},
    infrastructure::{
        InMemoryConnectionRegistry,
        auth::{Argon2PasswordHasher, JwtTokenService},
    },
};

/// Outbound frames queued per connection before it counts as stalled
pub const OUTBOUND_BUFFER: usize = 64;

/// Upper bound for writing one frame to a socket
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state
pub struct AppState {
    /// Message Store（履歴）
    pub message_repository: Arc<dyn MessageRepository>,
    /// Credential store
    pub user_repository: Arc<dyn UserRepository>,
    /// 接続中の WebSocket セッション
    pub registry: Arc<dyn ConnectionRegistry>,
    pub token_service: Arc<dyn TokenService>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub outbound_buffer: usize,
    pub write_timeout: Duration,
    /// `true` になったら各セッションは 1001 で閉じる
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// Wire the stores with a fresh registry, JWT tokens signed with
    /// `jwt_secret` and Argon2 password hashing
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        user_repository: Arc<dyn UserRepository>,
        jwt_secret: &str,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            message_repository,
            user_repository,
            registry: Arc::new(InMemoryConnectionRegistry::new()),
            token_service: Arc::new(JwtTokenService::new(jwt_secret)),
            password_hasher: Arc::new(Argon2PasswordHasher::new()),
            outbound_buffer: OUTBOUND_BUFFER,
            write_timeout: WRITE_TIMEOUT,
            shutdown,
        }
    }
}

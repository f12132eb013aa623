//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{
    PasswordHashError, RepositoryError, SessionError, TokenError, ValueObjectError,
};

/// WebSocket セッション確立時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// ハンドシェイクにトークンが無い
    #[error("authentication required")]
    AuthenticationRequired,

    /// トークンの検証に失敗（署名不正・期限切れ）
    #[error("invalid token: {0}")]
    InvalidToken(TokenError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// 受信フレーム処理時のエラー（いずれも接続は維持される）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// JSON でない、または文字列の `text` フィールドが無い
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// `text` が空、または長すぎる
    #[error("invalid message text: {0}")]
    InvalidText(#[from] ValueObjectError),
}

/// ログイン・ユーザー登録時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username and password required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UserAlreadyExists(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(ValueObjectError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UserAlreadyExists(name) => AuthError::UserAlreadyExists(name),
            RepositoryError::Storage(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

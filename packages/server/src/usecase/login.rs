//! UseCase: ログイン（資格情報の検証とトークン発行）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：正しいユーザー名とパスワード
//! - 異常系：未入力、存在しないユーザー、パスワード誤り

use std::sync::Arc;

use crate::domain::{PasswordHasher, TokenService, UserRepository, Username};

use super::error::AuthError;

/// 発行されたトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub username: Username,
}

/// 未入力（None または空文字）の資格情報を弾く
pub(super) fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String), AuthError> {
    match (username, password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            Ok((username, password))
        }
        _ => Err(AuthError::MissingCredentials),
    }
}

/// ログインのユースケース
pub struct LoginUseCase {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginUseCase {
    /// 新しい LoginUseCase を作成
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// ログインを実行
    ///
    /// ユーザーが存在しない場合とパスワード誤りは区別せず `InvalidCredentials` を返す。
    pub async fn execute(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<IssuedToken, AuthError> {
        let (username, password) = require_credentials(username, password)?;
        let username = Username::new(username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.users.find(&username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        // パスワードハッシュの検証は CPU を使うため blocking スレッドで行う
        let hasher = self.hasher.clone();
        let valid = tokio::task::spawn_blocking(move || {
            hasher.verify(&password, &user.password_hash)
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))??;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&username)?;
        tracing::info!(username = %username, "User logged in");
        Ok(IssuedToken { token, username })
    }
}

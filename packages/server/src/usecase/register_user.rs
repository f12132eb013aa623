//! UseCase: ユーザー登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() / ensure_user() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの登録とトークン発行
//! - 異常系：重複したユーザー名、未入力、不正なユーザー名
//! - エッジケース：デモユーザーの冪等な作成

use std::sync::Arc;

use crate::domain::{PasswordHasher, Timestamp, TokenService, User, UserRepository, Username};

use super::{
    error::AuthError,
    login::{IssuedToken, require_credentials},
};

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl RegisterUserUseCase {
    /// 新しい RegisterUserUseCase を作成
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

    /// ユーザー登録を実行し、トークンを発行する
    pub async fn execute(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<IssuedToken, AuthError> {
        let (username, password) = require_credentials(username, password)?;
        let username = Username::new(username).map_err(AuthError::InvalidUsername)?;

        self.create(username.clone(), password).await?;

        let token = self.tokens.issue(&username)?;
        tracing::info!(username = %username, "User registered");
        Ok(IssuedToken { token, username })
    }

    /// ユーザーが存在しなければ作成する（デモユーザーの投入用）
    ///
    /// # Returns
    ///
    /// 新規に作成した場合は `true`
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let username = Username::new(username.to_string()).map_err(AuthError::InvalidUsername)?;
        if self.users.find(&username).await?.is_some() {
            return Ok(false);
        }
        match self.create(username, password.to_string()).await {
            Ok(()) => Ok(true),
            Err(AuthError::UserAlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, username: Username, password: String) -> Result<(), AuthError> {
        if self.users.find(&username).await?.is_some() {
            return Err(AuthError::UserAlreadyExists(username.into_string()));
        }

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))??;

        // find と insert の間の競合は insert 側の一意制約で検出される
        self.users
            .insert(User::new(username, password_hash, Timestamp::now()))
            .await?;
        Ok(())
    }
}

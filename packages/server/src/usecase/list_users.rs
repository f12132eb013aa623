//! UseCase: ユーザー一覧の取得

use std::sync::Arc;

use crate::domain::{RepositoryError, User, UserRepository};

/// ユーザー一覧取得のユースケース
pub struct ListUsersUseCase {
    users: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
    /// 新しい ListUsersUseCase を作成
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// 登録済みの全ユーザーを作成日時順で返す
    pub async fn execute(&self) -> Result<Vec<User>, RepositoryError> {
        self.users.list().await
    }
}

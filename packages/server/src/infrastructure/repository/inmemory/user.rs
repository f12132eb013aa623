//! InMemory User Repository 実装
//!
//! ドメイン層が定義する UserRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, User, UserRepository, Username};

/// インメモリ User Repository 実装
#[derive(Default)]
pub struct InMemoryUserRepository {
    /// username -> User
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// 新しい InMemoryUserRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        let key = user.username.as_str().to_string();
        if users.contains_key(&key) {
            return Err(RepositoryError::UserAlreadyExists(key));
        }
        users.insert(key, user);
        Ok(())
    }

    async fn find(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(username.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.lock().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.as_str().cmp(b.username.as_str()))
        });
        Ok(list)
    }
}

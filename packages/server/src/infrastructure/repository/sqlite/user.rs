//! SQLite User Repository 実装

use async_trait::async_trait;
use sqlx::{Row, sqlite::SqliteRow};

use crate::domain::{RepositoryError, Timestamp, User, UserRepository, Username};

use super::Database;

/// SQLite User Repository 実装
pub struct SqliteUserRepository {
    database: Database,
}

impl SqliteUserRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, RepositoryError> {
    let username: String = row.try_get("username")?;
    let password_hash: String = row.try_get("password_hash")?;
    let created_at: String = row.try_get("created_at")?;

    let corrupted =
        |e: crate::domain::ValueObjectError| RepositoryError::Storage(format!("corrupted user row: {e}"));

    Ok(User::new(
        Username::new(username).map_err(corrupted)?,
        password_hash,
        Timestamp::parse(&created_at).map_err(corrupted)?,
    ))
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at.to_iso8601())
        .execute(self.database.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                RepositoryError::UserAlreadyExists(user.username.into_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.database.pool())
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT username, password_hash, created_at FROM users ORDER BY created_at, username",
        )
        .fetch_all(self.database.pool())
        .await?;

        rows.iter().map(row_to_user).collect()
    }
}

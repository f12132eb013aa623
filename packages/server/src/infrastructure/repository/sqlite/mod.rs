//! SQLite 実装（永続化）
//!
//! メッセージ履歴とユーザーを 1 つの SQLite ファイルに保存します。
//! プロセスを正常終了・再起動しても内容は保持されます。

pub mod message;
pub mod user;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::domain::RepositoryError;

pub use message::SqliteMessageRepository;
pub use user::SqliteUserRepository;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

/// Shared SQLite connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url`, e.g. `sqlite://hiroba.db`
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.init_schema().await?;
        tracing::info!(url, "SQLite database ready");
        Ok(database)
    }

    /// Private in-memory database.
    ///
    /// A single connection is kept alive for the lifetime of the pool; an
    /// in-memory SQLite database disappears with its last connection.
    pub async fn connect_in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.init_schema().await?;
        Ok(database)
    }

    async fn init_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author TEXT NOT NULL,
                text TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("SQLite schema initialized");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries and close every connection
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite database closed");
    }
}

/// Clamp a `usize` limit to what SQLite's `LIMIT` accepts
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

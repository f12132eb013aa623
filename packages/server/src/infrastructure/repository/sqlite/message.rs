//! SQLite Message Repository 実装
//!
//! 追加（INSERT）と上限超過分の削除（DELETE）を 1 つのトランザクションで
//! 実行し、書き込みは 1 タスクずつに直列化します。
//! 追加と削除の間でクラッシュした場合でも、コミットされていない変更は
//! 残らないため、履歴が上限を超えて観測されることはありません。

use async_trait::async_trait;
use sqlx::{Row, sqlite::SqliteRow};
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageRepository, MessageText, RepositoryError, Timestamp, Username,
};

use super::{Database, sql_limit};

/// SQLite Message Repository 実装
pub struct SqliteMessageRepository {
    database: Database,
    capacity: usize,
    /// Single writer: append + trim never interleave
    write_lock: Mutex<()>,
}

impl SqliteMessageRepository {
    pub fn new(database: Database, capacity: usize) -> Self {
        Self {
            database,
            capacity,
            write_lock: Mutex::new(()),
        }
    }
}

fn row_to_message(row: &SqliteRow) -> Result<ChatMessage, RepositoryError> {
    let author: String = row.try_get("author")?;
    let text: String = row.try_get("text")?;
    let timestamp: String = row.try_get("timestamp")?;

    let corrupted = |e: crate::domain::ValueObjectError| {
        RepositoryError::Storage(format!("corrupted message row: {e}"))
    };

    Ok(ChatMessage::new(
        Username::new(author).map_err(corrupted)?,
        MessageText::new(text).map_err(corrupted)?,
        Timestamp::parse(&timestamp).map_err(corrupted)?,
    ))
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.database.pool().begin().await?;

        sqlx::query("INSERT INTO messages (author, text, timestamp) VALUES (?, ?, ?)")
            .bind(message.author.as_str())
            .bind(message.text.as_str())
            .bind(message.timestamp.to_iso8601())
            .execute(&mut *tx)
            .await?;

        let trimmed = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE id NOT IN (SELECT id FROM messages ORDER BY id DESC LIMIT ?)
            "#,
        )
        .bind(sql_limit(self.capacity))
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if trimmed > 0 {
            tracing::debug!(trimmed, "Trimmed stored messages to capacity");
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT author, text, timestamp
            FROM messages
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(sql_limit(limit))
        .fetch_all(self.database.pool())
        .await?;

        // newest first from SQL, oldest first to callers
        rows.iter().rev().map(row_to_message).collect()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

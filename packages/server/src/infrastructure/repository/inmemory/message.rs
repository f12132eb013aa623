//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! `MessageHistory`（上限付きログ）を Mutex で保護して保持します。
//!
//! 追加と古いメッセージの削除は同じロックの中で行われるため、
//! 他のタスクから上限超過の状態が観測されることはありません。
//! プロセス終了で内容は失われます（`--database-url memory` およびテスト用）。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageHistory, MessageRepository, RepositoryError};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    history: Mutex<MessageHistory>,
    capacity: usize,
}

impl InMemoryMessageRepository {
    /// 指定した上限で新しい InMemoryMessageRepository を作成
    pub fn new(capacity: usize) -> Self {
        Self {
            history: Mutex::new(MessageHistory::with_capacity(capacity)),
            capacity,
        }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut history = self.history.lock().await;
        let evicted = history.push(message);
        if evicted > 0 {
            tracing::debug!(
                evicted,
                retained = history.len(),
                "Trimmed message history to capacity"
            );
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let history = self.history.lock().await;
        Ok(history.recent(limit))
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageText, Timestamp, Username};
    use std::sync::Arc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 追加したメッセージが挿入順で読み出せること
    // - 上限を超えた追加で最も古いメッセージから削除されること
    // - 並行に追加しても上限が守られること
    // ========================================

    fn message(author: &str, text: &str) -> ChatMessage {
        ChatMessage::new(
            Username::new(author.to_string()).unwrap(),
            MessageText::new(text.to_string()).unwrap(),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn test_append_and_recent() {
        // テスト項目: 追加したメッセージが古い順に取得できる
        // given (前提条件):
        let repo = InMemoryMessageRepository::new(200);

        // when (操作):
        repo.append(message("alice", "first")).await.unwrap();
        repo.append(message("bob", "second")).await.unwrap();

        // then (期待する結果):
        let recent = repo.recent(200).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text.as_str(), "first");
        assert_eq!(recent[1].text.as_str(), "second");
    }

    #[tokio::test]
    async fn test_append_trims_to_capacity() {
        // テスト項目: 上限を超えると最新 capacity 件だけが残る
        // given (前提条件):
        let repo = InMemoryMessageRepository::new(3);

        // when (操作):
        for i in 0..5 {
            repo.append(message("alice", &i.to_string())).await.unwrap();
        }

        // then (期待する結果):
        let texts: Vec<String> = repo
            .recent(10)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.text.into_string())
            .collect();
        assert_eq!(texts, vec!["2", "3", "4"]);
        assert_eq!(repo.capacity(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_appends_respect_capacity() {
        // テスト項目: 並行して追加しても件数は上限を超えない
        // given (前提条件):
        let repo = Arc::new(InMemoryMessageRepository::new(50));

        // when (操作): 10 タスクから 20 件ずつ追加
        let mut handles = Vec::new();
        for task in 0..10 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..20 {
                    repo.append(message("alice", &format!("{task}-{i}")))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(repo.recent(1000).await.unwrap().len(), 50);
    }
}

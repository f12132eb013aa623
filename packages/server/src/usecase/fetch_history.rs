//! UseCase: 履歴の取得

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError};

/// 履歴取得のユースケース
pub struct FetchHistoryUseCase {
    message_repository: Arc<dyn MessageRepository>,
}

impl FetchHistoryUseCase {
    /// 新しい FetchHistoryUseCase を作成
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    /// 保持されている最新メッセージを古い順で返す
    ///
    /// 件数の上限は `--history-capacity` で設定したストアの容量（デフォルト 200）
    pub async fn execute(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let limit = self.message_repository.capacity();
        self.message_repository.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageText, Timestamp, Username, repository::MockMessageRepository},
        infrastructure::repository::InMemoryMessageRepository,
    };

    #[tokio::test]
    async fn test_fetch_history_newest_last() {
        // テスト項目: 履歴は古い順で、最新メッセージが末尾にある
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new(200));
        for text in ["first", "second"] {
            repository
                .append(ChatMessage::new(
                    Username::new("alice".to_string()).unwrap(),
                    MessageText::new(text.to_string()).unwrap(),
                    Timestamp::now(),
                ))
                .await
                .unwrap();
        }
        let usecase = FetchHistoryUseCase::new(repository);

        // when (操作):
        let history = usecase.execute().await.unwrap();

        // then (期待する結果):
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().text.as_str(), "second");
    }

    #[tokio::test]
    async fn test_fetch_history_reads_up_to_capacity() {
        // テスト項目: 取得件数は設定された上限に従う（デフォルトの 200 を超える場合も）
        let mut repository = MockMessageRepository::new();
        repository.expect_capacity().return_const(500usize);
        repository
            .expect_recent()
            .withf(|limit| *limit == 500)
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let usecase = FetchHistoryUseCase::new(Arc::new(repository));

        assert!(usecase.execute().await.unwrap().is_empty());
    }
}

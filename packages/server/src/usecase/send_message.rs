//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信フレームの検証、履歴への追加、全接続へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - author は常に接続に束縛された identity であること（ペイロードの author は無視）
//! - 不正なフレームは破棄され、履歴にもブロードキャストにも現れないこと
//! - 履歴への保存に失敗してもブロードキャストは行われること
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト（送信者自身を含む）
//! - 異常系：JSON でない、text が無い・文字列でない、text が空
//! - 異常系：ストレージ障害

use std::sync::Arc;

use crate::{
    domain::{
        BroadcastReport, ChatMessage, ConnectionRegistry, MessageRepository, MessageText,
        Timestamp, Username,
    },
    infrastructure::dto::websocket::InboundFrame,
};

use super::error::SendMessageError;

/// 1 フレーム処理の結果
#[derive(Debug)]
pub struct SendOutcome {
    pub message: ChatMessage,
    /// 履歴に保存できたか
    pub persisted: bool,
    pub report: BroadcastReport,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            message_repository,
            registry,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `author` - 接続に束縛された identity
    /// * `payload` - クライアントから受信した生のフレーム
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - ブロードキャスト済み（保存失敗はログのみ）
    /// * `Err(SendMessageError)` - フレームが不正で破棄された
    pub async fn execute(
        &self,
        author: &Username,
        payload: &str,
    ) -> Result<SendOutcome, SendMessageError> {
        // 1. フレームの検証
        let frame: InboundFrame = serde_json::from_str(payload)
            .map_err(|e| SendMessageError::MalformedFrame(e.to_string()))?;
        let text = MessageText::new(frame.text)?;

        // 2. 束縛された identity とサーバー時刻でメッセージを作成
        let message = ChatMessage::new(author.clone(), text, Timestamp::now());

        // 3. 履歴に追加（失敗してもブロードキャストは続行）
        let persisted = match self.message_repository.append(message.clone()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(author = %author, "Failed to persist message: {}", e);
                false
            }
        };

        // 4. 全接続にブロードキャスト
        let report = self.registry.broadcast(&message).await;
        tracing::debug!(
            author = %author,
            delivered = report.delivered,
            dropped = report.dropped.len(),
            "Broadcasted message"
        );

        Ok(SendOutcome {
            message,
            persisted,
            report,
        })
    }
}

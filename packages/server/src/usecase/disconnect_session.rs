//! UseCase: セッション終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - セッションを Closed にし、接続を Connection Registry から外す
//!
//! ### どのような状況を想定しているか
//! - 正常系：Active なセッションの終了
//! - エッジケース：二重終了、認証前の終了

use std::sync::Arc;

use crate::domain::{CloseReason, ConnectionRegistry, Session};

/// セッション終了のユースケース
pub struct DisconnectSessionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// セッション終了を実行
    ///
    /// # Returns
    ///
    /// 接続が登録されていて、今回の呼び出しで外された場合は `true`
    pub async fn execute(&self, session: &mut Session, reason: CloseReason) -> bool {
        match session.close(reason) {
            Some(connection_id) => self.registry.deregister(&connection_id).await,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, ConnectionIdFactory, Username},
        infrastructure::InMemoryConnectionRegistry,
    };

    #[tokio::test]
    async fn test_disconnect_active_session() {
        // テスト項目: Active なセッションを閉じると登録解除される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectSessionUseCase::new(registry.clone());
        let alice = Username::new("alice".to_string()).unwrap();
        let connection_id = ConnectionIdFactory::generate();
        let (connection, _rx) = Connection::channel(alice.clone(), 8);
        registry.register(connection_id, connection).await;

        let mut session = Session::new();
        session.begin_authentication().unwrap();
        session.activate(connection_id, alice).unwrap();

        // when (操作):
        let removed = usecase
            .execute(&mut session, CloseReason::ClientClosed)
            .await;

        // then (期待する結果):
        assert!(removed);
        assert!(session.is_closed());
        assert_eq!(registry.count().await, 0);

        // 二度目は何もしない
        assert!(
            !usecase
                .execute(&mut session, CloseReason::TransportError)
                .await
        );
        assert_eq!(session.close_reason(), Some(CloseReason::ClientClosed));
    }

    #[tokio::test]
    async fn test_disconnect_before_authentication() {
        // テスト項目: 認証前に切断されたセッションは登録解除対象が無い
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectSessionUseCase::new(registry.clone());
        let mut session = Session::new();

        let removed = usecase
            .execute(&mut session, CloseReason::TransportError)
            .await;

        assert!(!removed);
        assert!(session.is_closed());
    }
}

//! UseCase: セッション確立（認証と接続登録）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - トークン検証と Connection Registry への登録
//!
//! ### なぜこのテストが必要か
//! - 認証されていない接続がブロードキャスト対象にならないことを保証
//! - 認証失敗の理由（トークン無し・不正トークン）が区別できることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークンでの接続
//! - 異常系：トークン無し、空トークン、不正トークン、期限切れトークン

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::{
    CloseReason, Connection, ConnectionId, ConnectionIdFactory, ConnectionRegistry, Session,
    TokenService, Username,
};

use super::error::ConnectError;

/// 認証済みで登録された接続
#[derive(Debug)]
pub struct ActiveConnection {
    pub connection_id: ConnectionId,
    pub identity: Username,
    /// ブロードキャストされたフレームの受信側（writer タスクが消費する）
    pub outbound: mpsc::Receiver<String>,
}

/// セッション確立のユースケース
pub struct ConnectSessionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    token_service: Arc<dyn TokenService>,
    /// 接続ごとの送信キュー長
    outbound_buffer: usize,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        token_service: Arc<dyn TokenService>,
        outbound_buffer: usize,
    ) -> Self {
        Self {
            registry,
            token_service,
            outbound_buffer,
        }
    }

    /// セッション確立を実行
    ///
    /// `Connecting -> Authenticating -> Active` と遷移させ、接続を登録する。
    /// 失敗した場合はセッションを `Closed` にしてエラーを返す（登録はしない）。
    pub async fn execute(
        &self,
        session: &mut Session,
        token: Option<&str>,
    ) -> Result<ActiveConnection, ConnectError> {
        session.begin_authentication()?;

        // 1. トークンの取り出し
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            session.close(CloseReason::AuthenticationRequired);
            return Err(ConnectError::AuthenticationRequired);
        };

        // 2. トークン検証
        let identity = match self.token_service.verify(token) {
            Ok(identity) => identity,
            Err(e) => {
                session.close(CloseReason::InvalidToken);
                return Err(ConnectError::InvalidToken(e));
            }
        };

        // 3. identity を束縛して登録
        let connection_id = ConnectionIdFactory::generate();
        session.activate(connection_id, identity.clone())?;

        let (connection, outbound) = Connection::channel(identity.clone(), self.outbound_buffer);
        self.registry.register(connection_id, connection).await;

        Ok(ActiveConnection {
            connection_id,
            identity,
            outbound,
        })
    }
}

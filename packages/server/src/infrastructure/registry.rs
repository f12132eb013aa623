//! InMemory Connection Registry 実装
//!
//! 接続中のクライアント（送信チャンネル）を ConnectionId をキーに保持し、
//! 全接続へのブロードキャストを行います。
//!
//! ブロードキャストはロック中に取得したスナップショットに対して行い、
//! 送信は `try_send` なので呼び出し側をブロックしません。
//! 送信に失敗した接続（切断済み・送信キューが一杯）は登録解除されます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{BroadcastReport, ChatMessage, Connection, ConnectionId, ConnectionRegistry},
    infrastructure::dto::websocket::ChatFrame,
};

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn remove_all(&self, connection_ids: &[ConnectionId]) {
        let mut connections = self.connections.lock().await;
        for id in connection_ids {
            connections.remove(id);
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection_id: ConnectionId, connection: Connection) {
        let mut connections = self.connections.lock().await;
        tracing::debug!(
            %connection_id,
            identity = %connection.identity(),
            "Registering connection"
        );
        connections.insert(connection_id, connection);
    }

    async fn deregister(&self, connection_id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id).is_some()
    }

    async fn broadcast(&self, message: &ChatMessage) -> BroadcastReport {
        let frame = match serde_json::to_string(&ChatFrame::from(message)) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize chat frame: {}", e);
                return BroadcastReport::default();
            }
        };

        let snapshot: Vec<(ConnectionId, Connection)> = {
            let connections = self.connections.lock().await;
            connections
                .iter()
                .map(|(id, connection)| (*id, connection.clone()))
                .collect()
        };

        let mut report = BroadcastReport::default();
        for (connection_id, connection) in snapshot {
            match connection.send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        %connection_id,
                        identity = %connection.identity(),
                        "Dropping connection after failed send: {}",
                        e
                    );
                    report.dropped.push(connection_id);
                }
            }
        }

        if !report.dropped.is_empty() {
            self.remove_all(&report.dropped).await;
        }
        report
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}

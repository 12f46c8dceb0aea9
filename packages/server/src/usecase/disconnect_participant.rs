//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - Registry からの削除と、残りの参加者への Presence 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知なし、ルーム削除）、
//!   複数タブのうち 1 つの切断、二重の切断

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher, Presence, RoomRegistry, ServerEvent};

use super::PresenceLock;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    presence_lock: Arc<PresenceLock>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        presence_lock: Arc<PresenceLock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            presence_lock,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(Presence)` - 残りの参加者に通知した Presence
    /// * `None` - ルームが空になった、または接続が登録されていなかった
    pub async fn execute(&self, connection: &Connection) -> Option<Presence> {
        let room_id = &connection.context.room_id;

        let _guard = self.presence_lock.lock().await;

        // 1. MessagePusher から接続を登録解除
        self.message_pusher.unregister_client(&connection.id).await;

        // 2. Registry から削除
        if !self.registry.leave(room_id, &connection.id).await {
            tracing::warn!("Connection '{}' was not registered in '{}'", connection.id, room_id);
            return None;
        }

        // 3. 残りの参加者がいれば Presence をブロードキャスト
        let presence = self.registry.members_of(room_id).await;
        if presence.is_empty() {
            tracing::info!("Room '{}' closed", room_id);
            return None;
        }

        let targets = self.registry.connections_of(room_id).await;
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &ServerEvent::PresenceUpdate(presence.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast presence-update: {}", e);
        }
        Some(presence)
    }
}

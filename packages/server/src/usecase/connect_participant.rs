//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - Registry への登録と、Presence のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 新しい接続自身を含むルーム全員に Presence が届くことを保証
//! - 同一ユーザーの複数接続（複数タブ）が Presence で 1 人として数えられることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者、2 人目の参加者
//! - エッジケース：同一ユーザーの 2 つ目の接続、別ルームへの参加

use std::sync::Arc;

use collab_shared::time::Clock;

use crate::domain::{
    AuthContext, Connection, ConnectionId, MessagePusher, PusherChannel, RoomRegistry,
    ServerEvent, SessionId, Timestamp,
};

use super::PresenceLock;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// RoomRegistry（入室状況の唯一の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    presence_lock: Arc<PresenceLock>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        presence_lock: Arc<PresenceLock>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            presence_lock,
            clock,
        }
    }

    /// 参加者接続を実行
    ///
    /// 認証済みの接続をルームに登録し、新しい接続を含むルーム全員に Presence を送る。
    /// 新しい接続には最初に `session` イベントが届く。
    ///
    /// # Arguments
    ///
    /// * `context` - 認証結果
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 登録された接続
    pub async fn execute(&self, context: AuthContext, sender: PusherChannel) -> Connection {
        let connection = Connection {
            id: ConnectionId::generate(),
            session_id: SessionId::generate(),
            context,
            connected_at: Timestamp::new(self.clock.now_millis()),
        };
        let room_id = &connection.context.room_id;

        let _guard = self.presence_lock.lock().await;

        // 1. MessagePusher に接続を登録し、セッション ID を通知
        self.message_pusher
            .register_client(connection.id, sender)
            .await;
        let session = ServerEvent::Session {
            session_id: connection.session_id,
        };
        if let Err(e) = self.message_pusher.push_to(&connection.id, &session).await {
            tracing::warn!("Failed to send session to '{}': {}", connection.id, e);
        }

        // 2. Registry に参加を記録
        self.registry
            .join(room_id, &connection.context.identity, connection.id)
            .await;

        // 3. 新しい接続を含むルーム全員に Presence をブロードキャスト
        let presence = self.registry.members_of(room_id).await;
        let targets = self.registry.connections_of(room_id).await;
        tracing::info!(
            "'{}' joined room '{}' ({} online)",
            connection.context.identity,
            room_id,
            presence.count()
        );
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &ServerEvent::PresenceUpdate(presence))
            .await
        {
            tracing::warn!("Failed to broadcast presence-update: {}", e);
        }

        connection
    }
}

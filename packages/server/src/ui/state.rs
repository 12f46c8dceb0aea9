//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::{
    infrastructure::session::SessionRecoveryStore,
    usecase::{
        AuthenticateSessionUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetMessagesUseCase, GetRoomsUseCase, SendMessageUseCase,
    },
};

/// Ping cadence and idle limit for WebSocket connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub ping_interval: Duration,
    /// A connection that sends nothing for this long is closed.
    pub ping_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(25),
            ping_timeout: Duration::from_secs(60),
        }
    }
}

pub struct AppState {
    /// AuthenticateSessionUseCase（接続認証のユースケース）
    pub authenticate_session_usecase: Arc<AuthenticateSessionUseCase>,
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（チャットメッセージ処理のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetMessagesUseCase（メッセージ履歴取得のユースケース）
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub session_recovery: Arc<SessionRecoveryStore>,
    pub heartbeat: HeartbeatConfig,
}

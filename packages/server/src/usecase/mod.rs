//! UseCase layer
//!
//! 各ユースケースは Domain 層の trait にのみ依存し、Infrastructure 層の具体的な実装を知らない。

mod authenticate_session;
mod connect_participant;
mod disconnect_participant;
mod error;
mod get_messages;
mod get_rooms;
mod send_message;

#[cfg(test)]
mod test_support;

pub use authenticate_session::{AuthenticateSessionUseCase, parse_project_id};
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{AdmissionError, GetMessagesError, SendMessageError};
pub use get_messages::GetMessagesUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use send_message::{
    AI_MARKER, ChatOutcome, GenerationRequest, SendMessageUseCase, is_ai_targeted,
    strip_ai_marker,
};

/// 入退室（Registry の更新）と Presence のブロードキャストを直列化するロック
///
/// 接続・切断のユースケースで共有し、Presence が入退室の順序どおりに届くようにする。
pub type PresenceLock = tokio::sync::Mutex<()>;

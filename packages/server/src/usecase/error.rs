//! UseCase 層のエラー定義
//!
//! `Display` の文字列はそのままクライアントに返される。

use thiserror::Error;

use crate::domain::{GenerationError, MessagePushError, RepositoryError};

/// 接続受け入れ時のエラー
///
/// クライアントはこの文字列で分岐する（トークン削除してログイン画面へ、など）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Invalid project ID")]
    InvalidProjectId,
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Not authorized for this project")]
    NotAuthorized,
    #[error("Authentication error")]
    Internal,
}

/// チャットイベント処理中のエラー（送信元の接続にのみ通知される）
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendMessageError {
    #[error("AI prompt must not be empty")]
    EmptyPrompt,
    #[error("Error processing message")]
    Persistence(#[source] RepositoryError),
    #[error("Error processing message")]
    Broadcast(#[source] MessagePushError),
    #[error("AI generation failed")]
    GenerationFailed(#[source] GenerationError),
    #[error("AI generation timed out")]
    GenerationTimedOut,
}

/// メッセージ履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessagesError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    #[error("Error loading messages")]
    Repository(#[source] RepositoryError),
}

//! UseCase: メッセージ履歴の取得
//!
//! 接続時と同じ認証を通したうえで、プロジェクトの永続化済みメッセージを返す。

use std::sync::Arc;

use crate::domain::{Message, MessageRepository};

use super::{authenticate_session::AuthenticateSessionUseCase, error::GetMessagesError};

pub struct GetMessagesUseCase {
    authenticator: Arc<AuthenticateSessionUseCase>,
    messages: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    pub fn new(
        authenticator: Arc<AuthenticateSessionUseCase>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            authenticator,
            messages,
        }
    }

    /// 作成日時順のメッセージ履歴を返す
    pub async fn execute(
        &self,
        raw_project_id: Option<&str>,
        credential: Option<&str>,
    ) -> Result<Vec<Message>, GetMessagesError> {
        let context = self
            .authenticator
            .execute(raw_project_id, credential)
            .await?;

        self.messages
            .list_by_project(&context.project_id)
            .await
            .map_err(GetMessagesError::Repository)
    }
}

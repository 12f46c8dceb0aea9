//! InMemory Message Repository 実装
//!
//! 追記のみの Vec をストレージとして使用します。ID は UUID v4 で採番します。

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{Message, MessageId, MessageRepository, NewMessage, ProjectId, RepositoryError};

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みメッセージの件数
    pub async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<MessageId, RepositoryError> {
        let id = MessageId::new(Uuid::new_v4().to_string());
        let mut messages = self.messages.lock().await;
        messages.push(message.clone().persisted(id.clone()));
        Ok(id)
    }

    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        let mut found: Vec<Message> = messages
            .iter()
            .filter(|m| &m.project_id == project_id)
            .cloned()
            .collect();
        // stable: insertion order breaks timestamp ties
        found.sort_by_key(|m| m.created_at);
        Ok(found)
    }
}

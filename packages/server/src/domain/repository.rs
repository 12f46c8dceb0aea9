//! Repository trait 定義
//!
//! ドメイン層が必要とするデータストアへのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{Message, NewMessage, Project, User},
    error::RepositoryError,
    value_object::{Identity, MessageId, ProjectId},
};

/// ユーザーストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &Identity) -> Result<Option<User>, RepositoryError>;
}

/// プロジェクトストア（メンバー一覧を含む）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
}

/// メッセージストア
///
/// このサブシステムからは追記のみ。複数メッセージにまたがるトランザクションは不要。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存し、採番された ID を返す
    async fn insert(&self, message: &NewMessage) -> Result<MessageId, RepositoryError>;

    /// プロジェクトのメッセージを古い順に取得
    async fn list_by_project(&self, project_id: &ProjectId)
    -> Result<Vec<Message>, RepositoryError>;
}

//! UseCase: アクティブなルーム一覧の取得
//!
//! 呼び出し元がメンバーであるプロジェクトのルームだけを返す。

use std::sync::Arc;

use crate::domain::{Presence, ProjectRepository, RoomRegistry};

use super::{authenticate_session::AuthenticateSessionUseCase, error::AdmissionError};

pub struct GetRoomsUseCase {
    authenticator: Arc<AuthenticateSessionUseCase>,
    projects: Arc<dyn ProjectRepository>,
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(
        authenticator: Arc<AuthenticateSessionUseCase>,
        projects: Arc<dyn ProjectRepository>,
        registry: Arc<dyn RoomRegistry>,
    ) -> Self {
        Self {
            authenticator,
            projects,
            registry,
        }
    }

    /// 接続中の参加者がいるルームの Presence を、ルーム ID 順に返す
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Presence>)` - 呼び出し元がメンバーであるルームのみ
    /// * `Err(AdmissionError)` - トークンなし・不正、または未登録ユーザー
    pub async fn execute(&self, credential: Option<&str>) -> Result<Vec<Presence>, AdmissionError> {
        let user = self.authenticator.identify(credential).await?;

        let mut visible = Vec::new();
        for presence in self.registry.rooms().await {
            let project = self
                .projects
                .find_by_id(presence.room_id.project_id())
                .await
                .map_err(|e| {
                    tracing::error!("Project lookup failed: {}", e);
                    AdmissionError::Internal
                })?;
            if project.is_some_and(|p| p.has_member(&user.email)) {
                visible.push(presence);
            }
        }
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockProjectRepository, RepositoryError},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
        },
        usecase::test_support::{
            PROJECT_P1, PROJECT_P2, TestConnection, project_repository, user_repository, verifier,
        },
    };

    fn usecase(
        projects: Arc<dyn ProjectRepository>,
        registry: Arc<InMemoryRoomRegistry>,
    ) -> GetRoomsUseCase {
        let authenticator = Arc::new(AuthenticateSessionUseCase::new(
            verifier(),
            user_repository(),
            project_repository(),
        ));
        GetRoomsUseCase::new(authenticator, projects, registry)
    }

    #[tokio::test]
    async fn test_lists_only_rooms_of_own_projects() {
        // テスト項目: 参加者のいるルームのうち、呼び出し元がメンバーのものだけが一覧に含まれる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = WebSocketMessagePusher::new();
        let _alice = TestConnection::join("alice@x.com", PROJECT_P1, &registry, &pusher).await;
        let _bob = TestConnection::join("bob@x.com", PROJECT_P1, &registry, &pusher).await;
        let _carol = TestConnection::join("carol@x.com", PROJECT_P2, &registry, &pusher).await;
        let usecase = usecase(project_repository(), registry.clone());

        // when (操作):
        let for_alice = usecase.execute(Some("Bearer token-alice@x.com")).await.unwrap();
        let for_carol = usecase.execute(Some("Bearer token-carol@x.com")).await.unwrap();

        // then (期待する結果):
        assert_eq!(for_alice.len(), 1);
        assert_eq!(for_alice[0].room_id.as_str(), format!("project_{}", PROJECT_P1));
        assert_eq!(for_alice[0].count(), 2);
        assert_eq!(for_carol.len(), 1);
        assert_eq!(for_carol[0].room_id.as_str(), format!("project_{}", PROJECT_P2));
    }

    #[tokio::test]
    async fn test_rooms_require_a_credential() {
        // テスト項目: トークンがない、または不正な場合は一覧を返さない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = WebSocketMessagePusher::new();
        let _alice = TestConnection::join("alice@x.com", PROJECT_P1, &registry, &pusher).await;
        let usecase = usecase(project_repository(), registry.clone());

        // when (操作):
        let missing = usecase.execute(None).await;
        let invalid = usecase.execute(Some("Bearer forged")).await;

        // then (期待する結果):
        assert_eq!(missing, Err(AdmissionError::MissingToken));
        assert_eq!(invalid, Err(AdmissionError::InvalidToken));
    }

    #[tokio::test]
    async fn test_no_rooms_when_nobody_is_connected() {
        let usecase = usecase(project_repository(), Arc::new(InMemoryRoomRegistry::new()));

        assert_eq!(usecase.execute(Some("token-alice@x.com")).await, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_error() {
        // テスト項目: プロジェクトの検索に失敗した場合は汎用のエラーになる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = WebSocketMessagePusher::new();
        let _alice = TestConnection::join("alice@x.com", PROJECT_P1, &registry, &pusher).await;
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = usecase(Arc::new(projects), registry.clone());

        // when (操作):
        let result = usecase.execute(Some("token-alice@x.com")).await;

        // then (期待する結果):
        assert_eq!(result, Err(AdmissionError::Internal));
    }
}

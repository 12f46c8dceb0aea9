//! UseCase テスト用のフィクスチャ

use std::{sync::Arc, time::Duration};

use collab_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::domain::{
    AuthContext, Connection, ConnectionId, CredentialError, Identity, MockCredentialVerifier,
    Project, ProjectId, SessionId, Timestamp, User,
};
use crate::infrastructure::{
    message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    repository::{InMemoryProjectRepository, InMemoryUserRepository},
};

pub const PROJECT_P1: &str = "65f1a2b3c4d5e6f7a8b9c0d1";
pub const PROJECT_P2: &str = "65f1a2b3c4d5e6f7a8b9c0d2";
pub const NOW: i64 = 1_700_000_000_000;

pub fn project_id(raw: &str) -> ProjectId {
    ProjectId::new(raw.to_string()).unwrap()
}

pub fn identity(value: &str) -> Identity {
    Identity::new(value.to_string()).unwrap()
}

pub fn user(email: &str) -> User {
    User {
        email: identity(email),
        name: email.split('@').next().unwrap_or_default().to_string(),
    }
}

/// P1: alice, bob / P2: carol
pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: project_id(PROJECT_P1),
            name: "p1".to_string(),
            members: vec![identity("alice@x.com"), identity("bob@x.com")],
        },
        Project {
            id: project_id(PROJECT_P2),
            name: "p2".to_string(),
            members: vec![identity("carol@x.com")],
        },
    ]
}

pub fn user_repository() -> Arc<InMemoryUserRepository> {
    Arc::new(InMemoryUserRepository::new(vec![
        user("alice@x.com"),
        user("bob@x.com"),
        user("carol@x.com"),
    ]))
}

pub fn project_repository() -> Arc<InMemoryProjectRepository> {
    Arc::new(InMemoryProjectRepository::new(projects()))
}

pub fn context(email: &str, project: &str) -> AuthContext {
    let project = projects()
        .into_iter()
        .find(|p| p.id.as_str() == project)
        .unwrap();
    AuthContext::new(&user(email), &project)
}

/// "token-<email>" を <email> として受理するスタブ
pub fn verifier() -> Arc<MockCredentialVerifier> {
    let mut verifier = MockCredentialVerifier::new();
    verifier.expect_verify().returning(|token| {
        match token.strip_prefix("token-") {
            Some(email) => Ok(identity(email)),
            None => Err(CredentialError::Invalid("bad signature".to_string())),
        }
    });
    Arc::new(verifier)
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NOW))
}

pub const GENERATION_TIMEOUT: Duration = Duration::from_millis(200);

/// テスト用に接続を 1 つ作る（Registry への join と Pusher への登録を直接行う）
pub struct TestConnection {
    pub connection: Connection,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl TestConnection {
    pub async fn join(
        email: &str,
        project: &str,
        registry: &InMemoryRoomRegistry,
        pusher: &WebSocketMessagePusher,
    ) -> Self {
        use crate::domain::{MessagePusher, RoomRegistry};

        let connection = Connection {
            id: ConnectionId::generate(),
            session_id: SessionId::generate(),
            context: context(email, project),
            connected_at: Timestamp::new(NOW),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(connection.id, tx).await;
        registry
            .join(
                &connection.context.room_id,
                &connection.context.identity,
                connection.id,
            )
            .await;
        Self { connection, rx }
    }

    /// 受信済みのフレームを全て JSON として取り出す
    pub fn drain(&mut self) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }
}

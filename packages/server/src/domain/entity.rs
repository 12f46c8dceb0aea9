//! Domain entities.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value_object::{ConnectionId, Identity, MessageId, ProjectId, RoomId, SessionId, Timestamp};

/// Display name of the assistant when it appears as a message sender.
pub const AI_SENDER: &str = "BUTO AI";

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: Identity,
    pub name: String,
}

/// A project and the users allowed into its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub members: Vec<Identity>,
}

impl Project {
    pub fn has_member(&self, identity: &Identity) -> bool {
        self.members.iter().any(|member| member == identity)
    }
}

/// Result of a successful admission. Tags a connection for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub identity: Identity,
    pub display_name: String,
    pub project_id: ProjectId,
    pub room_id: RoomId,
}

impl AuthContext {
    pub fn new(user: &User, project: &Project) -> Self {
        Self {
            identity: user.email.clone(),
            display_name: user.name.clone(),
            project_id: project.id.clone(),
            room_id: project.id.room_id(),
        }
    }
}

/// A live, admitted transport connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub session_id: SessionId,
    pub context: AuthContext,
    pub connected_at: Timestamp,
}

/// Structured output of the AI generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationResult {
    pub text: String,
    pub files: Map<String, Value>,
    pub build_steps: Vec<String>,
    pub run_commands: Vec<String>,
}

/// Who authored a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    User(Identity),
    Ai,
}

impl Sender {
    pub fn as_str(&self) -> &str {
        match self {
            Sender::User(identity) => identity.as_str(),
            Sender::Ai => AI_SENDER,
        }
    }
}

/// What a message is for.
///
/// An AI response always carries the prompt it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    Plain,
    AiTargeted,
    AiResponse {
        prompt: String,
        result: GenerationResult,
    },
}

/// A message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub project_id: ProjectId,
    pub sender: Sender,
    pub body: String,
    pub kind: MessageKind,
    pub created_at: Timestamp,
}

impl NewMessage {
    pub fn plain(
        project_id: ProjectId,
        sender: Identity,
        body: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            project_id,
            sender: Sender::User(sender),
            body,
            kind: MessageKind::Plain,
            created_at,
        }
    }

    pub fn ai_targeted(
        project_id: ProjectId,
        sender: Identity,
        body: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            project_id,
            sender: Sender::User(sender),
            body,
            kind: MessageKind::AiTargeted,
            created_at,
        }
    }

    pub fn ai_response(
        project_id: ProjectId,
        prompt: String,
        result: GenerationResult,
        created_at: Timestamp,
    ) -> Self {
        Self {
            project_id,
            sender: Sender::Ai,
            body: result.text.clone(),
            kind: MessageKind::AiResponse { prompt, result },
            created_at,
        }
    }

    /// Attach the id assigned by the store.
    pub fn persisted(self, id: MessageId) -> Message {
        Message {
            id,
            project_id: self.project_id,
            sender: self.sender,
            body: self.body,
            kind: self.kind,
            created_at: self.created_at,
        }
    }
}

/// A persisted message. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub project_id: ProjectId,
    pub sender: Sender,
    pub body: String,
    pub kind: MessageKind,
    pub created_at: Timestamp,
}

impl Message {
    pub fn is_ai_targeted(&self) -> bool {
        matches!(self.kind, MessageKind::AiTargeted)
    }

    pub fn is_ai_response(&self) -> bool {
        matches!(self.kind, MessageKind::AiResponse { .. })
    }
}

/// De-duplicated set of identities connected to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub room_id: RoomId,
    /// Sorted, no duplicates.
    pub users: Vec<Identity>,
}

impl Presence {
    pub fn new(room_id: RoomId, mut users: Vec<Identity>) -> Self {
        users.sort();
        users.dedup();
        Self { room_id, users }
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

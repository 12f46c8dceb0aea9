//! Domain layer: value objects, entities, and the interfaces the use cases depend on.

pub mod credential;
pub mod entity;
pub mod error;
pub mod event;
pub mod generator;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use credential::{CredentialError, CredentialVerifier};
pub use entity::{
    AI_SENDER, AuthContext, Connection, GenerationResult, Message, MessageKind, NewMessage, Presence,
    Project, Sender, User,
};
pub use error::{RepositoryError, ValueObjectError};
pub use event::ServerEvent;
pub use generator::{AiGenerator, GenerationError};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::RoomRegistry;
pub use repository::{MessageRepository, ProjectRepository, UserRepository};
#[cfg(test)]
pub use credential::MockCredentialVerifier;
#[cfg(test)]
pub use generator::MockAiGenerator;
#[cfg(test)]
pub use repository::{MockMessageRepository, MockProjectRepository, MockUserRepository};
pub use value_object::{ConnectionId, Identity, MessageId, ProjectId, RoomId, SessionId, Timestamp};

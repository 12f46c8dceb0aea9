//! Events the server pushes to connections.

use super::{
    entity::{Message, Presence},
    value_object::SessionId,
};

/// An outbound event. Ephemeral: only the messages inside are persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Sent once to a freshly admitted connection.
    Session { session_id: SessionId },
    PresenceUpdate(Presence),
    ChatMessage(Message),
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

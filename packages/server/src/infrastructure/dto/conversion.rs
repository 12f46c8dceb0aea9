//! Conversion logic from domain entities to DTOs.

use crate::domain::{Message, MessageKind, Presence, ServerEvent};
use crate::infrastructure::dto::{http, websocket as dto};

impl From<&Presence> for dto::PresenceUpdateMessage {
    fn from(presence: &Presence) -> Self {
        Self {
            r#type: dto::MessageType::PresenceUpdate,
            users: presence
                .users
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
            count: presence.count(),
        }
    }
}

impl From<&Presence> for http::RoomSummaryDto {
    fn from(presence: &Presence) -> Self {
        Self {
            room_id: presence.room_id.as_str().to_string(),
            users: presence
                .users
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
            count: presence.count(),
        }
    }
}

impl From<&Message> for dto::ChatMessage {
    fn from(message: &Message) -> Self {
        let mut chat = Self {
            r#type: dto::MessageType::ChatMessage,
            id: message.id.as_str().to_string(),
            message: message.body.clone(),
            sender: message.sender.as_str().to_string(),
            timestamp: message.created_at.value(),
            is_ai_targeted: None,
            is_ai: None,
            prompt: None,
            files: None,
            build_steps: None,
            run_commands: None,
        };

        match &message.kind {
            MessageKind::Plain => {}
            MessageKind::AiTargeted => chat.is_ai_targeted = Some(true),
            MessageKind::AiResponse { prompt, result } => {
                chat.is_ai = Some(true);
                chat.prompt = Some(prompt.clone());
                chat.files = Some(result.files.clone());
                chat.build_steps = Some(result.build_steps.clone());
                chat.run_commands = Some(result.run_commands.clone());
            }
        }
        chat
    }
}

impl From<&ServerEvent> for dto::OutboundMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Session { session_id } => Self::Session(dto::SessionMessage {
                r#type: dto::MessageType::Session,
                session_id: session_id.to_string(),
            }),
            ServerEvent::PresenceUpdate(presence) => Self::PresenceUpdate(presence.into()),
            ServerEvent::ChatMessage(message) => Self::Chat(message.into()),
            ServerEvent::Error { message } => Self::Error(dto::ErrorMessage {
                r#type: dto::MessageType::Error,
                message: message.clone(),
            }),
        }
    }
}

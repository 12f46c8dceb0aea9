//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Frame type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Session,
    PresenceUpdate,
    ChatMessage,
    Error,
}

/// Inbound chat frame: `{"type":"chat-message","message":"..."}`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageRequest {
    pub r#type: MessageType,
    pub message: String,
}

/// Session token for connection-state recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage {
    pub r#type: MessageType,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdateMessage {
    pub r#type: MessageType,
    pub users: Vec<String>,
    pub count: usize,
}

/// Outbound chat frame; the optional fields are only present on AI traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub r#type: MessageType,
    pub id: String,
    pub message: String,
    pub sender: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ai_targeted: Option<bool>,
    #[serde(rename = "isAI", skip_serializing_if = "Option::is_none")]
    pub is_ai: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_commands: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

/// Any frame the server sends
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Session(SessionMessage),
    PresenceUpdate(PresenceUpdateMessage),
    Chat(ChatMessage),
    Error(ErrorMessage),
}

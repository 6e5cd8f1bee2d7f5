//! Chat WebSocket frames and parser.
//!
//! Both directions carry JSON objects tagged by a `"type"` field.
//! Inbound frames are deserialized into [`InboundEvent`]; outbound frames
//! are built from [`OutboundEvent`].

use bridgeai_core::models::chat::{ChatMessage, DEFAULT_MESSAGE_TYPE};
use bridgeai_core::types::UserId;
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message;

/// Frames pushed by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A message was sent to or by the signed-in user.
    ChatMessage(ChatMessage),

    /// Another user started or stopped typing.
    TypingIndicator(TypingIndicator),

    /// A message was deleted by its sender.
    MessageDeleted(MessageDeleted),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypingIndicator {
    pub sender_id: UserId,
    pub is_typing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeleted {
    pub message_id: String,
}

/// Frames sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    ChatMessage {
        receiver_id: UserId,
        content: String,
        message_type: String,
    },
    Typing {
        receiver_id: UserId,
        is_typing: bool,
    },
}

impl OutboundEvent {
    /// A plain text message.
    pub fn chat_message(receiver_id: impl Into<UserId>, content: impl Into<String>) -> Self {
        Self::ChatMessage {
            receiver_id: receiver_id.into(),
            content: content.into(),
            message_type: DEFAULT_MESSAGE_TYPE.to_string(),
        }
    }

    pub fn typing(receiver_id: impl Into<UserId>, is_typing: bool) -> Self {
        Self::Typing {
            receiver_id: receiver_id.into(),
            is_typing,
        }
    }

    /// Encode as a WebSocket text frame.
    pub fn to_frame(&self) -> Result<Message, serde_json::Error> {
        Ok(Message::Text(serde_json::to_string(self)?))
    }
}

/// Parse a chat WebSocket text frame into a typed event.
///
/// Returns `Err` for malformed JSON or unknown `type` values.
/// Callers should log these and continue.
pub fn parse_message(text: &str) -> Result<InboundEvent, serde_json::Error> {
    serde_json::from_str(text)
}

//! Chat messages and conversation summaries.
//!
//! The same [`ChatMessage`] shape is used by the REST history endpoint
//! and by `chat_message` WebSocket frames.

use serde::{Deserialize, Serialize};

use crate::types::{lenient_timestamp, Timestamp, UserId};

/// Message kind used when the backend omits `message_type`.
pub const DEFAULT_MESSAGE_TYPE: &str = "text";

/// Largest page the history endpoint serves.
pub const MAX_HISTORY_PAGE: u32 = 100;

/// Page size used when none is given.
pub const DEFAULT_HISTORY_PAGE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    /// Display name of the sender. Rewritten client-side to the peer's
    /// name or `"You"` once the message is attached to a conversation.
    #[serde(default)]
    pub sender_name: String,
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(with = "lenient_timestamp")]
    pub created_at: Timestamp,
    #[serde(default)]
    pub is_read: bool,
}

fn default_message_type() -> String {
    DEFAULT_MESSAGE_TYPE.to_string()
}

/// One entry of `/api/chat/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSessionSummary {
    pub id: String,
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub participant_names: Vec<String>,
    #[serde(default)]
    pub last_message: Option<ChatMessage>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(with = "lenient_timestamp")]
    pub last_activity: Timestamp,
}

impl ChatSessionSummary {
    pub fn involves(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// Display name of the participant that is not `self_id`.
    pub fn peer_name(&self, self_id: &str) -> Option<&str> {
        self.participants
            .iter()
            .position(|p| p != self_id)
            .and_then(|idx| self.participant_names.get(idx))
            .map(String::as_str)
    }
}

/// Find the conversation shared with `peer_id`, if any.
pub fn find_session_with<'a>(
    sessions: &'a [ChatSessionSummary],
    peer_id: &str,
) -> Option<&'a ChatSessionSummary> {
    sessions.iter().find(|s| s.involves(peer_id))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatHistory {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSessionList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sessions: Vec<ChatSessionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub success: bool,
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_defaults_optional_fields() {
        let json = r#"{
            "id": "m1",
            "sender_id": "42",
            "receiver_id": "7",
            "content": "hi",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.message_type, "text");
        assert!(!msg.is_read);
        assert!(msg.sender_name.is_empty());
    }

    #[test]
    fn session_lookup_by_participant() {
        let json = r#"[
            {"id": "s1", "participants": ["7", "42"], "participant_names": ["Me", "Lina"],
             "unread_count": 2, "last_activity": "2024-01-01T10:00:00"},
            {"id": "s2", "participants": ["7", "99"], "participant_names": ["Me", "Omar"],
             "unread_count": 0, "last_activity": "2024-01-02T10:00:00"}
        ]"#;
        let sessions: Vec<ChatSessionSummary> = serde_json::from_str(json).unwrap();

        let found = find_session_with(&sessions, "99").unwrap();
        assert_eq!(found.id, "s2");
        assert_eq!(found.peer_name("7"), Some("Omar"));
        assert!(find_session_with(&sessions, "13").is_none());
    }
}

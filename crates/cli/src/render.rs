//! Plain-text rendering of chat events for the terminal.

use bridgeai_chat::events::{ChatEvent, ConnectionState};
use bridgeai_core::models::chat::ChatMessage;

pub fn render_message(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        message.created_at.format("%H:%M"),
        message.sender_name,
        message.content
    )
}

/// One line for an event, or `None` when it has nothing to show.
pub fn render_event(event: &ChatEvent, peer_name: &str) -> Option<String> {
    match event {
        ChatEvent::StateChanged(ConnectionState::Connected) => Some("-- connected --".into()),
        ChatEvent::StateChanged(ConnectionState::Connecting) => Some("-- connecting... --".into()),
        ChatEvent::StateChanged(ConnectionState::Disconnected) => Some("-- disconnected --".into()),
        ChatEvent::MessageAppended(message) => Some(render_message(message)),
        ChatEvent::MessageDeleted { message_id } => {
            Some(format!("-- message {message_id} was deleted --"))
        }
        ChatEvent::PeerTyping { is_typing: true } => Some(format!("{peer_name} is typing...")),
        ChatEvent::PeerTyping { is_typing: false } => None,
        ChatEvent::Notice(text) => Some(format!("! {text}")),
        ChatEvent::LoginRequired => {
            Some("! Please sign in again: set BRIDGEAI_EMAIL and BRIDGEAI_PASSWORD and restart.".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ChatMessage {
        serde_json::from_str(r#"{
            "id": "m1",
            "sender_id": "42",
            "receiver_id": "7",
            "sender_name": "Grace",
            "content": "hi",
            "created_at": "2024-01-01T09:05:00"
        }"#)
        .unwrap()
    }

    #[test]
    fn message_line() {
        assert_eq!(render_message(&message()), "[09:05] Grace: hi");
    }

    #[test]
    fn event_lines() {
        assert_eq!(
            render_event(&ChatEvent::PeerTyping { is_typing: true }, "Grace").as_deref(),
            Some("Grace is typing...")
        );
        assert_eq!(
            render_event(&ChatEvent::PeerTyping { is_typing: false }, "Grace"),
            None
        );
        assert_eq!(
            render_event(&ChatEvent::Notice("Connection lost".into()), "Grace").as_deref(),
            Some("! Connection lost")
        );
        assert_eq!(
            render_event(&ChatEvent::MessageAppended(message()), "Grace").as_deref(),
            Some("[09:05] Grace: hi")
        );
    }
}

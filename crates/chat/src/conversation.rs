//! Local state of one open conversation: the ordered message list and
//! the peer's typing flag.

use bridgeai_core::models::chat::ChatMessage;
use bridgeai_core::types::UserId;

use crate::messages::InboundEvent;

/// Display name given to messages the signed-in user sent.
pub const SELF_LABEL: &str = "You";

/// The other participant of the open conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub id: UserId,
    pub name: String,
}

impl Peer {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// True when `message` belongs to the conversation with `peer_id`.
///
/// The socket delivers every message addressed to the signed-in user, so
/// messages from other conversations must be dropped here.
pub fn is_relevant(message: &ChatMessage, peer_id: &str) -> bool {
    message.sender_id == peer_id || message.receiver_id == peer_id
}

/// The effect an inbound event had on the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Appended(ChatMessage),
    Deleted(String),
    PeerTyping(bool),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    peer: Peer,
    messages: Vec<ChatMessage>,
    peer_typing: bool,
}

impl Conversation {
    pub fn new(peer: Peer) -> Self {
        Self {
            peer,
            messages: Vec::new(),
            peer_typing: false,
        }
    }

    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_peer_typing(&self) -> bool {
        self.peer_typing
    }

    /// Replace the list with a page of history, oldest first.
    ///
    /// Returns the number of messages kept.
    pub fn load_history(&mut self, history: Vec<ChatMessage>) -> usize {
        self.messages = history
            .into_iter()
            .filter(|m| is_relevant(m, &self.peer.id))
            .map(|m| attribute(m, &self.peer))
            .collect();
        self.messages.len()
    }

    /// Append a message if it belongs to this conversation.
    pub fn push(&mut self, message: ChatMessage) -> Option<&ChatMessage> {
        if !is_relevant(&message, &self.peer.id) {
            return None;
        }
        self.messages.push(attribute(message, &self.peer));
        self.messages.last()
    }

    /// Drop every message with `message_id`. Returns whether any was removed.
    pub fn remove(&mut self, message_id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != message_id);
        self.messages.len() != before
    }

    pub fn set_peer_typing(&mut self, is_typing: bool) {
        self.peer_typing = is_typing;
    }

    /// Flag every message received from the peer as read.
    pub fn mark_peer_messages_read(&mut self) -> usize {
        let mut marked = 0;
        for message in self
            .messages
            .iter_mut()
            .filter(|m| m.sender_id == self.peer.id && !m.is_read)
        {
            message.is_read = true;
            marked += 1;
        }
        marked
    }

    pub fn apply(&mut self, event: InboundEvent) -> Applied {
        match event {
            InboundEvent::ChatMessage(message) => match self.push(message) {
                Some(appended) => Applied::Appended(appended.clone()),
                None => Applied::Ignored,
            },
            InboundEvent::TypingIndicator(indicator) if indicator.sender_id == self.peer.id => {
                self.peer_typing = indicator.is_typing;
                Applied::PeerTyping(indicator.is_typing)
            }
            InboundEvent::TypingIndicator(_) => Applied::Ignored,
            InboundEvent::MessageDeleted(deleted) => {
                if self.remove(&deleted.message_id) {
                    Applied::Deleted(deleted.message_id)
                } else {
                    Applied::Ignored
                }
            }
        }
    }
}

fn attribute(mut message: ChatMessage, peer: &Peer) -> ChatMessage {
    message.sender_name = if message.sender_id == peer.id {
        peer.name.clone()
    } else {
        SELF_LABEL.to_string()
    };
    message
}

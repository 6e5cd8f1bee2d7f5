//! Events published by the chat manager.
//!
//! Subscribers (a terminal front end, a GUI, tests) render from these
//! instead of polling manager state.

use bridgeai_core::models::chat::ChatMessage;
use serde::Serialize;

/// Lifecycle of the chat socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// User-facing notice texts.
pub mod notices {
    pub const CONNECTION_LOST: &str = "Connection lost. Please try again once reconnected.";
    pub const DISCONNECTED: &str = "Disconnected from chat. Reconnecting...";
    pub const CONNECT_TIMEOUT: &str = "Connection timed out. Retrying...";
    pub const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";
}

#[derive(Debug, Clone, Serialize)]
pub enum ChatEvent {
    /// The socket moved to a new state.
    StateChanged(ConnectionState),

    /// A message was added to the open conversation.
    MessageAppended(ChatMessage),

    /// A message was removed from the open conversation.
    MessageDeleted { message_id: String },

    /// The peer started or stopped typing.
    PeerTyping { is_typing: bool },

    /// A transient notice for the user.
    Notice(String),

    /// Credentials are missing or were rejected; the user must sign in.
    LoginRequired,
}

//! Chat WebSocket client for one open conversation.
//!
//! [`ChatManager`](manager::ChatManager) owns the connection task: it opens
//! `ws/chat/{user}`, keeps it alive with a fixed-delay reconnect, sends
//! typing and chat frames, and publishes [`ChatEvent`](events::ChatEvent)s
//! on a broadcast channel.

pub mod client;
pub mod conversation;
pub mod events;
pub mod manager;
pub mod messages;
pub mod reconnect;
pub mod typing;

//! Wire models for the BridgeAI REST and WebSocket APIs.
//!
//! Every response type is lenient about missing fields (`#[serde(default)]`)
//! because the backend omits keys rather than sending `null` in several
//! places.

pub mod auth;
pub mod chat;
pub mod friends;
pub mod jobs;
pub mod qualification;
pub mod resume;
pub mod user;

use serde::Deserialize;

/// Generic `{success?, message}` acknowledgement returned by mutation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Acknowledgement {
    /// Absent on endpoints that only return a message; treated as success.
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

fn default_true() -> bool {
    true
}

//! Typed REST client for the BridgeAI backend.
//!
//! [`BridgeApi`] wraps a shared [`reqwest::Client`] and the
//! [`SessionContext`](bridgeai_core::session::SessionContext). Endpoint
//! groups are reached through accessor methods (`api.chat()`,
//! `api.resumes()`, ...), each a thin borrowed view over the client.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::BridgeApi;
pub use error::{ApiError, ErrorKind};

//! Shared building blocks for the BridgeAI client.
//!
//! Holds the wire models returned by the BridgeAI backend, the session
//! context that replaces browser-local storage, environment-driven
//! configuration, and client-side form validation.

pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod types;
pub mod validation;

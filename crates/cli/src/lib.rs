//! Terminal front end pieces for the `bridgeai-chat` binary: input line
//! parsing, event rendering and the REST-backed conversation actions.

pub mod actions;
pub mod input;
pub mod render;

//! Endpoint groups, one module per backend router.

pub mod auth;
pub mod chat;
pub mod friends;
pub mod jobs;
pub mod qualifications;
pub mod resumes;
pub mod users;

//! Fixed-delay reconnection policy for the chat socket.
//!
//! Every drop is retried after the same delay, except a close with
//! [`UNAUTHORIZED_CLOSE_CODE`], which means the token was rejected and
//! the user has to sign in again.

use std::time::Duration;

use tokio_tungstenite::tungstenite::protocol::CloseFrame;

/// Close code the server uses for a missing or invalid token.
pub const UNAUTHORIZED_CLOSE_CODE: u16 = 4001;

/// Why a connection (or connection attempt) ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The server sent a close frame.
    Closed { code: Option<u16>, reason: String },
    /// The stream ended without a close frame.
    StreamEnded,
    /// A read or write on the open socket failed.
    Error(String),
    /// The connection attempt failed before the socket opened.
    ConnectFailed(String),
    /// The socket did not open within the connect timeout.
    ConnectTimeout,
}

impl CloseReason {
    pub fn from_frame(frame: Option<CloseFrame<'_>>) -> Self {
        match frame {
            Some(frame) => Self::Closed {
                code: Some(u16::from(frame.code)),
                reason: frame.reason.to_string(),
            },
            None => Self::Closed {
                code: None,
                reason: String::new(),
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Closed {
                code: Some(UNAUTHORIZED_CLOSE_CODE),
                ..
            }
        )
    }
}

/// What to do after a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Try again after the given delay.
    Retry(Duration),
    /// Credentials were rejected; clear them and stop.
    Logout,
}

#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    delay: Duration,
}

impl ReconnectPolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn decide(&self, reason: &CloseReason) -> ReconnectDecision {
        if reason.is_unauthorized() {
            ReconnectDecision::Logout
        } else {
            ReconnectDecision::Retry(self.delay)
        }
    }
}

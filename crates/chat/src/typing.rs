//! Trailing-edge debounce for the outbound typing indicator.
//!
//! Every keystroke pushes the deadline out by the idle period; when the
//! deadline passes with no further keystroke, exactly one "stopped typing"
//! frame is due.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct TypingDebouncer {
    idle: Duration,
    deadline: Option<Instant>,
}

impl TypingDebouncer {
    pub fn new(idle: Duration) -> Self {
        Self {
            idle,
            deadline: None,
        }
    }

    /// Record a keystroke at `now`, rearming the stop timer.
    pub fn keystroke(&mut self, now: Instant) {
        self.deadline = Some(now + self.idle);
    }

    /// When the stop frame is due, if a keystroke is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the pending stop if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Sleep until `deadline`, or forever when there is none.
///
/// Lets an optional timer sit in a `tokio::select!` branch.
pub async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

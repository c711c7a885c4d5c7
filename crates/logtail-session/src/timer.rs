//! Deadline timers owned by the session driver.
//!
//! Both timers are plain deadlines: the driver polls `deadline()` inside its
//! `select!` and calls `fire()` when it elapses. Nothing here spawns tasks,
//! so cancelling is just forgetting the deadline.

use std::time::Duration;

use tokio::time::Instant;

/// Restartable quiet-period timer.
///
/// Every `trigger` pushes the deadline out by the full delay, so the timer
/// fires once, `delay` after the last trigger of a burst.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// Create an idle timer.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the timer from now.
    pub fn trigger(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Forget any pending deadline.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// When the timer fires, if armed.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a deadline is armed.
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm after the deadline elapsed. Returns whether it was armed.
    pub const fn fire(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

/// One-shot reconnect timer that is never stacked.
#[derive(Debug, Clone)]
pub struct ReconnectTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl ReconnectTimer {
    /// Create an idle timer.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm the timer unless it is already pending.
    ///
    /// Returns `false` when a reconnect was already scheduled.
    pub fn schedule(&mut self) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(Instant::now() + self.delay);
        true
    }

    /// Forget any pending deadline.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// When the timer fires, if armed.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a reconnect is scheduled.
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm after the deadline elapsed. Returns whether it was armed.
    pub const fn fire(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

/// Sleep until `deadline`, or forever when there is none.
pub(crate) async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

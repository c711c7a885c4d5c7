//! Session lifecycle state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a log session.
///
/// `Idle → Connecting → Open → (Closed → Connecting)* → Destroyed`.
/// `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Constructed, never connected.
    Idle,
    /// A socket is being opened.
    Connecting,
    /// The socket is open (possibly still waiting for its token).
    Open,
    /// The socket closed; a reconnect may be pending.
    Closed,
    /// Torn down; no further activity.
    Destroyed,
}

impl SessionState {
    /// Whether the session has been destroyed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Destroyed => "destroyed",
        };
        f.write_str(label)
    }
}

/// Identifies one socket instance of a session.
///
/// Ids increase monotonically per session. Events tagged with an id other
/// than the current connection's are stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//! Domain types for log streaming.
//!
//! Pure data with no I/O: entries and their buffer, connect parameters,
//! the wire frame codec and the session state machine labels.

mod entry;
mod frame;
mod params;
mod state;
mod token;

pub use entry::{LogBuffer, LogEntry};
pub use frame::{
    ACCESS_TOKEN_FIELD, FrameError, LogRecord, PERMISSION_DENIED_STATUS, parse_frame,
    subscription_frame,
};
pub use params::{ConnectParams, DEFAULT_SOCKET_BASE, StreamKind, TokenParams};
pub use state::{ConnectionId, SessionState};
pub use token::AccessToken;

#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_DEBOUNCE_DELAY, DEFAULT_RECONNECT_DELAY, SessionConfig};
pub use domain::{
    AccessToken, ConnectParams, ConnectionId, FrameError, LogBuffer, LogEntry, LogRecord,
    SessionState, StreamKind, TokenParams,
};
pub use error::LogtailError;
pub use ports::{
    AccessTokenProvider, CallbackConsumer, LogConsumer, NoopConsumer, SocketConnector,
    SocketHalves, SocketSink, TokenError, TokenResult, TransportError, TransportResult,
};

//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the session expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No reqwest or tungstenite types in any signature
//! - Async methods for network operations
//! - Consumer callbacks are synchronous and must not block

pub mod consumer;
pub mod socket;
pub mod token;

pub use consumer::{CallbackConsumer, LogConsumer, NoopConsumer};
pub use socket::{
    FrameStream, SocketConnector, SocketHalves, SocketSink, TransportError, TransportResult,
};
pub use token::{AccessTokenProvider, TokenError, TokenResult};

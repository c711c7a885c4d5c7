//! Socket transport port.
//!
//! The session only needs three things from a transport: open a socket to a
//! URL, send text frames, and receive text frames until the socket closes.
//! The production adapter (tungstenite) lives in `logtail-session`.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

/// Errors raised by a socket transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The socket could not be opened.
    #[error("failed to open socket to {url}: {message}")]
    Connect {
        /// Target URL
        url: String,
        /// Underlying failure
        message: String,
    },

    /// A frame could not be written.
    #[error("failed to send frame: {0}")]
    Send(String),

    /// The socket failed while reading.
    #[error("socket receive error: {0}")]
    Receive(String),

    /// The socket is already closed.
    #[error("socket closed")]
    Closed,
}

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Write half of an open socket.
#[async_trait]
pub trait SocketSink: Send {
    /// Send one text frame.
    async fn send_text(&mut self, text: String) -> TransportResult<()>;

    /// Close the socket. Never fails; errors while closing are dropped.
    async fn close(&mut self);
}

/// Stream of inbound text frames. Ends when the socket closes.
pub type FrameStream = BoxStream<'static, TransportResult<String>>;

/// Both halves of an open socket.
pub struct SocketHalves {
    /// Outbound half
    pub sink: Box<dyn SocketSink>,
    /// Inbound half
    pub stream: FrameStream,
}

impl SocketHalves {
    /// Bundle a sink and a stream.
    pub fn new(sink: Box<dyn SocketSink>, stream: FrameStream) -> Self {
        Self { sink, stream }
    }
}

/// Port for opening sockets to a log stream URL.
#[async_trait]
pub trait SocketConnector: Send + Sync {
    /// Open a socket. Resolves once the socket is ready to send.
    async fn open(&self, url: &str) -> TransportResult<SocketHalves>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn _assert_object_safe(_: Arc<dyn SocketConnector>, _: Box<dyn SocketSink>) {}

    #[test]
    fn test_connect_error_mentions_url() {
        let err = TransportError::Connect {
            url: "wss://example.test/build/logs".to_string(),
            message: "refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("wss://example.test/build/logs"));
        assert!(msg.contains("refused"));
    }
}

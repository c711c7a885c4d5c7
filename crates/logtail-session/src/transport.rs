//! WebSocket adapter for the socket port.
//!
//! Wraps `tokio_tungstenite::connect_async`. Text frames pass through,
//! binary frames are decoded as UTF-8 (lossy), ping/pong is answered by
//! tungstenite itself, and a close frame ends the inbound stream.

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt, future};
use logtail_core::{SocketConnector, SocketHalves, SocketSink, TransportError, TransportResult};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production socket connector over tungstenite (rustls, webpki roots).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    /// Create a connector.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SocketConnector for WsConnector {
    async fn open(&self, url: &str) -> TransportResult<SocketHalves> {
        let (socket, response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        debug!(url, status = %response.status(), "WebSocket handshake complete");

        let (sink, stream) = socket.split();
        let frames = stream
            .take_while(|message| future::ready(!matches!(message, Ok(Message::Close(_)))))
            .filter_map(|message| future::ready(decode_message(message)))
            .boxed();

        Ok(SocketHalves::new(Box::new(WsSink { inner: sink }), frames))
    }
}

/// Map one tungstenite message to an inbound text frame, if it carries one.
fn decode_message(message: Result<Message, tungstenite::Error>) -> Option<TransportResult<String>> {
    match message {
        Ok(Message::Text(text)) => Some(Ok(text)),
        Ok(Message::Binary(bytes)) => Some(Ok(String::from_utf8_lossy(&bytes).into_owned())),
        Ok(Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_)) => None,
        Err(e) => Some(Err(TransportError::Receive(e.to_string()))),
    }
}

struct WsSink {
    inner: SplitSink<WsStream, Message>,
}

#[async_trait]
impl SocketSink for WsSink {
    async fn send_text(&mut self, text: String) -> TransportResult<()> {
        self.inner
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.inner.close().await {
            debug!(error = %e, "Error while closing WebSocket");
        }
    }
}

//! In-memory collaborators for driving a `LogSession` in tests.
//!
//! No network access: sockets are channel pairs handed to the test as soon
//! as the session opens them.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use logtail_core::{
    AccessToken, AccessTokenProvider, LogConsumer, LogEntry, SessionConfig, SocketConnector,
    SocketHalves, SocketSink, TokenError, TokenParams, TokenResult, TransportError,
    TransportResult,
};
use logtail_session::{LogSession, SessionDeps};
use tokio::sync::mpsc;

pub const STREAM_URL: &str = "wss://logs.test/build/logs";

// ── Fake sockets ───────────────────────────────────────────────────

/// The server side of one socket opened by the session.
pub struct FakeSocket {
    pub url: String,
    sent: mpsc::UnboundedReceiver<String>,
    server: Option<mpsc::UnboundedSender<TransportResult<String>>>,
    closed: Arc<AtomicBool>,
}

impl FakeSocket {
    /// Deliver a frame to the session.
    pub fn push(&self, frame: &str) {
        if let Some(server) = &self.server {
            let _ = server.send(Ok(frame.to_string()));
        }
    }

    /// Deliver a receive error to the session.
    pub fn fail(&self, message: &str) {
        if let Some(server) = &self.server {
            let _ = server.send(Err(TransportError::Receive(message.to_string())));
        }
    }

    /// Close the socket from the server side.
    pub fn hang_up(&mut self) {
        self.server.take();
    }

    /// Next frame the session sent, if any is queued.
    pub fn try_next_sent(&mut self) -> Option<String> {
        self.sent.try_recv().ok()
    }

    /// Wait for the next frame the session sends.
    pub async fn next_sent(&mut self) -> String {
        self.sent.recv().await.expect("socket sink dropped")
    }

    /// Whether the session closed its end.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct FakeSink {
    sent: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl SocketSink for FakeSink {
    async fn send_text(&mut self, text: String) -> TransportResult<()> {
        self.sent.send(text).map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Connector that hands every opened socket to the test.
pub struct FakeConnector {
    opened: mpsc::UnboundedSender<FakeSocket>,
    failures: AtomicUsize,
}

impl FakeConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<FakeSocket>) {
        let (opened, sockets) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            opened,
            failures: AtomicUsize::new(0),
        });
        (connector, sockets)
    }

    /// Make the next `n` opens fail.
    pub fn fail_next_opens(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl SocketConnector for FakeConnector {
    async fn open(&self, url: &str) -> TransportResult<SocketHalves> {
        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(TransportError::Connect {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let stream = futures_util::stream::unfold(server_rx, |mut rx| async move {
            rx.recv().await.map(|frame| (frame, rx))
        })
        .boxed();
        let sink = FakeSink {
            sent: sent_tx,
            closed: closed.clone(),
        };

        let _ = self.opened.send(FakeSocket {
            url: url.to_string(),
            sent: sent_rx,
            server: Some(server_tx),
            closed,
        });
        Ok(SocketHalves::new(Box::new(sink), stream))
    }
}

// ── Token provider ─────────────────────────────────────────────────

/// Token provider answering from a script, then with `"tok"`.
#[derive(Default)]
pub struct StubTokens {
    script: Mutex<VecDeque<TokenResult<AccessToken>>>,
    calls: Mutex<Vec<TokenParams>>,
    invalidations: AtomicUsize,
}

impl StubTokens {
    pub fn push_ok(&self, token: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(AccessToken::new(token)));
    }

    pub fn push_err(&self, status: u16) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(TokenError::RequestFailed {
                status: Some(status),
                message: "denied".to_string(),
            }));
    }

    pub fn calls(&self) -> Vec<TokenParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessTokenProvider for StubTokens {
    async fn fetch_access_token(&self, params: &TokenParams) -> TokenResult<AccessToken> {
        self.calls.lock().unwrap().push(params.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AccessToken::new("tok")))
    }

    fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Consumer ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingConsumer {
    updates: Mutex<Vec<Vec<LogEntry>>>,
    forbidden: AtomicUsize,
}

impl RecordingConsumer {
    pub fn updates(&self) -> Vec<Vec<LogEntry>> {
        self.updates.lock().unwrap().clone()
    }

    pub fn forbidden(&self) -> usize {
        self.forbidden.load(Ordering::SeqCst)
    }
}

impl LogConsumer for RecordingConsumer {
    fn on_logs_updated(&self, snapshot: Vec<LogEntry>) {
        self.updates.lock().unwrap().push(snapshot);
    }

    fn on_forbidden(&self) {
        self.forbidden.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub struct Harness {
    pub session: LogSession,
    pub connector: Arc<FakeConnector>,
    pub sockets: mpsc::UnboundedReceiver<FakeSocket>,
    pub tokens: Arc<StubTokens>,
    pub consumer: Arc<RecordingConsumer>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::new(STREAM_URL))
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let (connector, sockets) = FakeConnector::new();
        let tokens = Arc::new(StubTokens::default());
        let consumer = Arc::new(RecordingConsumer::default());
        let deps = SessionDeps::new(tokens.clone(), connector.clone(), consumer.clone());

        Self {
            session: LogSession::new(config, deps),
            connector,
            sockets,
            tokens,
            consumer,
        }
    }

    /// Wait for the session to open its next socket.
    pub async fn next_socket(&mut self) -> FakeSocket {
        self.sockets.recv().await.expect("connector dropped")
    }

    /// The next opened socket, if one was opened already.
    pub fn try_next_socket(&mut self) -> Option<FakeSocket> {
        self.sockets.try_recv().ok()
    }
}

/// Let spawned tasks run without moving the paused clock meaningfully.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock by `ms` milliseconds, running due timers.
pub async fn advance(ms: u64) {
    settle().await;
    tokio::time::sleep(Duration::from_millis(ms)).await;
    settle().await;
}

pub fn entry(ts: i64, message: &str) -> String {
    serde_json::json!({ "ts": ts, "message": message }).to_string()
}

//! Log session handle and its driver task.
//!
//! A `LogSession` is a thin handle. All mutable state (buffer, timers,
//! current socket, last parameters) lives in one driver task that processes
//! events one at a time from an unbounded channel:
//!
//! - commands from the handle (`connect`)
//! - socket events from the connection task of each socket
//! - token results from the token task of each socket
//!
//! Every socket event carries the `ConnectionId` of the socket it came from.
//! Events from a socket that is no longer current are dropped, which is how
//! a superseded socket is kept from touching the buffer or scheduling a
//! reconnect.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::StreamExt;
use logtail_core::domain::{parse_frame, subscription_frame};
use logtail_core::{
    AccessToken, AccessTokenProvider, ConnectParams, ConnectionId, LogBuffer, LogConsumer,
    SessionConfig, SessionState, SocketConnector, SocketHalves, TokenResult, TransportError,
};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::timer::{DebounceTimer, ReconnectTimer, sleep_until_opt};

/// Collaborators of a session.
#[derive(Clone)]
pub struct SessionDeps {
    /// Source of access tokens
    pub tokens: Arc<dyn AccessTokenProvider>,
    /// Opens sockets to the stream URL
    pub connector: Arc<dyn SocketConnector>,
    /// Receives buffer snapshots and permission failures
    pub consumer: Arc<dyn LogConsumer>,
}

impl SessionDeps {
    /// Bundle the three collaborators.
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        connector: Arc<dyn SocketConnector>,
        consumer: Arc<dyn LogConsumer>,
    ) -> Self {
        Self {
            tokens,
            connector,
            consumer,
        }
    }
}

/// Events processed by the driver.
#[derive(Debug)]
pub(crate) enum SessionEvent {
    /// The handle asked for a new socket.
    Connect {
        id: ConnectionId,
        params: ConnectParams,
    },
    /// The socket is ready to send.
    Opened { id: ConnectionId },
    /// The token task finished.
    TokenResolved {
        id: ConnectionId,
        result: TokenResult<AccessToken>,
    },
    /// A text frame arrived.
    Message { id: ConnectionId, text: String },
    /// The socket failed; a `Closed` follows.
    Failed {
        id: ConnectionId,
        error: TransportError,
    },
    /// The socket is gone.
    Closed { id: ConnectionId },
}

impl SessionEvent {
    const fn connection_id(&self) -> ConnectionId {
        match self {
            Self::Connect { id, .. }
            | Self::Opened { id }
            | Self::TokenResolved { id, .. }
            | Self::Message { id, .. }
            | Self::Failed { id, .. }
            | Self::Closed { id } => *id,
        }
    }
}

/// Handle to a running log session.
///
/// Dropping the handle destroys the session.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use logtail_core::{ConnectParams, NoopConsumer, SessionConfig, StreamKind};
/// use logtail_session::{LogSession, SessionDeps, WsConnector};
/// # async fn run(tokens: Arc<dyn logtail_core::AccessTokenProvider>) {
/// let deps = SessionDeps::new(tokens, Arc::new(WsConnector::new()), Arc::new(NoopConsumer::new()));
/// let session = LogSession::new(SessionConfig::for_stream(StreamKind::Build), deps);
/// session.connect(ConnectParams::deploy("site-1", "deploy-1"));
/// # }
/// ```
pub struct LogSession {
    events: mpsc::UnboundedSender<SessionEvent>,
    destroyed: CancellationToken,
    state: watch::Receiver<SessionState>,
    next_id: Arc<AtomicU64>,
}

impl LogSession {
    /// Create a session and spawn its driver onto the current tokio runtime.
    ///
    /// No socket is opened until `connect` is called.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(config: SessionConfig, deps: SessionDeps) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let destroyed = CancellationToken::new();
        let next_id = Arc::new(AtomicU64::new(0));

        let driver = SessionDriver::new(
            config,
            deps,
            events_tx.clone(),
            destroyed.clone(),
            state_tx,
            next_id.clone(),
        );
        tokio::spawn(driver.run(events_rx));

        Self {
            events: events_tx,
            destroyed,
            state: state_rx,
            next_id,
        }
    }

    /// Open a socket with the given parameters.
    ///
    /// Non-blocking. Any current socket and any scheduled reconnect are
    /// superseded. The parameters are kept for automatic reconnects.
    pub fn connect(&self, params: ConnectParams) -> ConnectionId {
        let id = allocate_id(&self.next_id);
        if self.destroyed.is_cancelled() {
            warn!(connection_id = %id, "connect called on a destroyed log session");
            return id;
        }
        if self.events.send(SessionEvent::Connect { id, params }).is_err() {
            warn!(connection_id = %id, "Log session driver is gone");
        }
        id
    }

    /// Tear the session down.
    ///
    /// Takes effect immediately for callbacks and reconnects; the driver
    /// then closes the socket and exits. Safe to call repeatedly.
    pub fn destroy(&self) {
        if !self.destroyed.is_cancelled() {
            debug!("Destroying log session");
            self.destroyed.cancel();
        }
    }

    /// Whether `destroy` has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.is_cancelled()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.destroyed.is_cancelled() {
            return SessionState::Destroyed;
        }
        *self.state.borrow()
    }

    /// Subscribe to lifecycle state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn allocate_id(counter: &AtomicU64) -> ConnectionId {
    ConnectionId(counter.fetch_add(1, Ordering::SeqCst) + 1)
}

// ============================================================================
// Driver
// ============================================================================

/// The socket the session currently listens to.
struct ActiveConnection {
    id: ConnectionId,
    outgoing: mpsc::UnboundedSender<String>,
    shutdown: CancellationToken,
}

impl ActiveConnection {
    fn close(self) {
        debug!(connection_id = %self.id, "Shutting down socket");
        self.shutdown.cancel();
    }
}

/// Owns all session state; runs until the session is destroyed.
pub(crate) struct SessionDriver {
    config: SessionConfig,
    deps: SessionDeps,
    events: mpsc::UnboundedSender<SessionEvent>,
    destroyed: CancellationToken,
    state: watch::Sender<SessionState>,
    next_id: Arc<AtomicU64>,
    buffer: LogBuffer,
    current: Option<ActiveConnection>,
    last_params: Option<ConnectParams>,
    debounce: DebounceTimer,
    reconnect: ReconnectTimer,
}

impl SessionDriver {
    pub(crate) fn new(
        config: SessionConfig,
        deps: SessionDeps,
        events: mpsc::UnboundedSender<SessionEvent>,
        destroyed: CancellationToken,
        state: watch::Sender<SessionState>,
        next_id: Arc<AtomicU64>,
    ) -> Self {
        let debounce = DebounceTimer::new(config.debounce_delay);
        let reconnect = ReconnectTimer::new(config.reconnect_delay);
        Self {
            config,
            deps,
            events,
            destroyed,
            state,
            next_id,
            buffer: LogBuffer::new(),
            current: None,
            last_params: None,
            debounce,
            reconnect,
        }
    }

    pub(crate) async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        let destroyed = self.destroyed.clone();
        debug!(url = %self.config.url, "Log session driver started");

        loop {
            tokio::select! {
                biased;

                () = destroyed.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                () = sleep_until_opt(self.reconnect.deadline()) => self.on_reconnect_due(),
                () = sleep_until_opt(self.debounce.deadline()) => self.on_debounce_due(),
            }
        }

        self.teardown();
    }

    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    fn is_current(&self, id: ConnectionId) -> bool {
        self.current.as_ref().is_some_and(|c| c.id == id)
    }

    pub(crate) fn handle_event(&mut self, event: SessionEvent) {
        let id = event.connection_id();
        if !matches!(event, SessionEvent::Connect { .. }) && !self.is_current(id) {
            debug!(connection_id = %id, "Ignoring event from stale socket");
            return;
        }

        match event {
            SessionEvent::Connect { id, params } => self.on_connect(id, params),
            SessionEvent::Opened { id } => self.on_opened(id),
            SessionEvent::TokenResolved { id, result } => self.on_token(id, result),
            SessionEvent::Message { id, text } => self.on_message(id, &text),
            SessionEvent::Failed { id, error } => {
                error!(connection_id = %id, error = %error, "Log stream socket error");
            }
            SessionEvent::Closed { id } => self.on_closed(id),
        }
    }

    fn on_connect(&mut self, id: ConnectionId, params: ConnectParams) {
        if self.destroyed.is_cancelled() {
            return;
        }
        if self.reconnect.is_pending() {
            debug!("Explicit connect supersedes scheduled reconnect");
            self.reconnect.cancel();
        }
        if let Some(previous) = self.current.take() {
            previous.close();
        }

        self.last_params = Some(params);
        self.open_connection(id);
    }

    fn open_connection(&mut self, id: ConnectionId) {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let shutdown = self.destroyed.child_token();
        let url = self.config.url.clone();

        info!(connection_id = %id, url = %url, "Opening log stream socket");
        tokio::spawn(run_connection(
            id,
            url,
            self.deps.connector.clone(),
            self.events.clone(),
            outgoing_rx,
            shutdown.clone(),
        ));

        self.current = Some(ActiveConnection {
            id,
            outgoing: outgoing_tx,
            shutdown,
        });
        self.set_state(SessionState::Connecting);
    }

    fn on_opened(&self, id: ConnectionId) {
        debug!(connection_id = %id, "Log stream socket open");
        self.set_state(SessionState::Open);

        let Some(params) = self.last_params.as_ref() else {
            return;
        };
        let query = params.token_query_with_defaults(&self.config.default_params);
        let tokens = self.deps.tokens.clone();
        let events = self.events.clone();
        let destroyed = self.destroyed.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = destroyed.cancelled() => {}
                result = tokens.fetch_access_token(&query) => {
                    let _ = events.send(SessionEvent::TokenResolved { id, result });
                }
            }
        });
    }

    fn on_token(&self, id: ConnectionId, result: TokenResult<AccessToken>) {
        let token = match result {
            Ok(token) => token,
            Err(e) => {
                error!(connection_id = %id, error = %e, "Failed to get access token; socket stays unauthenticated");
                return;
            }
        };

        let (Some(params), Some(current)) = (self.last_params.as_ref(), self.current.as_ref())
        else {
            return;
        };
        let frame = subscription_frame(&params.payload, &token);
        if current.outgoing.send(frame).is_err() {
            warn!(connection_id = %id, "Socket closed before subscription could be sent");
        } else {
            debug!(connection_id = %id, "Subscription frame queued");
        }
    }

    fn on_message(&mut self, id: ConnectionId, text: &str) {
        match parse_frame(text) {
            Ok(record) => {
                self.buffer.push(record.timestamp, record.message);
                self.debounce.trigger();
            }
            Err(e) if e.is_permission_denied() => {
                warn!(connection_id = %id, error = %e, "Log stream rejected access token");
                self.deps.tokens.invalidate();
                if !self.destroyed.is_cancelled() {
                    self.deps.consumer.on_forbidden();
                }
            }
            Err(e) => {
                warn!(connection_id = %id, error = %e, "Ignoring log stream frame");
            }
        }
    }

    fn on_closed(&mut self, id: ConnectionId) {
        info!(connection_id = %id, "Log stream socket closed");
        self.current = None;
        self.set_state(SessionState::Closed);

        if self.destroyed.is_cancelled() || self.last_params.is_none() {
            return;
        }
        if self.reconnect.schedule() {
            debug!(delay = ?self.config.reconnect_delay, "Reconnect scheduled");
        }
    }

    fn on_reconnect_due(&mut self) {
        if !self.reconnect.fire() || self.destroyed.is_cancelled() {
            return;
        }
        if self.current.is_some() || self.last_params.is_none() {
            return;
        }
        let id = allocate_id(&self.next_id);
        info!(connection_id = %id, "Reconnecting log stream");
        self.open_connection(id);
    }

    fn on_debounce_due(&mut self) {
        if !self.debounce.fire() || self.destroyed.is_cancelled() {
            return;
        }
        debug!(entries = self.buffer.len(), "Notifying log consumer");
        self.deps.consumer.on_logs_updated(self.buffer.snapshot());
    }

    fn teardown(&mut self) {
        self.reconnect.cancel();
        self.debounce.cancel();
        if let Some(current) = self.current.take() {
            current.close();
        }
        self.set_state(SessionState::Destroyed);
        debug!(entries = self.buffer.len(), "Log session driver stopped");
    }
}

// ============================================================================
// Connection task
// ============================================================================

/// Drive one socket: open it, forward inbound frames, write queued frames.
///
/// Always reports `Closed` once the socket is gone unless it was shut down
/// before it finished opening.
async fn run_connection(
    id: ConnectionId,
    url: String,
    connector: Arc<dyn SocketConnector>,
    events: mpsc::UnboundedSender<SessionEvent>,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    shutdown: CancellationToken,
) {
    let opened = tokio::select! {
        biased;
        () = shutdown.cancelled() => return,
        result = connector.open(&url) => result,
    };

    let SocketHalves {
        mut sink,
        mut stream,
    } = match opened {
        Ok(halves) => halves,
        Err(error) => {
            let _ = events.send(SessionEvent::Failed { id, error });
            let _ = events.send(SessionEvent::Closed { id });
            return;
        }
    };
    let _ = events.send(SessionEvent::Opened { id });

    loop {
        tokio::select! {
            biased;

            () = shutdown.cancelled() => break,
            Some(text) = outgoing.recv() => {
                if let Err(error) = sink.send_text(text).await {
                    let _ = events.send(SessionEvent::Failed { id, error });
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(text)) => {
                    let _ = events.send(SessionEvent::Message { id, text });
                }
                Some(Err(error)) => {
                    let _ = events.send(SessionEvent::Failed { id, error });
                    break;
                }
                None => break,
            },
        }
    }

    sink.close().await;
    let _ = events.send(SessionEvent::Closed { id });
}

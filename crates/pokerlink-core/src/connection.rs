//! Game-session socket state machine.
//!
//! Manages the socket lifecycle, token authentication and reconnection with
//! exponential backoff. Uses the action pattern: methods take time as input
//! and return actions for the driver to execute. The driver reports socket
//! events back through `handle_*` methods tagged with the [`SocketId`] it was
//! given, so events from a superseded socket are recognised and ignored.
//!
//! # State Machine
//!
//! ```text
//!                 connect()        open
//! ┌──────────────┐ ───────> ┌────────────┐ ─────> ┌───────────┐
//! │ Disconnected │          │ Connecting │        │ Connected │
//! └──────────────┘ <─────── └────────────┘        └───────────┘
//!        ↑  ↑    4409 / disconnect() │ close            │ close
//!        │  │                        ↓                  ↓
//!        │  │   retries exhausted ┌──────────────┐ <────┘
//!        │  └──────────────────── │ Reconnecting │ ──────> Connected
//!        └─────────────────────── └──────────────┘  open
//!                 no token
//! ```

use std::{
    fmt,
    ops::Sub,
    time::{Duration, Instant},
};

use pokerlink_proto::{ClientFrame, ClientMessage, InboundFrame};
use url::Url;

use crate::error::ConnectionError;

/// Delay before each reconnect attempt; the last entry repeats.
pub const DEFAULT_BACKOFF: [Duration; 6] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
    Duration::from_secs(16),
    Duration::from_secs(30),
];

/// Attempts allowed beyond the length of the backoff table.
pub const DEFAULT_EXTRA_ATTEMPTS: u32 = 4;

/// Close code the server uses when another client took over the session.
pub const CLOSE_CONNECTION_REPLACED: u16 = 4409;

/// Close code for an intentional client disconnect.
pub const CLOSE_NORMAL: u16 = 1000;

/// Identifies one physical socket. Every open gets a fresh id.
pub type SocketId = u64;

/// Actions returned by the connection manager.
///
/// Socket actions (`OpenSocket`, `SendText`, `CloseSocket`) are for the
/// transport driver. The rest are outputs for the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Connection state changed
    StateChanged(ConnectionState),

    /// Open a socket to this URL and report its events under `socket`
    OpenSocket {
        /// Id to tag this socket's events with
        socket: SocketId,
        /// Full URL including the token query parameter
        url: String,
    },

    /// Send a text frame on an open socket
    SendText {
        /// Target socket
        socket: SocketId,
        /// Encoded frame
        text: String,
    },

    /// Close a socket
    CloseSocket {
        /// Socket to close
        socket: SocketId,
        /// WebSocket close code
        code: u16,
        /// Close reason
        reason: String,
    },

    /// A frame arrived from the server
    Deliver(InboundFrame),

    /// The transport reported an error
    TransportError(String),

    /// Another client took over this session; no reconnect will follow
    SessionReplaced,
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No socket and no reconnect pending
    #[default]
    Disconnected,
    /// First socket of a `connect()` is opening
    Connecting,
    /// Socket is open
    Connected,
    /// Waiting for, or opening, a retry socket
    Reconnecting,
}

impl ConnectionState {
    /// Upper-case label, as shown to users.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Reconnecting => "RECONNECTING",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Delay before each retry, indexed by attempt; the last entry repeats
    pub backoff: Vec<Duration>,
    /// Retries allowed beyond `backoff.len()`
    pub extra_attempts: u32,
    /// Close code that suppresses reconnection
    pub replaced_close_code: u16,
    /// Close code sent on intentional disconnect
    pub normal_close_code: u16,
}

impl ConnectionConfig {
    /// Retries before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.backoff.len() as u32 + self.extra_attempts
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let last = self.backoff.len().saturating_sub(1);
        self.backoff.get((attempt as usize).min(last)).copied().unwrap_or_default()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            backoff: DEFAULT_BACKOFF.to_vec(),
            extra_attempts: DEFAULT_EXTRA_ATTEMPTS,
            replaced_close_code: CLOSE_CONNECTION_REPLACED,
            normal_close_code: CLOSE_NORMAL,
        }
    }
}

/// Connection manager state machine
///
/// Owns at most one socket and at most one pending reconnect. This is a pure
/// state machine: no I/O, no clock. Time is passed to methods that need it.
///
/// Generic over `Instant` to support both real time and virtual time for
/// deterministic testing.
#[derive(Debug, Clone)]
pub struct ConnectionManager<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    config: ConnectionConfig,
    state: ConnectionState,
    endpoint: Option<Url>,
    initial_token: Option<String>,
    reconnect_token: Option<String>,
    /// Last sequence number stamped on an outbound frame
    sequence_number: u64,
    reconnect_attempt: u32,
    /// When the pending retry was scheduled, and how long it waits
    pending_reconnect: Option<(I, Duration)>,
    socket: Option<SocketId>,
    socket_open: bool,
    next_socket_id: SocketId,
    intentional_close: bool,
}

impl<I> ConnectionManager<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a manager in [`ConnectionState::Disconnected`].
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            endpoint: None,
            initial_token: None,
            reconnect_token: None,
            sequence_number: 0,
            reconnect_attempt: 0,
            pending_reconnect: None,
            socket: None,
            socket_open: false,
            next_socket_id: 1,
            intentional_close: false,
        }
    }

    /// Current connection state
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Last sequence number sent. Zero before the first send.
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Retries fired since the last successful open.
    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    /// Socket currently opening or open.
    pub fn current_socket(&self) -> Option<SocketId> {
        self.socket
    }

    /// Time left before the pending retry fires. `None` if no retry pending.
    pub fn reconnect_due_in(&self, now: I) -> Option<Duration> {
        self.pending_reconnect
            .map(|(scheduled_at, delay)| delay.saturating_sub(now - scheduled_at))
    }

    /// Open a socket to `endpoint?token=<token>`.
    ///
    /// Supersedes any previous socket and cancels any pending retry. Resets
    /// the attempt and sequence counters. A reconnect token from an earlier
    /// session is discarded; the server issues a new one in `CONNECTED`.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidEndpoint` if `endpoint` is not a `ws` or
    ///   `wss` URL. State is unchanged in that case.
    pub fn connect(
        &mut self,
        endpoint: &str,
        token: &str,
    ) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let url = parse_endpoint(endpoint)?;
        let mut actions = Vec::new();

        if let Some(socket) = self.socket.take() {
            actions.push(ConnectionAction::CloseSocket {
                socket,
                code: self.config.normal_close_code,
                reason: "superseded by new connection".to_string(),
            });
        }

        self.endpoint = Some(url);
        self.initial_token = Some(token.to_string());
        self.reconnect_token = None;
        self.pending_reconnect = None;
        self.intentional_close = false;
        self.reconnect_attempt = 0;
        self.sequence_number = 0;
        self.socket_open = false;

        tracing::info!(endpoint, "connecting");
        self.open_socket(token, &mut actions);
        Ok(actions)
    }

    /// Send a message if a socket is open.
    ///
    /// With no open socket the message is dropped: nothing is queued and the
    /// sequence counter does not advance.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be serialized
    pub fn send(&mut self, message: ClientMessage) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let Some(socket) = self.socket.filter(|_| self.socket_open) else {
            tracing::debug!(kind = %message.kind(), "dropping message, socket not open");
            return Ok(Vec::new());
        };

        let sequence_number = self.sequence_number + 1;
        let text = ClientFrame { sequence_number, message }.encode()?;
        self.sequence_number = sequence_number;

        Ok(vec![ConnectionAction::SendText { socket, text }])
    }

    /// Record the token to present on future reconnects.
    pub fn set_reconnect_token(&mut self, token: impl Into<String>) {
        self.reconnect_token = Some(token.into());
    }

    /// Close intentionally. No reconnection follows.
    pub fn disconnect(&mut self) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();

        self.intentional_close = true;
        self.pending_reconnect = None;
        self.socket_open = false;

        if let Some(socket) = self.socket.take() {
            actions.push(ConnectionAction::CloseSocket {
                socket,
                code: self.config.normal_close_code,
                reason: "Client disconnect".to_string(),
            });
        }

        self.set_state(ConnectionState::Disconnected, &mut actions);
        actions
    }

    /// The driver finished opening `socket`.
    pub fn handle_open(&mut self, socket: SocketId) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();
        if !self.is_current(socket) {
            return actions;
        }

        self.socket_open = true;
        self.reconnect_attempt = 0;
        self.set_state(ConnectionState::Connected, &mut actions);
        actions
    }

    /// A text frame arrived on `socket`.
    ///
    /// Text that is not JSON is logged and dropped. Anything else is
    /// delivered; validating the envelope is the session layer's job.
    pub fn handle_text(&mut self, socket: SocketId, text: &str) -> Vec<ConnectionAction> {
        if !self.is_current(socket) {
            return Vec::new();
        }

        match InboundFrame::parse(text) {
            Ok(frame) => vec![ConnectionAction::Deliver(frame)],
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed frame");
                Vec::new()
            },
        }
    }

    /// The transport reported an error on `socket`.
    ///
    /// Errors never change state; the close that follows drives recovery.
    pub fn handle_error(&mut self, socket: SocketId, message: &str) -> Vec<ConnectionAction> {
        if !self.is_current(socket) {
            return Vec::new();
        }

        tracing::warn!(socket, error = message, "transport error");
        vec![ConnectionAction::TransportError(message.to_string())]
    }

    /// `socket` closed with `code`, whether or not it ever opened.
    pub fn handle_close(&mut self, socket: SocketId, code: u16, now: I) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();
        if !self.is_current(socket) {
            return actions;
        }

        self.socket = None;
        self.socket_open = false;

        if code == self.config.replaced_close_code {
            tracing::info!(code, "session replaced by another client");
            self.set_state(ConnectionState::Disconnected, &mut actions);
            actions.push(ConnectionAction::SessionReplaced);
            return actions;
        }

        if self.intentional_close {
            self.set_state(ConnectionState::Disconnected, &mut actions);
            return actions;
        }

        self.schedule_reconnect(now, &mut actions);
        actions
    }

    /// Fire the pending retry if its delay has elapsed.
    pub fn tick(&mut self, now: I) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();

        let Some((scheduled_at, delay)) = self.pending_reconnect else {
            return actions;
        };
        if now - scheduled_at < delay {
            return actions;
        }

        self.pending_reconnect = None;
        self.reconnect_attempt += 1;

        let Some(token) = self.reconnect_token.clone().or_else(|| self.initial_token.clone())
        else {
            tracing::info!("no token available, giving up");
            self.set_state(ConnectionState::Disconnected, &mut actions);
            return actions;
        };

        tracing::info!(attempt = self.reconnect_attempt, "reconnecting");
        self.open_socket(&token, &mut actions);
        actions
    }

    fn schedule_reconnect(&mut self, now: I, actions: &mut Vec<ConnectionAction>) {
        if self.reconnect_attempt >= self.config.max_attempts() {
            tracing::info!(attempts = self.reconnect_attempt, "reconnect attempts exhausted");
            self.set_state(ConnectionState::Disconnected, actions);
            return;
        }

        let delay = self.config.delay_for(self.reconnect_attempt);
        tracing::info!(attempt = self.reconnect_attempt, ?delay, "scheduling reconnect");

        self.pending_reconnect = Some((now, delay));
        self.set_state(ConnectionState::Reconnecting, actions);
    }

    fn open_socket(&mut self, token: &str, actions: &mut Vec<ConnectionAction>) {
        let Some(mut url) = self.endpoint.clone() else {
            return;
        };
        url.query_pairs_mut().append_pair("token", token);

        let socket = self.next_socket_id;
        self.next_socket_id += 1;
        self.socket = Some(socket);
        self.socket_open = false;

        let state = if self.reconnect_attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting
        };
        self.set_state(state, actions);
        actions.push(ConnectionAction::OpenSocket { socket, url: url.into() });
    }

    fn set_state(&mut self, state: ConnectionState, actions: &mut Vec<ConnectionAction>) {
        if self.state != state {
            tracing::debug!(from = %self.state, to = %state, "connection state changed");
            self.state = state;
            actions.push(ConnectionAction::StateChanged(state));
        }
    }

    fn is_current(&self, socket: SocketId) -> bool {
        self.socket == Some(socket)
    }
}

impl<I> Default for ConnectionManager<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConnectionError> {
    let invalid = |reason: String| ConnectionError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

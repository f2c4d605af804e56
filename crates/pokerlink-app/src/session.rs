//! Session orchestration.
//!
//! The [`Session`] wraps a [`ConnectionManager`] and the current
//! [`GameState`], and adapts both to the player's point of view.
//!
//! # Responsibilities
//!
//! - Converts player intents into client messages and connection calls.
//! - Feeds delivered frames and connection state changes through
//!   [`crate::reduce`], one dispatch per event.
//! - Passes the reconnect token from `CONNECTED` back to the connection
//!   manager.
//! - Accumulates [`TransportCommand`]s for the driver to execute in the next
//!   I/O cycle.

use std::{ops::Sub, sync::Arc, time::Duration};

use pokerlink_core::{
    ConnectionAction, ConnectionConfig, ConnectionError, ConnectionManager, SocketId,
};
use pokerlink_proto::{
    ClientMessage, PlayerId, ServerMessageType,
    payloads::client::{AdminKickData, ChatData, DecisionData, PlayerActionData, PokerAction},
};

use crate::{GameEvent, GameState, Intent, TransportCommand, reduce};

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Author label on optimistic chat entries.
    pub chat_author: String,
    /// Reconnect policy and close codes.
    pub connection: ConnectionConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { chat_author: "You".to_string(), connection: ConnectionConfig::default() }
    }
}

/// One game session: connection plus view model.
///
/// Generic over the instant type so the same code runs against real and
/// virtual time.
pub struct Session<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    config: SessionConfig,
    conn: ConnectionManager<I>,
    state: Arc<GameState>,
    outgoing: Vec<TransportCommand>,
}

impl<I> Session<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a disconnected session with an empty view model.
    pub fn new(config: SessionConfig) -> Self {
        let conn = ConnectionManager::new(config.connection.clone());
        Self { config, conn, state: Arc::new(GameState::default()), outgoing: Vec::new() }
    }

    /// Current view model.
    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    /// Connection manager, read-only.
    pub fn connection(&self) -> &ConnectionManager<I> {
        &self.conn
    }

    /// Take pending transport commands.
    pub fn take_outgoing(&mut self) -> Vec<TransportCommand> {
        std::mem::take(&mut self.outgoing)
    }

    /// Time left before the pending reconnect fires.
    pub fn reconnect_due_in(&self, now: I) -> Option<Duration> {
        self.conn.reconnect_due_in(now)
    }

    /// Connect to `endpoint` with a freshly issued `token`.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidEndpoint` if `endpoint` is not a socket URL
    pub fn connect(&mut self, endpoint: &str, token: &str) -> Result<(), ConnectionError> {
        let actions = self.conn.connect(endpoint, token)?;
        self.process_connection_actions(actions);
        Ok(())
    }

    /// Close the socket. No reconnect follows.
    pub fn disconnect(&mut self) {
        let actions = self.conn.disconnect();
        self.process_connection_actions(actions);
    }

    /// Disconnect and return the view model to its initial state.
    pub fn reset(&mut self) {
        self.disconnect();
        self.apply(GameEvent::Reset);
    }

    /// Apply one intent.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidEndpoint` for a bad `Connect` endpoint
    /// - `ConnectionError::Encode` if an outbound message cannot be encoded
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), ConnectionError> {
        match intent {
            Intent::Connect { endpoint, token } => self.connect(&endpoint, &token),
            Intent::Disconnect | Intent::Quit => {
                self.disconnect();
                Ok(())
            },
            Intent::Action { action, amount } => self.send_action(action, amount),
            Intent::Chat { message, table_chat } => self.send_chat(message, table_chat),
            Intent::RebuyDecision(accept) => self.send_rebuy_decision(accept),
            Intent::AddonDecision(accept) => self.send_addon_decision(accept),
            Intent::SitOut => self.sit_out(),
            Intent::ComeBack => self.come_back(),
            Intent::AdminKick(player_id) => self.send_admin_kick(player_id),
            Intent::AdminPause => self.send_admin_pause(),
            Intent::AdminResume => self.send_admin_resume(),
        }
    }

    /// Act on this player's turn.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_action(&mut self, action: PokerAction, amount: i64) -> Result<(), ConnectionError> {
        self.send(ClientMessage::PlayerAction(PlayerActionData { action, amount }))
    }

    /// Send a chat line, showing it locally before the server echoes it.
    ///
    /// The local entry is added even when the socket is not open.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_chat(&mut self, message: String, table_chat: bool) -> Result<(), ConnectionError> {
        self.apply(GameEvent::ChatOptimistic {
            player_name: self.config.chat_author.clone(),
            message: message.clone(),
            table_chat,
        });
        self.send(ClientMessage::Chat(ChatData { message, table_chat }))
    }

    /// Answer the rebuy offer and drop pending offers locally.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_rebuy_decision(&mut self, accept: bool) -> Result<(), ConnectionError> {
        self.send(ClientMessage::RebuyDecision(DecisionData { accept }))?;
        self.apply(GameEvent::ClearOffers);
        Ok(())
    }

    /// Answer the add-on offer and drop pending offers locally.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_addon_decision(&mut self, accept: bool) -> Result<(), ConnectionError> {
        self.send(ClientMessage::AddonDecision(DecisionData { accept }))?;
        self.apply(GameEvent::ClearOffers);
        Ok(())
    }

    /// Sit out upcoming hands.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn sit_out(&mut self) -> Result<(), ConnectionError> {
        self.send(ClientMessage::SitOut)
    }

    /// Return from sitting out.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn come_back(&mut self) -> Result<(), ConnectionError> {
        self.send(ClientMessage::ComeBack)
    }

    /// Remove a player (owner only).
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_admin_kick(&mut self, player_id: PlayerId) -> Result<(), ConnectionError> {
        self.send(ClientMessage::AdminKick(AdminKickData { player_id }))
    }

    /// Pause the game (owner only).
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_admin_pause(&mut self) -> Result<(), ConnectionError> {
        self.send(ClientMessage::AdminPause)
    }

    /// Resume the game (owner only).
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Encode` if the message cannot be encoded
    pub fn send_admin_resume(&mut self) -> Result<(), ConnectionError> {
        self.send(ClientMessage::AdminResume)
    }

    /// The driver finished opening `socket`.
    pub fn handle_open(&mut self, socket: SocketId) {
        let actions = self.conn.handle_open(socket);
        self.process_connection_actions(actions);
    }

    /// A text frame arrived on `socket`.
    pub fn handle_text(&mut self, socket: SocketId, text: &str) {
        let actions = self.conn.handle_text(socket, text);
        self.process_connection_actions(actions);
    }

    /// The transport reported an error on `socket`.
    pub fn handle_error(&mut self, socket: SocketId, message: &str) {
        let actions = self.conn.handle_error(socket, message);
        self.process_connection_actions(actions);
    }

    /// `socket` closed with `code`.
    pub fn handle_close(&mut self, socket: SocketId, code: u16, now: I) {
        let actions = self.conn.handle_close(socket, code, now);
        self.process_connection_actions(actions);
    }

    /// Fire the pending reconnect if it is due.
    pub fn tick(&mut self, now: I) {
        let actions = self.conn.tick(now);
        self.process_connection_actions(actions);
    }

    fn send(&mut self, message: ClientMessage) -> Result<(), ConnectionError> {
        let actions = self.conn.send(message)?;
        self.process_connection_actions(actions);
        Ok(())
    }

    fn apply(&mut self, event: GameEvent) {
        self.state = reduce(&self.state, event);
    }

    fn process_connection_actions(&mut self, actions: Vec<ConnectionAction>) {
        for action in actions {
            match action {
                ConnectionAction::OpenSocket { socket, url } => {
                    self.outgoing.push(TransportCommand::Open { socket, url });
                },
                ConnectionAction::SendText { socket, text } => {
                    self.outgoing.push(TransportCommand::Send { socket, text });
                },
                ConnectionAction::CloseSocket { socket, code, reason } => {
                    self.outgoing.push(TransportCommand::Close { socket, code, reason });
                },
                ConnectionAction::StateChanged(state) => {
                    tracing::debug!(%state, "connection state");
                    self.apply(GameEvent::ConnectionStateChanged(state));
                },
                ConnectionAction::Deliver(frame) => {
                    let is_connected = frame.tag() == Some(ServerMessageType::Connected.as_str());
                    self.apply(GameEvent::Server(frame));

                    if is_connected && let Some(token) = &self.state.reconnect_token {
                        self.conn.set_reconnect_token(token.clone());
                    }
                },
                // Already logged by the connection manager; the close that
                // follows drives recovery.
                ConnectionAction::TransportError(_) => {},
                ConnectionAction::SessionReplaced => self.apply(GameEvent::SessionReplaced),
            }
        }
    }
}

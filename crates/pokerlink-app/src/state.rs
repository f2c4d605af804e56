//! Observable session state.
//!
//! [`GameState`] is the view model a UI renders from. It is immutable once
//! published: the reducer produces a new value for every change and the
//! runtime shares it as `Arc<GameState>`.

use pokerlink_core::ConnectionState;
use pokerlink_proto::{
    PlayerId,
    payloads::{
        lobby::LobbyStateData,
        table::{ActionOptionsData, GameStateData, OfferData, StandingData, TableData},
    },
};

/// Maximum chat entries kept; the oldest are dropped first.
pub const MAX_CHAT_MESSAGES: usize = 200;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    /// Waiting in the lobby.
    #[default]
    Lobby,
    /// Hands are being played.
    Playing,
    /// Tournament over; standings available.
    Complete,
}

/// Countdown for whoever is on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTimer {
    /// Player on the clock.
    pub player_id: PlayerId,
    /// Seconds left.
    pub seconds_remaining: u32,
}

/// One line in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Local id, unique within a session.
    pub id: u64,
    /// Author.
    pub player_id: PlayerId,
    /// Author display name.
    pub player_name: String,
    /// Text.
    pub message: String,
    /// Table-only chat.
    pub table_chat: bool,
    /// Sent by this client and not yet echoed by the server.
    pub optimistic: bool,
}

/// The client's view of one game session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameState {
    /// Socket state.
    pub connection_state: ConnectionState,
    /// Current phase.
    pub game_phase: GamePhase,
    /// Game id from `CONNECTED`.
    pub game_id: Option<String>,
    /// This client's player id from `CONNECTED`.
    pub my_player_id: Option<PlayerId>,
    /// Token for reconnects, held in memory only.
    pub reconnect_token: Option<String>,
    /// Lobby view while in [`GamePhase::Lobby`].
    pub lobby_state: Option<LobbyStateData>,
    /// Last full game snapshot.
    pub game_state: Option<GameStateData>,
    /// The table this player sits at.
    pub current_table: Option<TableData>,
    /// This player's hole cards.
    pub hole_cards: Vec<String>,
    /// Legal actions; `Some` only while it is this player's turn.
    pub action_required: Option<ActionOptionsData>,
    /// Seconds allowed for the pending action.
    pub action_timeout_seconds: Option<u32>,
    /// Countdown for the current actor.
    pub action_timer: Option<ActionTimer>,
    /// Chat log, at most [`MAX_CHAT_MESSAGES`] long.
    pub chat_messages: Vec<ChatEntry>,
    /// Final standings.
    pub standings: Vec<StandingData>,
    /// Pending rebuy offer for this player.
    pub rebuy_offer: Option<OfferData>,
    /// Pending add-on offer for this player.
    pub addon_offer: Option<OfferData>,
    /// Finishing place once this player is out.
    pub eliminated_position: Option<u32>,
    /// Last error to show.
    pub error: Option<String>,
}

impl GameState {
    /// True while this player must act.
    pub fn is_my_turn(&self) -> bool {
        self.action_required.is_some()
    }
}

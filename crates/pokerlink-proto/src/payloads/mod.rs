//! Typed message payloads.
//!
//! The `type` field of a frame selects the payload shape, so payloads are
//! serialized as bare objects under `data` with no variant tag of their own.
//!
//! # Invariants
//!
//! Each [`ServerMessage`] variant maps to exactly one [`ServerMessageType`]
//! and each [`ClientMessage`] variant to exactly one [`ClientMessageType`].
//! Every method matches exhaustively, so adding a tag fails to compile until
//! it is handled everywhere.

pub mod client;
pub mod lobby;
pub mod session;
pub mod table;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    ClientMessageType, ServerMessageType,
    errors::{ProtocolError, Result},
};

/// Server-to-client message: one variant per [`ServerMessageType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    // Connection lifecycle
    /// Handshake acknowledgement
    Connected(session::ConnectedData),
    /// Application error
    Error(session::ErrorData),

    // Lobby lifecycle
    /// Lobby snapshot
    LobbyState(lobby::LobbyStateData),
    /// Lobby roster addition
    LobbyPlayerJoined(lobby::LobbyPlayerEventData),
    /// Lobby roster removal
    LobbyPlayerLeft(lobby::LobbyPlayerEventData),
    /// Lobby settings edit
    LobbySettingsChanged(lobby::LobbySettingsChangedData),
    /// Game start countdown
    LobbyGameStarting(lobby::LobbyGameStartingData),
    /// Lobby roster removal by the owner
    LobbyPlayerKicked(lobby::LobbyPlayerEventData),
    /// Game cancelled before start
    GameCancelled(lobby::GameCancelledData),

    // Hand and action lifecycle
    /// Game snapshot
    GameState(table::GameStateData),
    /// New hand
    HandStarted(table::HandStartedData),
    /// Private cards
    HoleCardsDealt(table::HoleCardsDealtData),
    /// Board cards
    CommunityCardsDealt(table::CommunityCardsDealtData),
    /// This player's turn
    ActionRequired(table::ActionRequiredData),
    /// Someone acted
    PlayerActed(table::PlayerActedData),
    /// Actor timed out
    ActionTimeout(table::ActionTimeoutData),
    /// Hand finished
    HandComplete(table::HandCompleteData),
    /// Blind level advanced
    LevelChanged(table::LevelChangedData),
    /// Player busted
    PlayerEliminated(table::PlayerEliminatedData),
    /// Rebuy available
    RebuyOffered(table::OfferData),
    /// Add-on available
    AddonOffered(table::OfferData),
    /// Tournament finished
    GameComplete(table::GameCompleteData),
    /// Player seated
    PlayerJoined(table::PlayerJoinedData),
    /// Player left the table
    PlayerLeft(table::PlayerRefData),
    /// Player connection dropped
    PlayerDisconnected(table::PlayerRefData),
    /// Pot paid out
    PotAwarded(table::PotAwardedData),
    /// Showdown began
    ShowdownStarted(table::ShowdownStartedData),
    /// Rebuy purchased
    PlayerRebuy(table::ChipPurchaseData),
    /// Add-on purchased
    PlayerAddon(table::ChipPurchaseData),

    // Admin
    /// Game paused
    GamePaused(table::GamePausedData),
    /// Game resumed
    GameResumed(table::GameResumedData),
    /// Player removed from the game
    PlayerKicked(table::PlayerKickedData),

    // Chat and timers
    /// Chat line
    ChatMessage(session::ChatMessageData),
    /// Actor countdown
    TimerUpdate(table::TimerUpdateData),
}

impl ServerMessage {
    /// Tag corresponding to this payload.
    #[must_use]
    pub const fn kind(&self) -> ServerMessageType {
        match self {
            Self::Connected(_) => ServerMessageType::Connected,
            Self::Error(_) => ServerMessageType::Error,
            Self::LobbyState(_) => ServerMessageType::LobbyState,
            Self::LobbyPlayerJoined(_) => ServerMessageType::LobbyPlayerJoined,
            Self::LobbyPlayerLeft(_) => ServerMessageType::LobbyPlayerLeft,
            Self::LobbySettingsChanged(_) => ServerMessageType::LobbySettingsChanged,
            Self::LobbyGameStarting(_) => ServerMessageType::LobbyGameStarting,
            Self::LobbyPlayerKicked(_) => ServerMessageType::LobbyPlayerKicked,
            Self::GameCancelled(_) => ServerMessageType::GameCancelled,
            Self::GameState(_) => ServerMessageType::GameState,
            Self::HandStarted(_) => ServerMessageType::HandStarted,
            Self::HoleCardsDealt(_) => ServerMessageType::HoleCardsDealt,
            Self::CommunityCardsDealt(_) => ServerMessageType::CommunityCardsDealt,
            Self::ActionRequired(_) => ServerMessageType::ActionRequired,
            Self::PlayerActed(_) => ServerMessageType::PlayerActed,
            Self::ActionTimeout(_) => ServerMessageType::ActionTimeout,
            Self::HandComplete(_) => ServerMessageType::HandComplete,
            Self::LevelChanged(_) => ServerMessageType::LevelChanged,
            Self::PlayerEliminated(_) => ServerMessageType::PlayerEliminated,
            Self::RebuyOffered(_) => ServerMessageType::RebuyOffered,
            Self::AddonOffered(_) => ServerMessageType::AddonOffered,
            Self::GameComplete(_) => ServerMessageType::GameComplete,
            Self::PlayerJoined(_) => ServerMessageType::PlayerJoined,
            Self::PlayerLeft(_) => ServerMessageType::PlayerLeft,
            Self::PlayerDisconnected(_) => ServerMessageType::PlayerDisconnected,
            Self::PotAwarded(_) => ServerMessageType::PotAwarded,
            Self::ShowdownStarted(_) => ServerMessageType::ShowdownStarted,
            Self::PlayerRebuy(_) => ServerMessageType::PlayerRebuy,
            Self::PlayerAddon(_) => ServerMessageType::PlayerAddon,
            Self::GamePaused(_) => ServerMessageType::GamePaused,
            Self::GameResumed(_) => ServerMessageType::GameResumed,
            Self::PlayerKicked(_) => ServerMessageType::PlayerKicked,
            Self::ChatMessage(_) => ServerMessageType::ChatMessage,
            Self::TimerUpdate(_) => ServerMessageType::TimerUpdate,
        }
    }

    /// Decode the `data` field of a frame whose tag is `kind`.
    ///
    /// A `null` payload is read as an empty object, so tags whose fields all
    /// have defaults decode from a missing `data`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidPayload` if `data` does not fit the tag's shape
    pub fn decode(kind: ServerMessageType, data: Value) -> Result<Self> {
        let data = if data.is_null() { Value::Object(Map::new()) } else { data };

        let message = match kind {
            ServerMessageType::Connected => Self::Connected(from_data(kind.as_str(), data)?),
            ServerMessageType::Error => Self::Error(from_data(kind.as_str(), data)?),
            ServerMessageType::LobbyState => Self::LobbyState(from_data(kind.as_str(), data)?),
            ServerMessageType::LobbyPlayerJoined => {
                Self::LobbyPlayerJoined(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::LobbyPlayerLeft => {
                Self::LobbyPlayerLeft(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::LobbySettingsChanged => {
                Self::LobbySettingsChanged(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::LobbyGameStarting => {
                Self::LobbyGameStarting(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::LobbyPlayerKicked => {
                Self::LobbyPlayerKicked(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::GameCancelled => {
                Self::GameCancelled(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::GameState => Self::GameState(from_data(kind.as_str(), data)?),
            ServerMessageType::HandStarted => Self::HandStarted(from_data(kind.as_str(), data)?),
            ServerMessageType::HoleCardsDealt => {
                Self::HoleCardsDealt(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::CommunityCardsDealt => {
                Self::CommunityCardsDealt(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::ActionRequired => {
                Self::ActionRequired(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::PlayerActed => Self::PlayerActed(from_data(kind.as_str(), data)?),
            ServerMessageType::ActionTimeout => {
                Self::ActionTimeout(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::HandComplete => {
                Self::HandComplete(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::LevelChanged => {
                Self::LevelChanged(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::PlayerEliminated => {
                Self::PlayerEliminated(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::RebuyOffered => {
                Self::RebuyOffered(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::AddonOffered => {
                Self::AddonOffered(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::GameComplete => {
                Self::GameComplete(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::PlayerJoined => {
                Self::PlayerJoined(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::PlayerLeft => Self::PlayerLeft(from_data(kind.as_str(), data)?),
            ServerMessageType::PlayerDisconnected => {
                Self::PlayerDisconnected(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::PotAwarded => Self::PotAwarded(from_data(kind.as_str(), data)?),
            ServerMessageType::ShowdownStarted => {
                Self::ShowdownStarted(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::PlayerRebuy => Self::PlayerRebuy(from_data(kind.as_str(), data)?),
            ServerMessageType::PlayerAddon => Self::PlayerAddon(from_data(kind.as_str(), data)?),
            ServerMessageType::GamePaused => Self::GamePaused(from_data(kind.as_str(), data)?),
            ServerMessageType::GameResumed => Self::GameResumed(from_data(kind.as_str(), data)?),
            ServerMessageType::PlayerKicked => {
                Self::PlayerKicked(from_data(kind.as_str(), data)?)
            },
            ServerMessageType::ChatMessage => Self::ChatMessage(from_data(kind.as_str(), data)?),
            ServerMessageType::TimerUpdate => Self::TimerUpdate(from_data(kind.as_str(), data)?),
        };

        Ok(message)
    }

    /// Serialize the payload to the JSON value placed under `data`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn to_data(&self) -> Result<Value> {
        match self {
            Self::Connected(inner) => to_data(inner),
            Self::Error(inner) => to_data(inner),
            Self::LobbyState(inner) => to_data(inner),
            Self::LobbyPlayerJoined(inner)
            | Self::LobbyPlayerLeft(inner)
            | Self::LobbyPlayerKicked(inner) => to_data(inner),
            Self::LobbySettingsChanged(inner) => to_data(inner),
            Self::LobbyGameStarting(inner) => to_data(inner),
            Self::GameCancelled(inner) => to_data(inner),
            Self::GameState(inner) => to_data(inner),
            Self::HandStarted(inner) => to_data(inner),
            Self::HoleCardsDealt(inner) => to_data(inner),
            Self::CommunityCardsDealt(inner) => to_data(inner),
            Self::ActionRequired(inner) => to_data(inner),
            Self::PlayerActed(inner) => to_data(inner),
            Self::ActionTimeout(inner) => to_data(inner),
            Self::HandComplete(inner) => to_data(inner),
            Self::LevelChanged(inner) => to_data(inner),
            Self::PlayerEliminated(inner) => to_data(inner),
            Self::RebuyOffered(inner) | Self::AddonOffered(inner) => to_data(inner),
            Self::GameComplete(inner) => to_data(inner),
            Self::PlayerJoined(inner) => to_data(inner),
            Self::PlayerLeft(inner) | Self::PlayerDisconnected(inner) => to_data(inner),
            Self::PotAwarded(inner) => to_data(inner),
            Self::ShowdownStarted(inner) => to_data(inner),
            Self::PlayerRebuy(inner) | Self::PlayerAddon(inner) => to_data(inner),
            Self::GamePaused(inner) => to_data(inner),
            Self::GameResumed(inner) => to_data(inner),
            Self::PlayerKicked(inner) => to_data(inner),
            Self::ChatMessage(inner) => to_data(inner),
            Self::TimerUpdate(inner) => to_data(inner),
        }
    }
}

/// Client-to-server message: one variant per [`ClientMessageType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Poker action
    PlayerAction(client::PlayerActionData),
    /// Answer to a rebuy offer
    RebuyDecision(client::DecisionData),
    /// Answer to an add-on offer
    AddonDecision(client::DecisionData),
    /// Chat line
    Chat(client::ChatData),
    /// Sit out upcoming hands
    SitOut,
    /// Return from sitting out
    ComeBack,
    /// Remove a player (owner only)
    AdminKick(client::AdminKickData),
    /// Pause the game (owner only)
    AdminPause,
    /// Resume the game (owner only)
    AdminResume,
}

impl ClientMessage {
    /// Tag corresponding to this payload.
    #[must_use]
    pub const fn kind(&self) -> ClientMessageType {
        match self {
            Self::PlayerAction(_) => ClientMessageType::PlayerAction,
            Self::RebuyDecision(_) => ClientMessageType::RebuyDecision,
            Self::AddonDecision(_) => ClientMessageType::AddonDecision,
            Self::Chat(_) => ClientMessageType::Chat,
            Self::SitOut => ClientMessageType::SitOut,
            Self::ComeBack => ClientMessageType::ComeBack,
            Self::AdminKick(_) => ClientMessageType::AdminKick,
            Self::AdminPause => ClientMessageType::AdminPause,
            Self::AdminResume => ClientMessageType::AdminResume,
        }
    }

    /// Serialize the payload. `None` for tags that carry no data.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn to_data(&self) -> Result<Option<Value>> {
        match self {
            Self::PlayerAction(inner) => to_data(inner).map(Some),
            Self::RebuyDecision(inner) | Self::AddonDecision(inner) => to_data(inner).map(Some),
            Self::Chat(inner) => to_data(inner).map(Some),
            Self::AdminKick(inner) => to_data(inner).map(Some),
            Self::SitOut | Self::ComeBack | Self::AdminPause | Self::AdminResume => Ok(None),
        }
    }

    /// Decode the `data` field of a client frame whose tag is `kind`.
    ///
    /// Used by test servers; the client itself never receives these.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidPayload` if `data` does not fit the tag's shape
    pub fn decode(kind: ClientMessageType, data: Option<Value>) -> Result<Self> {
        let data = data.unwrap_or(Value::Null);

        let message = match kind {
            ClientMessageType::PlayerAction => {
                Self::PlayerAction(from_data(kind.as_str(), data)?)
            },
            ClientMessageType::RebuyDecision => {
                Self::RebuyDecision(from_data(kind.as_str(), data)?)
            },
            ClientMessageType::AddonDecision => {
                Self::AddonDecision(from_data(kind.as_str(), data)?)
            },
            ClientMessageType::Chat => Self::Chat(from_data(kind.as_str(), data)?),
            ClientMessageType::SitOut => Self::SitOut,
            ClientMessageType::ComeBack => Self::ComeBack,
            ClientMessageType::AdminKick => Self::AdminKick(from_data(kind.as_str(), data)?),
            ClientMessageType::AdminPause => Self::AdminPause,
            ClientMessageType::AdminResume => Self::AdminResume,
        };

        Ok(message)
    }
}

fn from_data<T: DeserializeOwned>(kind: &'static str, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| ProtocolError::InvalidPayload { kind, reason: e.to_string() })
}

fn to_data<T: Serialize>(inner: &T) -> Result<Value> {
    serde_json::to_value(inner).map_err(|e| ProtocolError::Encode(e.to_string()))
}

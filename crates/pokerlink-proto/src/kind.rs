//! Message discriminants.
//!
//! The `type` field of every frame names exactly one of these tags. Both sets
//! are closed: [`ServerMessageType::from_tag`] returns `None` for anything
//! else, and callers drop such frames.

use std::fmt;

/// Tags of server-to-client messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerMessageType {
    // Connection lifecycle
    /// Handshake acknowledgement carrying identity and reconnect token.
    Connected,
    /// Application error with code and message.
    Error,

    // Lobby lifecycle
    /// Full lobby snapshot.
    LobbyState,
    /// A player joined the lobby.
    LobbyPlayerJoined,
    /// A player left the lobby.
    LobbyPlayerLeft,
    /// Lobby settings were edited by the owner.
    LobbySettingsChanged,
    /// The game is about to start.
    LobbyGameStarting,
    /// The owner removed a player from the lobby.
    LobbyPlayerKicked,
    /// The game was cancelled before starting.
    GameCancelled,

    // Hand and action lifecycle
    /// Full game snapshot.
    GameState,
    /// A new hand began.
    HandStarted,
    /// This player's private cards.
    HoleCardsDealt,
    /// Board cards for a betting round.
    CommunityCardsDealt,
    /// It is this player's turn.
    ActionRequired,
    /// Some player acted.
    PlayerActed,
    /// The acting player ran out of time.
    ActionTimeout,
    /// The hand finished.
    HandComplete,
    /// Blind level advanced.
    LevelChanged,
    /// A player busted out.
    PlayerEliminated,
    /// A rebuy is available to this player.
    RebuyOffered,
    /// An add-on is available to this player.
    AddonOffered,
    /// Tournament finished.
    GameComplete,
    /// A player took a seat mid-game.
    PlayerJoined,
    /// A player left the table.
    PlayerLeft,
    /// A player's connection dropped.
    PlayerDisconnected,
    /// A pot was paid out.
    PotAwarded,
    /// Showdown began.
    ShowdownStarted,
    /// A player bought a rebuy.
    PlayerRebuy,
    /// A player bought an add-on.
    PlayerAddon,

    // Admin
    /// Owner paused the game.
    GamePaused,
    /// Owner resumed the game.
    GameResumed,
    /// Owner removed a player from the game.
    PlayerKicked,

    // Chat and timers
    /// Chat line from a player.
    ChatMessage,
    /// Countdown for the current actor.
    TimerUpdate,
}

impl ServerMessageType {
    /// Every server tag, in declaration order.
    pub const ALL: [Self; 34] = [
        Self::Connected,
        Self::Error,
        Self::LobbyState,
        Self::LobbyPlayerJoined,
        Self::LobbyPlayerLeft,
        Self::LobbySettingsChanged,
        Self::LobbyGameStarting,
        Self::LobbyPlayerKicked,
        Self::GameCancelled,
        Self::GameState,
        Self::HandStarted,
        Self::HoleCardsDealt,
        Self::CommunityCardsDealt,
        Self::ActionRequired,
        Self::PlayerActed,
        Self::ActionTimeout,
        Self::HandComplete,
        Self::LevelChanged,
        Self::PlayerEliminated,
        Self::RebuyOffered,
        Self::AddonOffered,
        Self::GameComplete,
        Self::PlayerJoined,
        Self::PlayerLeft,
        Self::PlayerDisconnected,
        Self::PotAwarded,
        Self::ShowdownStarted,
        Self::PlayerRebuy,
        Self::PlayerAddon,
        Self::GamePaused,
        Self::GameResumed,
        Self::PlayerKicked,
        Self::ChatMessage,
        Self::TimerUpdate,
    ];

    /// Wire representation of this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "CONNECTED",
            Self::Error => "ERROR",
            Self::LobbyState => "LOBBY_STATE",
            Self::LobbyPlayerJoined => "LOBBY_PLAYER_JOINED",
            Self::LobbyPlayerLeft => "LOBBY_PLAYER_LEFT",
            Self::LobbySettingsChanged => "LOBBY_SETTINGS_CHANGED",
            Self::LobbyGameStarting => "LOBBY_GAME_STARTING",
            Self::LobbyPlayerKicked => "LOBBY_PLAYER_KICKED",
            Self::GameCancelled => "GAME_CANCELLED",
            Self::GameState => "GAME_STATE",
            Self::HandStarted => "HAND_STARTED",
            Self::HoleCardsDealt => "HOLE_CARDS_DEALT",
            Self::CommunityCardsDealt => "COMMUNITY_CARDS_DEALT",
            Self::ActionRequired => "ACTION_REQUIRED",
            Self::PlayerActed => "PLAYER_ACTED",
            Self::ActionTimeout => "ACTION_TIMEOUT",
            Self::HandComplete => "HAND_COMPLETE",
            Self::LevelChanged => "LEVEL_CHANGED",
            Self::PlayerEliminated => "PLAYER_ELIMINATED",
            Self::RebuyOffered => "REBUY_OFFERED",
            Self::AddonOffered => "ADDON_OFFERED",
            Self::GameComplete => "GAME_COMPLETE",
            Self::PlayerJoined => "PLAYER_JOINED",
            Self::PlayerLeft => "PLAYER_LEFT",
            Self::PlayerDisconnected => "PLAYER_DISCONNECTED",
            Self::PotAwarded => "POT_AWARDED",
            Self::ShowdownStarted => "SHOWDOWN_STARTED",
            Self::PlayerRebuy => "PLAYER_REBUY",
            Self::PlayerAddon => "PLAYER_ADDON",
            Self::GamePaused => "GAME_PAUSED",
            Self::GameResumed => "GAME_RESUMED",
            Self::PlayerKicked => "PLAYER_KICKED",
            Self::ChatMessage => "CHAT_MESSAGE",
            Self::TimerUpdate => "TIMER_UPDATE",
        }
    }

    /// Parse a wire tag. `None` if the tag is not part of the protocol.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for ServerMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags of client-to-server messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientMessageType {
    /// Poker action (fold, check, call, bet, raise, all-in).
    PlayerAction,
    /// Answer to a rebuy offer.
    RebuyDecision,
    /// Answer to an add-on offer.
    AddonDecision,
    /// Chat line.
    Chat,
    /// Sit out upcoming hands.
    SitOut,
    /// Return from sitting out.
    ComeBack,
    /// Owner removes a player.
    AdminKick,
    /// Owner pauses the game.
    AdminPause,
    /// Owner resumes the game.
    AdminResume,
}

impl ClientMessageType {
    /// Every client tag, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::PlayerAction,
        Self::RebuyDecision,
        Self::AddonDecision,
        Self::Chat,
        Self::SitOut,
        Self::ComeBack,
        Self::AdminKick,
        Self::AdminPause,
        Self::AdminResume,
    ];

    /// Wire representation of this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlayerAction => "PLAYER_ACTION",
            Self::RebuyDecision => "REBUY_DECISION",
            Self::AddonDecision => "ADDON_DECISION",
            Self::Chat => "CHAT",
            Self::SitOut => "SIT_OUT",
            Self::ComeBack => "COME_BACK",
            Self::AdminKick => "ADMIN_KICK",
            Self::AdminPause => "ADMIN_PAUSE",
            Self::AdminResume => "ADMIN_RESUME",
        }
    }

    /// Parse a wire tag. `None` if the tag is not part of the protocol.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for ClientMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn server_tags_are_unique_and_parse_back() {
        let tags: HashSet<_> = ServerMessageType::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(tags.len(), ServerMessageType::ALL.len());

        for kind in ServerMessageType::ALL {
            assert_eq!(ServerMessageType::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn client_tags_are_unique_and_parse_back() {
        let tags: HashSet<_> = ClientMessageType::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(tags.len(), ClientMessageType::ALL.len());

        for kind in ClientMessageType::ALL {
            assert_eq!(ClientMessageType::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(ServerMessageType::from_tag("connected"), None);
        assert_eq!(ServerMessageType::from_tag(""), None);
        assert_eq!(ClientMessageType::from_tag("chat"), None);
    }
}

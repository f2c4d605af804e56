//! Player intents.
//!
//! An [`Intent`] is what a front end asks the session to do. The runtime
//! receives them over a channel and hands each to [`crate::Session::dispatch`].

use pokerlink_proto::{PlayerId, payloads::client::PokerAction};

/// Requests from the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Connect to a game socket.
    Connect {
        /// Socket URL without the token.
        endpoint: String,
        /// Short-lived token from the token endpoint.
        token: String,
    },

    /// Close the socket without reconnecting.
    Disconnect,

    /// Act on this player's turn.
    Action {
        /// Action to take.
        action: PokerAction,
        /// Chips for bets and raises; zero otherwise.
        amount: i64,
    },

    /// Send a chat line.
    Chat {
        /// Text.
        message: String,
        /// Table-only chat.
        table_chat: bool,
    },

    /// Accept or decline a rebuy offer.
    RebuyDecision(bool),

    /// Accept or decline an add-on offer.
    AddonDecision(bool),

    /// Sit out upcoming hands.
    SitOut,

    /// Return from sitting out.
    ComeBack,

    /// Remove a player (owner only).
    AdminKick(PlayerId),

    /// Pause the game (owner only).
    AdminPause,

    /// Resume the game (owner only).
    AdminResume,

    /// Disconnect and stop the runtime.
    Quit,
}

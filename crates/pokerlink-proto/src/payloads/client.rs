//! Client-to-server payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Poker action a player can take on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PokerAction {
    /// Give up the hand.
    Fold,
    /// Pass without betting.
    Check,
    /// Match the current bet.
    Call,
    /// Open the betting.
    Bet,
    /// Increase the current bet.
    Raise,
    /// Commit all chips.
    AllIn,
}

impl PokerAction {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fold => "FOLD",
            Self::Check => "CHECK",
            Self::Call => "CALL",
            Self::Bet => "BET",
            Self::Raise => "RAISE",
            Self::AllIn => "ALL_IN",
        }
    }
}

impl fmt::Display for PokerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `PLAYER_ACTION` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerActionData {
    /// Action taken.
    pub action: PokerAction,
    /// Chips for bet/raise; zero otherwise.
    pub amount: i64,
}

/// `REBUY_DECISION` / `ADDON_DECISION` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionData {
    /// Accept the offer.
    pub accept: bool,
}

/// `CHAT` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatData {
    /// Text.
    pub message: String,
    /// Table-only chat.
    pub table_chat: bool,
}

/// `ADMIN_KICK` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminKickData {
    /// Player to remove.
    pub player_id: PlayerId,
}

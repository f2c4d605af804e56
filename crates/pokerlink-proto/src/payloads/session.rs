//! Session-level payloads: handshake, errors, chat.

use serde::{Deserialize, Serialize};

use super::table::GameStateData;
use crate::PlayerId;

/// `CONNECTED` payload.
///
/// `game_state` is present when the player reconnects into a running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedData {
    /// This client's player id.
    pub player_id: PlayerId,
    /// Snapshot of a running game.
    #[serde(default)]
    pub game_state: Option<GameStateData>,
    /// Token to present on reconnect.
    #[serde(default)]
    pub reconnect_token: Option<String>,
}

/// `ERROR` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorData {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// `CHAT_MESSAGE` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageData {
    /// Author.
    #[serde(default)]
    pub player_id: PlayerId,
    /// Author display name.
    #[serde(default)]
    pub player_name: String,
    /// Text.
    pub message: String,
    /// Table-only chat rather than game-wide.
    #[serde(default)]
    pub table_chat: bool,
}

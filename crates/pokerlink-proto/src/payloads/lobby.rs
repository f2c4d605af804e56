//! Pre-game lobby payloads.

use serde::{Deserialize, Serialize};

use super::table::{BlindsData, GameStatus};

/// A lobby member, keyed by account profile id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayerData {
    /// Account profile id. Roster operations match on this.
    pub profile_id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Owns the game.
    #[serde(default)]
    pub is_owner: bool,
    /// Computer-controlled seat.
    #[serde(default, rename = "isAI")]
    pub is_ai: bool,
    /// Skill label for computer seats.
    #[serde(default)]
    pub ai_skill_level: Option<String>,
}

/// `LOBBY_STATE` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LobbyStateData {
    /// Game id.
    pub game_id: String,
    /// Game name.
    pub name: String,
    /// `SERVER` or `COMMUNITY`.
    pub hosting_type: String,
    /// Owner display name.
    pub owner_name: String,
    /// Owner profile id.
    pub owner_profile_id: i64,
    /// Seat cap.
    pub max_players: u32,
    /// Password protected.
    pub is_private: bool,
    /// Roster.
    pub players: Vec<LobbyPlayerData>,
    /// Starting blinds.
    pub blinds: BlindsData,
}

/// Payload shared by `LOBBY_PLAYER_JOINED`, `LOBBY_PLAYER_LEFT` and
/// `LOBBY_PLAYER_KICKED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayerEventData {
    /// Player concerned.
    pub player: LobbyPlayerData,
}

/// Game summary as returned by listings and lobby settings updates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSummaryData {
    /// Game id.
    pub game_id: String,
    /// Game name.
    pub name: String,
    /// Status.
    pub status: GameStatus,
    /// `SERVER` or `COMMUNITY`.
    pub hosting_type: String,
    /// Owner display name.
    pub owner_name: String,
    /// Owner profile id.
    pub owner_profile_id: i64,
    /// Players joined.
    pub player_count: u32,
    /// Seat cap.
    pub max_players: u32,
    /// Password protected.
    pub is_private: bool,
    /// Buy-in.
    pub buy_in: i64,
    /// Starting stack.
    pub starting_chips: i64,
    /// Starting blinds.
    pub blinds: BlindsData,
    /// Socket URL, when the server advertises one.
    pub ws_url: Option<String>,
}

/// `LOBBY_SETTINGS_CHANGED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LobbySettingsChangedData {
    /// New settings.
    pub updated_settings: GameSummaryData,
}

/// `LOBBY_GAME_STARTING` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LobbyGameStartingData {
    /// Countdown.
    pub starting_in_seconds: u32,
}

/// `GAME_CANCELLED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameCancelledData {
    /// Why.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lobby_player_reads_ai_flag() {
        let player: LobbyPlayerData = serde_json::from_value(json!({
            "profileId": 5,
            "name": "Bot",
            "isAI": true,
            "aiSkillLevel": "HARD",
        }))
        .unwrap();

        assert!(player.is_ai);
        assert_eq!(player.ai_skill_level.as_deref(), Some("HARD"));
        assert!(!player.is_owner);
    }

    #[test]
    fn lobby_player_requires_profile_id() {
        let result = serde_json::from_value::<LobbyPlayerData>(json!({ "name": "Nobody" }));
        assert!(result.is_err());
    }
}

//! Table and hand payload types.
//!
//! Snapshots of tables, seats and pots, plus the per-hand event payloads
//! (hand start, cards, actions, showdown, eliminations, offers).
//!
//! Most structs are tolerant: absent fields fall back to their defaults so a
//! server that omits a field does not make the whole frame undecodable. Fields
//! that identify the subject of an event (which player acted, who was
//! eliminated) are required.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Seat status as reported by the server.
///
/// Unknown status strings are preserved in [`SeatStatus::Other`] rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeatStatus {
    /// Still in the hand.
    #[default]
    Active,
    /// Folded this hand.
    Folded,
    /// All chips committed.
    AllIn,
    /// Connection dropped.
    Disconnected,
    /// Any status this client does not know about.
    Other(String),
}

impl SeatStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Folded => "FOLDED",
            Self::AllIn => "ALL_IN",
            Self::Disconnected => "DISCONNECTED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for SeatStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACTIVE" => Self::Active,
            "FOLDED" => Self::Folded,
            "ALL_IN" => Self::AllIn,
            "DISCONNECTED" => Self::Disconnected,
            _ => Self::Other(s),
        }
    }
}

impl From<SeatStatus> for String {
    fn from(status: SeatStatus) -> Self {
        match status {
            SeatStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// Overall game status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameStatus {
    /// Lobby is open.
    WaitingForPlayers,
    /// Hands are being dealt.
    #[default]
    InProgress,
    /// Owner paused the game.
    Paused,
    /// Tournament finished.
    Completed,
    /// Game cancelled.
    Cancelled,
    /// Any status this client does not know about.
    Other(String),
}

impl GameStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            Self::InProgress => "IN_PROGRESS",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for GameStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WAITING_FOR_PLAYERS" => Self::WaitingForPlayers,
            "IN_PROGRESS" => Self::InProgress,
            "PAUSED" => Self::Paused,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(s),
        }
    }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// Current blind amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlindsData {
    /// Small blind.
    pub small: i64,
    /// Big blind.
    pub big: i64,
    /// Ante.
    pub ante: i64,
}

/// One seat at a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatData {
    /// Seat position at the table.
    pub seat_index: i32,
    /// Occupant.
    pub player_id: PlayerId,
    /// Occupant's display name.
    pub player_name: String,
    /// Chips behind.
    pub chip_count: i64,
    /// Hand status.
    pub status: SeatStatus,
    /// Dealer button.
    pub is_dealer: bool,
    /// Posted the small blind.
    pub is_small_blind: bool,
    /// Posted the big blind.
    pub is_big_blind: bool,
    /// Chips committed this round.
    pub current_bet: i64,
    /// Card codes like `"Ah"`; empty when face down.
    pub hole_cards: Vec<String>,
    /// Seat is on the clock.
    pub is_current_actor: bool,
}

/// A pot and the players eligible to win it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PotData {
    /// Chips in the pot.
    pub amount: i64,
    /// Players who can win it.
    pub eligible_players: Vec<PlayerId>,
}

/// Snapshot of one table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableData {
    /// Table identifier within the game.
    pub table_id: i64,
    /// Occupied seats.
    pub seats: Vec<SeatData>,
    /// Board cards.
    pub community_cards: Vec<String>,
    /// Main pot and side pots.
    pub pots: Vec<PotData>,
    /// Betting round name (`PREFLOP`, `FLOP`, ...).
    pub current_round: String,
    /// Hand counter.
    pub hand_number: u32,
}

/// Tournament-wide entry for one player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerSummaryData {
    /// Player.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Chips.
    pub chip_count: i64,
    /// Table the player sits at.
    pub table_id: i64,
    /// Seat at that table.
    pub seat_index: i32,
    /// Set once the player is out.
    pub finish_position: Option<u32>,
}

/// Full game snapshot (`GAME_STATE`, or embedded in `CONNECTED` on reconnect).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStateData {
    /// Game status.
    pub status: GameStatus,
    /// Blind level.
    pub level: u32,
    /// Blinds for the level.
    pub blinds: BlindsData,
    /// Seconds until the next level, if timed.
    pub next_level_in: Option<u32>,
    /// All tables.
    pub tables: Vec<TableData>,
    /// All players.
    pub players: Vec<PlayerSummaryData>,
}

impl GameStateData {
    /// Table this player sits at.
    ///
    /// Falls back to the first table when the player has no summary entry or
    /// its table id is unknown, so a UI always has something to render.
    /// `None` only when there are no tables at all.
    pub fn table_for(&self, player_id: PlayerId) -> Option<&TableData> {
        self.players
            .iter()
            .find(|p| p.player_id == player_id)
            .and_then(|summary| self.tables.iter().find(|t| t.table_id == summary.table_id))
            .or_else(|| self.tables.first())
    }
}

/// Blind posted at the start of a hand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlindPostedData {
    /// Player who posted.
    pub player_id: PlayerId,
    /// Amount posted.
    pub amount: i64,
    /// Blind kind (`SMALL`, `BIG`, `ANTE`).
    #[serde(rename = "type")]
    pub kind: String,
}

/// `HAND_STARTED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandStartedData {
    /// Hand counter.
    pub hand_number: u32,
    /// Dealer seat index.
    pub dealer_seat: i32,
    /// Small blind seat index.
    pub small_blind_seat: i32,
    /// Big blind seat index.
    pub big_blind_seat: i32,
    /// Forced bets.
    pub blinds_posted: Vec<BlindPostedData>,
}

/// `HOLE_CARDS_DEALT` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleCardsDealtData {
    /// This player's cards.
    pub cards: Vec<String>,
}

/// `COMMUNITY_CARDS_DEALT` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunityCardsDealtData {
    /// Round that dealt these cards.
    pub round: String,
    /// Cards dealt in this round.
    pub cards: Vec<String>,
    /// Entire board so far.
    pub all_community_cards: Vec<String>,
}

/// What this player may do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionOptionsData {
    /// Fold allowed.
    pub can_fold: bool,
    /// Check allowed.
    pub can_check: bool,
    /// Call allowed.
    pub can_call: bool,
    /// Amount to call.
    pub call_amount: i64,
    /// Opening bet allowed.
    pub can_bet: bool,
    /// Minimum bet.
    pub min_bet: i64,
    /// Maximum bet.
    pub max_bet: i64,
    /// Raise allowed.
    pub can_raise: bool,
    /// Minimum raise.
    pub min_raise: i64,
    /// Maximum raise.
    pub max_raise: i64,
    /// All-in allowed.
    pub can_all_in: bool,
    /// Chips committed by going all-in.
    pub all_in_amount: i64,
}

/// `ACTION_REQUIRED` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionRequiredData {
    /// Seconds before the server auto-acts.
    pub timeout_seconds: u32,
    /// Legal actions.
    pub options: ActionOptionsData,
}

/// `PLAYER_ACTED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActedData {
    /// Player who acted.
    pub player_id: PlayerId,
    /// Display name.
    #[serde(default)]
    pub player_name: String,
    /// Action name (`FOLD`, `CALL`, `ALL_IN`, ...).
    #[serde(default)]
    pub action: String,
    /// Chips added by this action.
    #[serde(default)]
    pub amount: i64,
    /// Player's total bet this round.
    #[serde(default)]
    pub total_bet: i64,
    /// Player's chips after acting.
    #[serde(default)]
    pub chip_count: i64,
    /// Sum of all pots.
    #[serde(default)]
    pub pot_total: i64,
}

/// `ACTION_TIMEOUT` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionTimeoutData {
    /// Player who timed out.
    pub player_id: PlayerId,
    /// Action the server took on their behalf.
    pub auto_action: String,
}

/// A pot winner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WinnerData {
    /// Winner.
    pub player_id: PlayerId,
    /// Chips won.
    pub amount: i64,
    /// Hand description.
    pub hand: String,
    /// Winning cards.
    pub cards: Vec<String>,
    /// Which pot.
    pub pot_index: u32,
}

/// A player's revealed hand at showdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowdownPlayerData {
    /// Player.
    pub player_id: PlayerId,
    /// Revealed cards.
    pub cards: Vec<String>,
    /// Hand description.
    pub hand_description: String,
}

/// `HAND_COMPLETE` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandCompleteData {
    /// Hand counter.
    pub hand_number: u32,
    /// Winners per pot.
    pub winners: Vec<WinnerData>,
    /// Hands shown.
    pub showdown_players: Vec<ShowdownPlayerData>,
}

/// `LEVEL_CHANGED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelChangedData {
    /// New level.
    pub level: u32,
    /// Small blind.
    pub small_blind: i64,
    /// Big blind.
    pub big_blind: i64,
    /// Ante.
    pub ante: i64,
    /// Seconds until the next level, if timed.
    pub next_level_in: Option<u32>,
}

/// `PLAYER_ELIMINATED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEliminatedData {
    /// Player who busted.
    pub player_id: PlayerId,
    /// Display name.
    #[serde(default)]
    pub player_name: String,
    /// Finishing place.
    #[serde(default)]
    pub finish_position: u32,
    /// Hands the player played.
    #[serde(default)]
    pub hands_played: u32,
}

/// `REBUY_OFFERED` / `ADDON_OFFERED` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferData {
    /// Price.
    pub cost: i64,
    /// Chips received.
    pub chips: i64,
    /// Seconds to decide.
    pub timeout_seconds: u32,
}

/// Final placing of one player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandingData {
    /// Finishing place.
    pub position: u32,
    /// Player.
    pub player_id: PlayerId,
    /// Display name.
    pub player_name: String,
    /// Prize won.
    pub prize: i64,
}

/// `GAME_COMPLETE` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameCompleteData {
    /// Final standings.
    pub standings: Vec<StandingData>,
    /// Hands dealt.
    pub total_hands: u32,
    /// Duration in seconds.
    pub duration: u64,
}

/// `PLAYER_JOINED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerJoinedData {
    /// Player.
    pub player_id: PlayerId,
    /// Display name.
    pub player_name: String,
    /// Seat taken.
    pub seat_index: i32,
}

/// `PLAYER_LEFT` / `PLAYER_DISCONNECTED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRefData {
    /// Player.
    pub player_id: PlayerId,
    /// Display name.
    #[serde(default)]
    pub player_name: String,
}

/// `PLAYER_KICKED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKickedData {
    /// Player removed.
    pub player_id: PlayerId,
    /// Display name.
    #[serde(default)]
    pub player_name: String,
    /// Why.
    #[serde(default)]
    pub reason: String,
}

/// `PLAYER_REBUY` / `PLAYER_ADDON` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipPurchaseData {
    /// Buyer.
    pub player_id: PlayerId,
    /// Display name.
    #[serde(default)]
    pub player_name: String,
    /// Chips added to the stack.
    #[serde(default)]
    pub added_chips: i64,
}

/// `POT_AWARDED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PotAwardedData {
    /// Winners.
    pub winner_ids: Vec<PlayerId>,
    /// Amount paid.
    pub amount: i64,
    /// Which pot.
    pub pot_index: u32,
}

/// `SHOWDOWN_STARTED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowdownStartedData {
    /// Table at showdown.
    pub table_id: i64,
    /// Hands revealed.
    pub showdown_players: Vec<ShowdownPlayerData>,
}

/// `GAME_PAUSED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GamePausedData {
    /// Why.
    pub reason: String,
    /// Who paused.
    pub paused_by: String,
}

/// `GAME_RESUMED` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameResumedData {
    /// Who resumed.
    pub resumed_by: String,
}

/// `TIMER_UPDATE` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerUpdateData {
    /// Player on the clock.
    pub player_id: PlayerId,
    /// Seconds left.
    pub seconds_remaining: u32,
}

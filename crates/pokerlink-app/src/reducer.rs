//! Pure state transitions.
//!
//! [`reduce`] folds one [`GameEvent`] into the current [`GameState`]. It is
//! total: every input yields a state, and inputs that change nothing return
//! the same `Arc` so observers can skip work with [`Arc::ptr_eq`].
//!
//! Server frames are validated at the dispatch boundary. A frame whose tag is
//! unknown or whose payload does not fit its tag is logged and ignored.
//! Handlers take the previous state and return `None` when nothing changes.

use std::sync::Arc;

use pokerlink_core::ConnectionState;
use pokerlink_proto::{
    InboundFrame, PlayerId, ServerMessage,
    payloads::{
        lobby::{LobbyPlayerData, LobbySettingsChangedData},
        session::{ChatMessageData, ConnectedData},
        table::{
            BlindsData, ChipPurchaseData, CommunityCardsDealtData, GameStateData, GameStatus,
            HandStartedData, LevelChangedData, PlayerActedData, PlayerEliminatedData, SeatData,
            SeatStatus,
        },
    },
};

use crate::{
    GameEvent,
    state::{ActionTimer, ChatEntry, GamePhase, GameState, MAX_CHAT_MESSAGES},
};

/// Error shown when the game is cancelled from the lobby.
pub const GAME_CANCELLED_ERROR: &str = "Game was cancelled";

/// Error shown when this player is kicked.
pub const KICKED_ERROR: &str = "You were removed from the game";

/// Error shown when another client takes over the session.
pub const SESSION_REPLACED_ERROR: &str = "This game was opened in another window";

/// Apply `event` to `state`.
pub fn reduce(state: &Arc<GameState>, event: GameEvent) -> Arc<GameState> {
    let next = match event {
        GameEvent::ConnectionStateChanged(connection_state) => {
            on_connection_state(state, connection_state)
        },
        GameEvent::Server(frame) => on_frame(state, &frame),
        GameEvent::ChatOptimistic { player_name, message, table_chat } => {
            let mut next = GameState::clone(state);
            let player_id = state.my_player_id.unwrap_or_default();
            push_chat(&mut next, player_id, player_name, message, table_chat, true);
            Some(next)
        },
        GameEvent::ClearOffers => {
            if state.rebuy_offer.is_none() && state.addon_offer.is_none() {
                None
            } else {
                Some(GameState { rebuy_offer: None, addon_offer: None, ..GameState::clone(state) })
            }
        },
        GameEvent::SessionReplaced => Some(GameState {
            error: Some(SESSION_REPLACED_ERROR.to_string()),
            ..GameState::clone(state)
        }),
        GameEvent::Reset => Some(GameState::default()),
    };

    next.map_or_else(|| Arc::clone(state), Arc::new)
}

fn on_connection_state(state: &GameState, connection_state: ConnectionState) -> Option<GameState> {
    if state.connection_state == connection_state {
        return None;
    }
    Some(GameState { connection_state, ..state.clone() })
}

fn on_frame(state: &GameState, frame: &InboundFrame) -> Option<GameState> {
    let frame = match frame.decode() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, tag = ?frame.tag(), "ignoring server message");
            return None;
        },
    };

    tracing::debug!(kind = %frame.message.kind(), seq = frame.sequence_number, "server message");
    on_message(state, frame.game_id, frame.message)
}

fn on_message(state: &GameState, game_id: String, message: ServerMessage) -> Option<GameState> {
    match message {
        ServerMessage::Connected(data) => Some(on_connected(state, game_id, data)),
        ServerMessage::Error(data) => {
            Some(GameState { error: Some(data.message), ..state.clone() })
        },

        ServerMessage::LobbyState(data) => Some(GameState {
            game_phase: GamePhase::Lobby,
            lobby_state: Some(data),
            error: None,
            ..state.clone()
        }),
        ServerMessage::LobbyPlayerJoined(data) => on_lobby_player_joined(state, data.player),
        ServerMessage::LobbyPlayerLeft(data) | ServerMessage::LobbyPlayerKicked(data) => {
            on_lobby_player_left(state, &data.player)
        },
        ServerMessage::LobbySettingsChanged(data) => on_lobby_settings_changed(state, data),
        ServerMessage::LobbyGameStarting(_) => {
            Some(GameState { game_phase: GamePhase::Playing, ..state.clone() })
        },
        ServerMessage::GameCancelled(_) => Some(GameState {
            error: Some(GAME_CANCELLED_ERROR.to_string()),
            game_phase: GamePhase::Lobby,
            ..state.clone()
        }),

        ServerMessage::GameState(data) => Some(on_game_state(state, data)),
        ServerMessage::HandStarted(data) => Some(on_hand_started(state, &data)),
        ServerMessage::HoleCardsDealt(data) => {
            Some(GameState { hole_cards: data.cards, ..state.clone() })
        },
        ServerMessage::CommunityCardsDealt(data) => on_community_cards(state, data),
        ServerMessage::ActionRequired(data) => Some(GameState {
            action_required: Some(data.options),
            action_timeout_seconds: Some(data.timeout_seconds),
            action_timer: None,
            ..state.clone()
        }),
        ServerMessage::PlayerActed(data) => Some(on_player_acted(state, &data)),
        ServerMessage::ActionTimeout(_) => Some(GameState {
            action_required: None,
            action_timeout_seconds: None,
            action_timer: None,
            ..state.clone()
        }),
        ServerMessage::HandComplete(_) => Some(GameState {
            action_required: None,
            action_timeout_seconds: None,
            action_timer: None,
            hole_cards: Vec::new(),
            ..state.clone()
        }),
        ServerMessage::LevelChanged(data) => on_level_changed(state, data),
        ServerMessage::PlayerEliminated(data) => on_player_eliminated(state, &data),
        ServerMessage::RebuyOffered(data) => {
            Some(GameState { rebuy_offer: Some(data), ..state.clone() })
        },
        ServerMessage::AddonOffered(data) => {
            Some(GameState { addon_offer: Some(data), ..state.clone() })
        },
        ServerMessage::GameComplete(data) => Some(GameState {
            game_phase: GamePhase::Complete,
            standings: data.standings,
            action_required: None,
            action_timeout_seconds: None,
            ..state.clone()
        }),

        // Chip counts for a seated joiner arrive with the next GAME_STATE.
        ServerMessage::PlayerJoined(_)
        | ServerMessage::PotAwarded(_)
        | ServerMessage::ShowdownStarted(_) => None,

        ServerMessage::PlayerLeft(data) => remove_seat(state, data.player_id),
        ServerMessage::PlayerDisconnected(data) => {
            update_seat(state, data.player_id, |seat| seat.status = SeatStatus::Disconnected)
        },
        ServerMessage::PlayerKicked(data) => {
            if state.my_player_id != Some(data.player_id) {
                return None;
            }
            Some(GameState {
                error: Some(KICKED_ERROR.to_string()),
                game_phase: GamePhase::Lobby,
                ..state.clone()
            })
        },
        ServerMessage::PlayerRebuy(data) | ServerMessage::PlayerAddon(data) => {
            on_chip_purchase(state, &data)
        },

        ServerMessage::GamePaused(_) => set_game_status(state, GameStatus::Paused),
        ServerMessage::GameResumed(_) => set_game_status(state, GameStatus::InProgress),

        ServerMessage::ChatMessage(data) => Some(on_chat_message(state, data)),
        ServerMessage::TimerUpdate(data) => Some(GameState {
            action_timer: Some(ActionTimer {
                player_id: data.player_id,
                seconds_remaining: data.seconds_remaining,
            }),
            ..state.clone()
        }),
    }
}

fn on_connected(state: &GameState, game_id: String, data: ConnectedData) -> GameState {
    let mut next = GameState {
        game_id: Some(game_id),
        my_player_id: Some(data.player_id),
        reconnect_token: data.reconnect_token,
        error: None,
        ..state.clone()
    };

    // Present only when reconnecting into a running game.
    if let Some(snapshot) = data.game_state {
        next.game_phase = GamePhase::Playing;
        next.current_table = snapshot.table_for(data.player_id).cloned();
        next.game_state = Some(snapshot);
    }

    next
}

fn on_lobby_player_joined(state: &GameState, player: LobbyPlayerData) -> Option<GameState> {
    let lobby = state.lobby_state.as_ref()?;
    if lobby.players.iter().any(|p| p.profile_id == player.profile_id) {
        return None;
    }

    let mut next = state.clone();
    if let Some(lobby) = next.lobby_state.as_mut() {
        lobby.players.push(player);
    }
    Some(next)
}

fn on_lobby_player_left(state: &GameState, player: &LobbyPlayerData) -> Option<GameState> {
    let lobby = state.lobby_state.as_ref()?;
    if !lobby.players.iter().any(|p| p.profile_id == player.profile_id) {
        return None;
    }

    let mut next = state.clone();
    if let Some(lobby) = next.lobby_state.as_mut() {
        lobby.players.retain(|p| p.profile_id != player.profile_id);
    }
    Some(next)
}

fn on_lobby_settings_changed(
    state: &GameState,
    data: LobbySettingsChangedData,
) -> Option<GameState> {
    state.lobby_state.as_ref()?;

    let settings = data.updated_settings;
    let mut next = state.clone();
    if let Some(lobby) = next.lobby_state.as_mut() {
        lobby.name = settings.name;
        lobby.max_players = settings.max_players;
        lobby.is_private = settings.is_private;
        lobby.blinds = settings.blinds;
        lobby.owner_name = settings.owner_name;
        lobby.owner_profile_id = settings.owner_profile_id;
    }
    Some(next)
}

fn on_game_state(state: &GameState, data: GameStateData) -> GameState {
    let current_table = state.my_player_id.and_then(|id| data.table_for(id).cloned());
    GameState {
        game_phase: GamePhase::Playing,
        game_state: Some(data),
        current_table,
        action_required: None,
        action_timeout_seconds: None,
        action_timer: None,
        ..state.clone()
    }
}

fn on_hand_started(state: &GameState, data: &HandStartedData) -> GameState {
    let mut next = GameState {
        hole_cards: Vec::new(),
        action_required: None,
        action_timeout_seconds: None,
        action_timer: None,
        rebuy_offer: None,
        addon_offer: None,
        ..state.clone()
    };

    if let Some(table) = next.current_table.as_mut() {
        table.hand_number = data.hand_number;
        for seat in &mut table.seats {
            seat.is_dealer = seat.seat_index == data.dealer_seat;
            seat.is_small_blind = seat.seat_index == data.small_blind_seat;
            seat.is_big_blind = seat.seat_index == data.big_blind_seat;
            seat.hole_cards.clear();
            seat.current_bet = 0;
            seat.is_current_actor = false;
            if seat.status == SeatStatus::Folded {
                seat.status = SeatStatus::Active;
            }
        }
        table.community_cards.clear();
        table.pots.clear();
    }

    next
}

fn on_community_cards(state: &GameState, data: CommunityCardsDealtData) -> Option<GameState> {
    state.current_table.as_ref()?;

    let mut next = state.clone();
    if let Some(table) = next.current_table.as_mut() {
        table.community_cards = data.all_community_cards;
        table.current_round = data.round;
    }
    Some(next)
}

fn on_player_acted(state: &GameState, data: &PlayerActedData) -> GameState {
    let mut next = state.clone();

    if state.my_player_id == Some(data.player_id) {
        next.action_required = None;
        next.action_timeout_seconds = None;
    }

    if let Some(table) = next.current_table.as_mut() {
        let status = match data.action.to_uppercase().as_str() {
            "FOLD" => SeatStatus::Folded,
            "ALL_IN" => SeatStatus::AllIn,
            _ => SeatStatus::Active,
        };
        for seat in table.seats.iter_mut().filter(|s| s.player_id == data.player_id) {
            seat.chip_count = data.chip_count;
            seat.current_bet = data.total_bet;
            seat.status = status.clone();
            seat.is_current_actor = false;
        }
        next.action_timer = None;
    }

    next
}

fn on_level_changed(state: &GameState, data: LevelChangedData) -> Option<GameState> {
    state.game_state.as_ref()?;

    let mut next = state.clone();
    if let Some(game) = next.game_state.as_mut() {
        game.level = data.level;
        game.blinds = BlindsData { small: data.small_blind, big: data.big_blind, ante: data.ante };
        game.next_level_in = data.next_level_in;
    }
    Some(next)
}

fn on_player_eliminated(state: &GameState, data: &PlayerEliminatedData) -> Option<GameState> {
    state.current_table.as_ref()?;

    let mut next = state.clone();
    if let Some(table) = next.current_table.as_mut() {
        table.seats.retain(|s| s.player_id != data.player_id);
    }
    if state.my_player_id == Some(data.player_id) {
        next.eliminated_position = Some(data.finish_position);
    }
    Some(next)
}

fn on_chip_purchase(state: &GameState, data: &ChipPurchaseData) -> Option<GameState> {
    update_seat(state, data.player_id, |seat| {
        seat.chip_count = seat.chip_count.saturating_add(data.added_chips);
    })
}

fn on_chat_message(state: &GameState, data: ChatMessageData) -> GameState {
    let mut next = state.clone();
    push_chat(&mut next, data.player_id, data.player_name, data.message, data.table_chat, false);
    next
}

fn remove_seat(state: &GameState, player_id: PlayerId) -> Option<GameState> {
    state.current_table.as_ref()?;

    let mut next = state.clone();
    if let Some(table) = next.current_table.as_mut() {
        table.seats.retain(|s| s.player_id != player_id);
    }
    Some(next)
}

fn update_seat(
    state: &GameState,
    player_id: PlayerId,
    update: impl Fn(&mut SeatData),
) -> Option<GameState> {
    state.current_table.as_ref()?;

    let mut next = state.clone();
    if let Some(table) = next.current_table.as_mut() {
        table.seats.iter_mut().filter(|s| s.player_id == player_id).for_each(update);
    }
    Some(next)
}

fn set_game_status(state: &GameState, status: GameStatus) -> Option<GameState> {
    state.game_state.as_ref()?;

    let mut next = state.clone();
    if let Some(game) = next.game_state.as_mut() {
        game.status = status;
    }
    Some(next)
}

fn push_chat(
    state: &mut GameState,
    player_id: PlayerId,
    player_name: String,
    message: String,
    table_chat: bool,
    optimistic: bool,
) {
    // The newest entry is never evicted, so ids stay increasing.
    let id = state.chat_messages.last().map_or(0, |c| c.id + 1);
    state.chat_messages.push(ChatEntry {
        id,
        player_id,
        player_name,
        message,
        table_chat,
        optimistic,
    });

    if state.chat_messages.len() > MAX_CHAT_MESSAGES {
        let excess = state.chat_messages.len() - MAX_CHAT_MESSAGES;
        state.chat_messages.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use pokerlink_proto::payloads::table::TableData;
    use serde_json::{Value, json};

    use super::*;

    fn server(kind: &str, data: Value) -> GameEvent {
        GameEvent::Server(InboundFrame::from_value(json!({
            "type": kind,
            "gameId": "g-1",
            "sequenceNumber": 1,
            "data": data,
        })))
    }

    fn seat(seat_index: i32, player_id: PlayerId, status: SeatStatus) -> SeatData {
        SeatData {
            seat_index,
            player_id,
            player_name: format!("p{player_id}"),
            chip_count: 1000,
            status,
            ..SeatData::default()
        }
    }

    fn at_table(me: PlayerId, seats: Vec<SeatData>) -> Arc<GameState> {
        Arc::new(GameState {
            my_player_id: Some(me),
            game_phase: GamePhase::Playing,
            game_state: Some(GameStateData::default()),
            current_table: Some(TableData { table_id: 1, seats, ..TableData::default() }),
            ..GameState::default()
        })
    }

    #[test]
    fn error_sets_message() {
        let state = Arc::new(GameState::default());
        let next = reduce(&state, server("ERROR", json!({ "code": "E1", "message": "nope" })));
        assert_eq!(next.error.as_deref(), Some("nope"));
    }

    #[test]
    fn connected_clears_error() {
        let state = Arc::new(GameState { error: Some("old".into()), ..GameState::default() });
        let next = reduce(&state, server("CONNECTED", json!({ "playerId": 7 })));

        assert_eq!(next.error, None);
        assert_eq!(next.my_player_id, Some(7));
        assert_eq!(next.game_id.as_deref(), Some("g-1"));
        assert_eq!(next.game_phase, GamePhase::Lobby);
    }

    #[test]
    fn hand_started_resets_per_hand_state() {
        let mut folded = seat(0, 42, SeatStatus::Folded);
        folded.current_bet = 200;
        folded.hole_cards = vec!["Ah".into(), "Kd".into()];
        folded.is_current_actor = true;
        let state = Arc::new(GameState {
            hole_cards: vec!["Qs".into(), "Qh".into()],
            action_required: Some(Default::default()),
            action_timeout_seconds: Some(30),
            rebuy_offer: Some(Default::default()),
            addon_offer: Some(Default::default()),
            ..GameState::clone(&at_table(42, vec![folded, seat(1, 99, SeatStatus::AllIn)]))
        });

        let next = reduce(
            &state,
            server("HAND_STARTED", json!({
                "handNumber": 8, "dealerSeat": 1, "smallBlindSeat": 0, "bigBlindSeat": 1,
            })),
        );

        let table = next.current_table.as_ref().unwrap();
        assert_eq!(table.hand_number, 8);
        assert_eq!(table.seats[0].status, SeatStatus::Active);
        assert_eq!(table.seats[1].status, SeatStatus::AllIn);
        assert!(table.seats[0].is_small_blind && !table.seats[0].is_dealer);
        assert!(table.seats[1].is_dealer && table.seats[1].is_big_blind);
        assert_eq!(table.seats[0].current_bet, 0);
        assert!(table.seats[0].hole_cards.is_empty());
        assert!(!table.seats[0].is_current_actor);
        assert!(next.hole_cards.is_empty());
        assert!(!next.is_my_turn());
        assert_eq!(next.rebuy_offer, None);
        assert_eq!(next.addon_offer, None);
    }

    #[test]
    fn player_acted_updates_seat_and_clears_my_turn() {
        let state = Arc::new(GameState {
            action_required: Some(Default::default()),
            action_timeout_seconds: Some(20),
            action_timer: Some(ActionTimer { player_id: 42, seconds_remaining: 3 }),
            ..GameState::clone(&at_table(42, vec![seat(0, 42, SeatStatus::Active)]))
        });

        let next = reduce(
            &state,
            server("PLAYER_ACTED", json!({
                "playerId": 42, "action": "all_in", "totalBet": 1000, "chipCount": 0,
            })),
        );

        assert!(!next.is_my_turn());
        assert_eq!(next.action_timeout_seconds, None);
        assert_eq!(next.action_timer, None);
        let me = &next.current_table.as_ref().unwrap().seats[0];
        assert_eq!(me.status, SeatStatus::AllIn);
        assert_eq!(me.chip_count, 0);
        assert_eq!(me.current_bet, 1000);
    }

    #[test]
    fn other_player_acting_keeps_my_turn() {
        let state = Arc::new(GameState {
            action_required: Some(Default::default()),
            ..GameState::clone(&at_table(42, vec![seat(0, 42, SeatStatus::Active)]))
        });

        let next = reduce(&state, server("PLAYER_ACTED", json!({ "playerId": 99, "action": "CALL" })));
        assert!(next.is_my_turn());
    }

    #[test]
    fn kicked_self_returns_to_lobby() {
        let state = at_table(42, vec![seat(0, 42, SeatStatus::Active)]);

        let next = reduce(&state, server("PLAYER_KICKED", json!({ "playerId": 42 })));
        assert_eq!(next.error.as_deref(), Some(KICKED_ERROR));
        assert_eq!(next.game_phase, GamePhase::Lobby);

        let next = reduce(&state, server("PLAYER_KICKED", json!({ "playerId": 99 })));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn rebuy_adds_chips() {
        let state = at_table(42, vec![seat(0, 42, SeatStatus::Active)]);
        let next = reduce(&state, server("PLAYER_REBUY", json!({ "playerId": 42, "addedChips": 500 })));
        assert_eq!(next.current_table.as_ref().unwrap().seats[0].chip_count, 1500);
    }

    #[test]
    fn oversized_chip_purchase_saturates() {
        let state = at_table(42, vec![seat(0, 42, SeatStatus::Active)]);
        let next =
            reduce(&state, server("PLAYER_ADDON", json!({ "playerId": 42, "addedChips": i64::MAX })));
        assert_eq!(next.current_table.as_ref().unwrap().seats[0].chip_count, i64::MAX);
    }

    #[test]
    fn pause_and_resume_patch_status() {
        let state = at_table(42, vec![]);

        let paused = reduce(&state, server("GAME_PAUSED", json!({ "pausedBy": "owner" })));
        assert_eq!(paused.game_state.as_ref().unwrap().status, GameStatus::Paused);

        let resumed = reduce(&paused, server("GAME_RESUMED", Value::Null));
        assert_eq!(resumed.game_state.as_ref().unwrap().status, GameStatus::InProgress);
    }

    #[test]
    fn level_change_requires_snapshot() {
        let state = Arc::new(GameState::default());
        let next = reduce(&state, server("LEVEL_CHANGED", json!({ "level": 2, "bigBlind": 40 })));
        assert!(Arc::ptr_eq(&state, &next));

        let state = at_table(42, vec![]);
        let next = reduce(
            &state,
            server("LEVEL_CHANGED", json!({
                "level": 2, "smallBlind": 20, "bigBlind": 40, "ante": 5, "nextLevelIn": 600,
            })),
        );
        let game = next.game_state.as_ref().unwrap();
        assert_eq!(game.level, 2);
        assert_eq!(game.blinds, BlindsData { small: 20, big: 40, ante: 5 });
        assert_eq!(game.next_level_in, Some(600));
    }

    #[test]
    fn no_op_tags_return_same_state() {
        let state = at_table(42, vec![seat(0, 42, SeatStatus::Active)]);
        for kind in ["PLAYER_JOINED", "POT_AWARDED", "SHOWDOWN_STARTED"] {
            let next = reduce(&state, server(kind, json!({})));
            assert!(Arc::ptr_eq(&state, &next), "{kind}");
        }
    }

    #[test]
    fn clear_offers_without_offers_is_no_op() {
        let state = Arc::new(GameState::default());
        assert!(Arc::ptr_eq(&state, &reduce(&state, GameEvent::ClearOffers)));
    }

    #[test]
    fn session_replaced_sets_error() {
        let state = Arc::new(GameState::default());
        let next = reduce(&state, GameEvent::SessionReplaced);
        assert_eq!(next.error.as_deref(), Some(SESSION_REPLACED_ERROR));
    }
}

//! Reducer properties
//!
//! The reducer must be total: any sequence of events, including frames with
//! unknown tags or payloads that do not fit their tag, yields a state.
//! Inputs that change nothing hand back the same `Arc`.

use std::sync::Arc;

use pokerlink_app::{GameEvent, GamePhase, GameState, MAX_CHAT_MESSAGES, reduce};
use pokerlink_core::ConnectionState;
use pokerlink_proto::{
    InboundFrame, ServerMessageType,
    payloads::{
        lobby::{LobbyPlayerData, LobbyStateData},
        table::{GameStateData, SeatData, SeatStatus, TableData},
    },
};
use proptest::prelude::*;
use serde_json::{Value, json};

fn server(kind: &str, data: Value) -> GameEvent {
    GameEvent::Server(InboundFrame::from_value(json!({
        "type": kind,
        "gameId": "g-1",
        "sequenceNumber": 1,
        "data": data,
    })))
}

fn seat(seat_index: i32, player_id: i64) -> SeatData {
    SeatData {
        seat_index,
        player_id,
        player_name: format!("p{player_id}"),
        chip_count: 1500,
        status: SeatStatus::Active,
        ..SeatData::default()
    }
}

fn playing_as(me: i64) -> Arc<GameState> {
    Arc::new(GameState {
        my_player_id: Some(me),
        game_phase: GamePhase::Playing,
        game_state: Some(GameStateData::default()),
        current_table: Some(TableData {
            table_id: 1,
            seats: vec![seat(0, 42), seat(1, 99), seat(2, 7)],
            ..TableData::default()
        }),
        ..GameState::default()
    })
}

fn lobby_player(profile_id: i64, name: &str) -> LobbyPlayerData {
    LobbyPlayerData {
        profile_id,
        name: name.to_string(),
        is_owner: profile_id == 1,
        is_ai: false,
        ai_skill_level: None,
    }
}

fn in_lobby() -> Arc<GameState> {
    Arc::new(GameState {
        lobby_state: Some(LobbyStateData {
            game_id: "g-1".into(),
            name: "Friday".into(),
            owner_name: "alice".into(),
            owner_profile_id: 1,
            max_players: 9,
            players: vec![lobby_player(1, "alice"), lobby_player(2, "bob")],
            ..LobbyStateData::default()
        }),
        ..GameState::default()
    })
}

#[test]
fn unknown_tag_leaves_state_unchanged() {
    let state = playing_as(42);
    let next = reduce(&state, server("SOMETHING_NEW", json!({ "x": 1 })));
    assert!(Arc::ptr_eq(&state, &next));
}

#[test]
fn null_and_malformed_frames_leave_state_unchanged() {
    let state = playing_as(42);

    for frame in [
        Value::Null,
        json!([1, 2, 3]),
        json!({ "gameId": "g-1" }),
        json!({ "type": 17 }),
        json!({ "type": "CONNECTED", "data": null }),
        json!({ "type": "PLAYER_ACTED", "data": { "playerId": "not-a-number" } }),
    ] {
        let next = reduce(&state, GameEvent::Server(InboundFrame::from_value(frame.clone())));
        assert!(Arc::ptr_eq(&state, &next), "{frame}");
    }
}

#[test]
fn repeated_connection_state_returns_same_arc() {
    let state = Arc::new(GameState::default());
    let connecting = reduce(&state, GameEvent::ConnectionStateChanged(ConnectionState::Connecting));
    assert!(!Arc::ptr_eq(&state, &connecting));

    let again = reduce(&connecting, GameEvent::ConnectionStateChanged(ConnectionState::Connecting));
    assert!(Arc::ptr_eq(&connecting, &again));
}

#[test]
fn chat_keeps_last_two_hundred_in_order() {
    let mut state = Arc::new(GameState { my_player_id: Some(42), ..GameState::default() });
    for i in 0..205 {
        let event = if i % 2 == 0 {
            server("CHAT_MESSAGE", json!({
                "playerId": 99, "playerName": "bob", "message": format!("m{i}"), "tableChat": true,
            }))
        } else {
            GameEvent::ChatOptimistic {
                player_name: "You".into(),
                message: format!("m{i}"),
                table_chat: true,
            }
        };
        state = reduce(&state, event);
    }

    assert_eq!(state.chat_messages.len(), MAX_CHAT_MESSAGES);
    let messages: Vec<&str> = state.chat_messages.iter().map(|c| c.message.as_str()).collect();
    let expected: Vec<String> = (5..205).map(|i| format!("m{i}")).collect();
    assert_eq!(messages, expected);

    let ids: Vec<u64> = state.chat_messages.iter().map(|c| c.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ids.last(), Some(&204));
}

#[test]
fn elimination_of_other_player_does_not_touch_my_position() {
    let state = playing_as(42);
    let next = reduce(
        &state,
        server("PLAYER_ELIMINATED", json!({ "playerId": 99, "finishPosition": 5 })),
    );

    let seats: Vec<i64> =
        next.current_table.as_ref().unwrap().seats.iter().map(|s| s.player_id).collect();
    assert_eq!(seats, vec![42, 7]);
    assert_eq!(next.eliminated_position, None);
}

#[test]
fn elimination_of_self_records_position() {
    let state = playing_as(42);
    let next = reduce(
        &state,
        server("PLAYER_ELIMINATED", json!({ "playerId": 42, "finishPosition": 3 })),
    );

    assert!(next.current_table.as_ref().unwrap().seats.iter().all(|s| s.player_id != 42));
    assert_eq!(next.eliminated_position, Some(3));
}

#[test]
fn settings_patch_preserves_roster() {
    let state = in_lobby();
    let next = reduce(
        &state,
        server("LOBBY_SETTINGS_CHANGED", json!({
            "updatedSettings": {
                "gameId": "g-1",
                "name": "Saturday",
                "maxPlayers": 6,
                "isPrivate": true,
                "ownerName": "bob",
                "ownerProfileId": 2,
                "blinds": { "small": 25, "big": 50, "ante": 0 },
                "playerCount": 0,
            }
        })),
    );

    let before = state.lobby_state.as_ref().unwrap();
    let after = next.lobby_state.as_ref().unwrap();
    assert_eq!(after.players, before.players);
    assert_eq!(after.name, "Saturday");
    assert_eq!(after.max_players, 6);
    assert!(after.is_private);
    assert_eq!(after.owner_profile_id, 2);
    assert_eq!(after.blinds.big, 50);
}

#[test]
fn lobby_roster_is_idempotent_by_profile() {
    let state = in_lobby();
    let carol = json!({ "player": { "profileId": 3, "name": "carol" } });

    let once = reduce(&state, server("LOBBY_PLAYER_JOINED", carol.clone()));
    let twice = reduce(&once, server("LOBBY_PLAYER_JOINED", carol.clone()));
    assert_eq!(once.lobby_state.as_ref().unwrap().players.len(), 3);
    assert!(Arc::ptr_eq(&once, &twice));

    let left = reduce(&twice, server("LOBBY_PLAYER_LEFT", carol.clone()));
    let left_again = reduce(&left, server("LOBBY_PLAYER_KICKED", carol));
    assert_eq!(left.lobby_state.as_ref().unwrap().players.len(), 2);
    assert!(Arc::ptr_eq(&left, &left_again));
}

#[test]
fn reconnect_snapshot_finds_my_table() {
    let state = Arc::new(GameState::default());
    let next = reduce(
        &state,
        server("CONNECTED", json!({
            "playerId": 42,
            "reconnectToken": "r-1",
            "gameState": {
                "status": "IN_PROGRESS",
                "level": 3,
                "tables": [
                    { "tableId": 1, "seats": [{ "seatIndex": 0, "playerId": 7 }] },
                    { "tableId": 2, "seats": [{ "seatIndex": 4, "playerId": 42 }] },
                ],
                "players": [
                    { "playerId": 7, "tableId": 1, "seatIndex": 0 },
                    { "playerId": 42, "tableId": 2, "seatIndex": 4 },
                ],
            },
        })),
    );

    assert_eq!(next.game_phase, GamePhase::Playing);
    assert_eq!(next.reconnect_token.as_deref(), Some("r-1"));
    assert_eq!(next.current_table.as_ref().unwrap().table_id, 2);
}

#[test]
fn game_state_clears_pending_action() {
    let state = Arc::new(GameState {
        action_required: Some(Default::default()),
        action_timeout_seconds: Some(30),
        ..GameState::clone(&playing_as(42))
    });
    let next = reduce(&state, server("GAME_STATE", json!({ "tables": [] })));

    assert!(!next.is_my_turn());
    assert_eq!(next.action_timeout_seconds, None);
    assert_eq!(next.current_table, None);
}

fn arbitrary_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!({})),
        Just(json!({ "playerId": 42, "finishPosition": 2, "addedChips": 100 })),
        Just(json!({ "playerId": 99, "action": "FOLD", "chipCount": 0, "totalBet": 50 })),
        Just(json!({ "player": { "profileId": 2 } })),
        Just(json!({ "playerId": 7, "message": "gg", "secondsRemaining": 4 })),
        any::<i64>().prop_map(|n| json!({ "playerId": n, "level": n })),
        any::<i64>().prop_map(|n| json!({ "playerId": 42, "addedChips": n })),
        ".*".prop_map(Value::from),
    ]
}

fn arbitrary_event() -> impl Strategy<Value = GameEvent> {
    let tag = prop_oneof![
        8 => prop::sample::select(ServerMessageType::ALL.to_vec()).prop_map(|k| k.as_str().to_string()),
        1 => "[A-Z_]{1,20}",
    ];
    prop_oneof![
        8 => (tag, arbitrary_payload()).prop_map(|(kind, data)| server(&kind, data)),
        1 => prop_oneof![
            Just(ConnectionState::Connecting),
            Just(ConnectionState::Connected),
            Just(ConnectionState::Reconnecting),
            Just(ConnectionState::Disconnected),
        ]
        .prop_map(GameEvent::ConnectionStateChanged),
        1 => ".{0,20}".prop_map(|message| GameEvent::ChatOptimistic {
            player_name: "You".into(),
            message,
            table_chat: false,
        }),
        1 => Just(GameEvent::ClearOffers),
        1 => Just(GameEvent::SessionReplaced),
    ]
}

proptest! {
    #[test]
    fn reducer_is_total(events in prop::collection::vec(arbitrary_event(), 0..100)) {
        let mut state = playing_as(42);
        for event in events {
            state = reduce(&state, event);
            prop_assert!(state.chat_messages.len() <= MAX_CHAT_MESSAGES);
        }
    }

    #[test]
    fn reset_always_returns_initial_state(events in prop::collection::vec(arbitrary_event(), 0..50)) {
        let mut state = in_lobby();
        for event in events {
            state = reduce(&state, event);
        }
        let reset = reduce(&state, GameEvent::Reset);
        prop_assert!(*reset == GameState::default());
    }
}

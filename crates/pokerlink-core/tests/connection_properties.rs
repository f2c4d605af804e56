//! Property-based tests for the connection manager
//!
//! Drives the state machine with arbitrary interleavings of user calls and
//! socket events on a virtual clock and checks the invariants that must hold
//! regardless of ordering.

use std::{ops::Sub, time::Duration};

use pokerlink_core::{
    CLOSE_CONNECTION_REPLACED, ConnectionAction, ConnectionConfig, ConnectionManager,
    ConnectionState, SocketId,
};
use pokerlink_proto::{ClientFrame, ClientMessage};
use proptest::prelude::*;

/// Virtual instant: time since the start of the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SimInstant(Duration);

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

#[derive(Debug, Clone)]
enum Op {
    Send,
    Open,
    Close(u16),
    Advance(u64),
    SetReconnectToken,
    Disconnect,
    Reconnect,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Send),
        3 => Just(Op::Open),
        2 => prop_oneof![Just(1000u16), Just(1006), Just(1011), Just(CLOSE_CONNECTION_REPLACED)]
            .prop_map(Op::Close),
        3 => (0u64..40_000).prop_map(Op::Advance),
        1 => Just(Op::SetReconnectToken),
        1 => Just(Op::Disconnect),
        1 => Just(Op::Reconnect),
    ]
}

/// Minimal driver bookkeeping: which socket the manager asked us to open.
struct Harness {
    conn: ConnectionManager<SimInstant>,
    now: SimInstant,
    pending_open: Option<SocketId>,
    open: Option<SocketId>,
    sent: Vec<u64>,
    states: Vec<ConnectionState>,
    opens_since_connect: u32,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            conn: ConnectionManager::new(ConnectionConfig::default()),
            now: SimInstant(Duration::ZERO),
            pending_open: None,
            open: None,
            sent: Vec::new(),
            states: Vec::new(),
            opens_since_connect: 0,
        };
        let actions = harness.conn.connect("ws://localhost:8080/ws", "tok").unwrap();
        harness.apply(actions);
        harness
    }

    fn apply(&mut self, actions: Vec<ConnectionAction>) {
        for action in actions {
            match action {
                ConnectionAction::OpenSocket { socket, .. } => {
                    self.pending_open = Some(socket);
                    self.open = None;
                    self.opens_since_connect += 1;
                },
                ConnectionAction::CloseSocket { socket, .. } => {
                    if self.open == Some(socket) {
                        self.open = None;
                    }
                    if self.pending_open == Some(socket) {
                        self.pending_open = None;
                    }
                },
                ConnectionAction::SendText { text, .. } => {
                    self.sent.push(ClientFrame::decode(&text).unwrap().sequence_number);
                },
                ConnectionAction::StateChanged(state) => self.states.push(state),
                ConnectionAction::Deliver(_)
                | ConnectionAction::TransportError(_)
                | ConnectionAction::SessionReplaced => {},
            }
        }
    }

    fn step(&mut self, op: Op) {
        let actions = match op {
            Op::Send => self.conn.send(ClientMessage::SitOut).unwrap(),
            Op::Open => match self.pending_open.take() {
                Some(socket) => {
                    self.open = Some(socket);
                    self.conn.handle_open(socket)
                },
                None => Vec::new(),
            },
            Op::Close(code) => match self.open.take().or_else(|| self.pending_open.take()) {
                Some(socket) => self.conn.handle_close(socket, code, self.now),
                None => Vec::new(),
            },
            Op::Advance(ms) => {
                self.now = SimInstant(self.now.0 + Duration::from_millis(ms));
                self.conn.tick(self.now)
            },
            Op::SetReconnectToken => {
                self.conn.set_reconnect_token("r-tok");
                Vec::new()
            },
            Op::Disconnect => self.conn.disconnect(),
            Op::Reconnect => {
                self.sent.clear();
                self.opens_since_connect = 0;
                self.conn.connect("ws://localhost:8080/ws", "tok-2").unwrap()
            },
        };
        self.apply(actions);
    }
}

proptest! {
    #[test]
    fn sequence_numbers_rise_by_exactly_one(ops in prop::collection::vec(arbitrary_op(), 0..200)) {
        let mut h = Harness::new();
        for op in ops {
            h.step(op);
        }

        for (i, seq) in h.sent.iter().enumerate() {
            prop_assert_eq!(*seq, i as u64 + 1);
        }
    }

    #[test]
    fn consecutive_state_changes_differ(ops in prop::collection::vec(arbitrary_op(), 0..200)) {
        let mut h = Harness::new();
        for op in ops {
            h.step(op);
        }

        for pair in h.states.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
        prop_assert_eq!(h.states.last().copied(), Some(h.conn.connection_state()));
    }

    #[test]
    fn at_most_one_socket_is_current(ops in prop::collection::vec(arbitrary_op(), 0..200)) {
        let mut h = Harness::new();
        for op in ops {
            h.step(op);
            prop_assert!(h.open.is_none() || h.pending_open.is_none());
            prop_assert_eq!(h.conn.current_socket(), h.open.or(h.pending_open));
        }
    }

    #[test]
    fn retries_are_bounded(ops in prop::collection::vec(arbitrary_op(), 0..300)) {
        let mut h = Harness::new();
        let bound = ConnectionConfig::default().max_attempts() + 1;
        for op in ops {
            h.step(op);
            prop_assert!(h.conn.reconnect_attempt() <= bound);
        }
    }

    #[test]
    fn nothing_happens_after_disconnect(ops in prop::collection::vec(arbitrary_op(), 0..100)) {
        let mut h = Harness::new();
        h.step(Op::Open);
        h.step(Op::Disconnect);

        for op in ops {
            if matches!(op, Op::Reconnect) {
                continue;
            }
            let opens = h.opens_since_connect;
            h.step(op);
            prop_assert_eq!(h.opens_since_connect, opens);
            prop_assert_eq!(h.conn.connection_state(), ConnectionState::Disconnected);
        }
    }
}

#[test]
fn one_socket_opened_one_second_after_abnormal_close() {
    let mut h = Harness::new();
    h.step(Op::Open);
    assert_eq!(h.conn.connection_state(), ConnectionState::Connected);

    h.step(Op::Close(1006));
    let opens = h.opens_since_connect;

    h.step(Op::Advance(999));
    assert_eq!(h.opens_since_connect, opens);

    h.step(Op::Advance(1));
    assert_eq!(h.opens_since_connect, opens + 1);

    h.step(Op::Advance(60_000));
    assert_eq!(h.opens_since_connect, opens + 1);
}

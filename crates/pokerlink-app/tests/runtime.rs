//! Runtime tests with an in-memory driver
//!
//! Time is paused, so reconnect backoff runs on tokio's virtual clock and
//! each test finishes instantly.

use std::{convert::Infallible, future::Future, sync::Arc, time::Duration};

use pokerlink_app::{
    Driver, GamePhase, GameState, Intent, Runtime, RuntimeError, Session, SessionConfig, SessionHandle,
    TransportCommand, TransportEvent,
};
use pokerlink_core::{ConnectionState, Environment, SocketId};
use pokerlink_proto::{
    ClientFrame, ClientMessage,
    payloads::client::{PlayerActionData, PokerAction},
};
use tokio::{sync::mpsc, task::JoinHandle};

const ENDPOINT: &str = "ws://localhost:8080/ws/games/g-1";

#[derive(Clone)]
struct TokioEnv;

impl Environment for TokioEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Records every command and replays events pushed by the test.
struct MemoryDriver {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    commands: mpsc::UnboundedSender<TransportCommand>,
}

impl Driver for MemoryDriver {
    type Error = Infallible;

    async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    async fn open(&mut self, socket: SocketId, url: &str) -> Result<(), Infallible> {
        let _ = self.commands.send(TransportCommand::Open { socket, url: url.to_string() });
        Ok(())
    }

    async fn send_text(&mut self, socket: SocketId, text: String) -> Result<(), Infallible> {
        let _ = self.commands.send(TransportCommand::Send { socket, text });
        Ok(())
    }

    async fn close(&mut self, socket: SocketId, code: u16, reason: String) -> Result<(), Infallible> {
        let _ = self.commands.send(TransportCommand::Close { socket, code, reason });
        Ok(())
    }
}

struct Harness {
    handle: SessionHandle,
    events: mpsc::UnboundedSender<TransportEvent>,
    commands: mpsc::UnboundedReceiver<TransportCommand>,
    task: JoinHandle<Result<(), RuntimeError<Infallible>>>,
}

impl Harness {
    fn start() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let driver = MemoryDriver { events: event_rx, commands: command_tx };

        let (runtime, handle) = Runtime::new(driver, TokioEnv, Session::new(SessionConfig::default()));
        let task = tokio::spawn(runtime.run());

        Self { handle, events: event_tx, commands: command_rx, task }
    }

    async fn expect_open(&mut self) -> (SocketId, String) {
        loop {
            match self.commands.recv().await.unwrap() {
                TransportCommand::Open { socket, url } => return (socket, url),
                TransportCommand::Close { .. } => {},
                other => panic!("expected open, got {other:?}"),
            }
        }
    }

    async fn expect_send(&mut self) -> ClientFrame {
        match self.commands.recv().await.unwrap() {
            TransportCommand::Send { text, .. } => ClientFrame::decode(&text).unwrap(),
            other => panic!("expected send, got {other:?}"),
        }
    }

    fn push(&self, event: TransportEvent) {
        self.events.send(event).unwrap();
    }

    async fn wait_for(&self, f: impl FnMut(&Arc<GameState>) -> bool) {
        let mut rx = self.handle.subscribe();
        rx.wait_for(f).await.unwrap();
    }

    async fn quit(self) {
        assert!(self.handle.send(Intent::Quit).await);
        self.task.await.unwrap().unwrap();
    }
}

fn connected_frame(token: &str) -> String {
    format!(
        r#"{{"type":"CONNECTED","gameId":"g-1","sequenceNumber":1,"data":{{"playerId":42,"reconnectToken":"{token}"}}}}"#
    )
}

#[tokio::test(start_paused = true)]
async fn connect_open_connected_then_act() {
    let mut h = Harness::start();
    h.handle
        .send(Intent::Connect { endpoint: ENDPOINT.into(), token: "tok".into() })
        .await;

    let (socket, url) = h.expect_open().await;
    assert_eq!(url, format!("{ENDPOINT}?token=tok"));
    h.wait_for(|s| s.connection_state == ConnectionState::Connecting).await;

    h.push(TransportEvent::Opened(socket));
    h.push(TransportEvent::Text(socket, connected_frame("r-1")));
    h.wait_for(|s| s.my_player_id == Some(42)).await;

    let state = h.handle.state();
    assert_eq!(state.connection_state, ConnectionState::Connected);
    assert_eq!(state.game_id.as_deref(), Some("g-1"));
    assert_eq!(state.game_phase, GamePhase::Lobby);
    assert_eq!(state.error, None);

    h.handle.send(Intent::Action { action: PokerAction::Call, amount: 0 }).await;
    let frame = h.expect_send().await;
    assert_eq!(frame.sequence_number, 1);
    assert_eq!(
        frame.message,
        ClientMessage::PlayerAction(PlayerActionData { action: PokerAction::Call, amount: 0 })
    );

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn abnormal_close_reconnects_with_reconnect_token() {
    let mut h = Harness::start();
    h.handle
        .send(Intent::Connect { endpoint: ENDPOINT.into(), token: "tok".into() })
        .await;
    let (socket, _) = h.expect_open().await;
    h.push(TransportEvent::Opened(socket));
    h.push(TransportEvent::Text(socket, connected_frame("r-1")));
    h.wait_for(|s| s.reconnect_token.is_some()).await;

    let closed_at = tokio::time::Instant::now();
    h.push(TransportEvent::Closed(socket, 1006));
    h.wait_for(|s| s.connection_state == ConnectionState::Reconnecting).await;

    let (retry, url) = h.expect_open().await;
    assert_ne!(retry, socket);
    assert_eq!(url, format!("{ENDPOINT}?token=r-1"));
    assert!(closed_at.elapsed() >= Duration::from_secs(1));

    h.push(TransportEvent::Opened(retry));
    h.wait_for(|s| s.connection_state == ConnectionState::Connected).await;

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn replaced_session_does_not_reconnect() {
    let mut h = Harness::start();
    h.handle
        .send(Intent::Connect { endpoint: ENDPOINT.into(), token: "tok".into() })
        .await;
    let (socket, _) = h.expect_open().await;
    h.push(TransportEvent::Opened(socket));
    h.push(TransportEvent::Closed(socket, 4409));
    h.wait_for(|s| s.error.is_some()).await;
    assert_eq!(h.handle.state().connection_state, ConnectionState::Disconnected);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(h.commands.try_recv().is_err());

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn intents_while_disconnected_send_nothing() {
    let mut h = Harness::start();
    h.handle.send(Intent::SitOut).await;
    h.handle.send(Intent::Chat { message: "hello?".into(), table_chat: false }).await;
    h.wait_for(|s| s.chat_messages.len() == 1).await;

    assert!(h.handle.state().chat_messages[0].optimistic);
    assert!(h.commands.try_recv().is_err());

    h.quit().await;
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_runtime() {
    let h = Harness::start();
    drop(h.handle);
    h.task.await.unwrap().unwrap();
}

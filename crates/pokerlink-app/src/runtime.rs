//! Generic runtime for session orchestration.
//!
//! The Runtime drives the session event loop, coordinating between:
//! - [`Session`]: connection plus view model
//! - [`Driver`]: platform-specific socket I/O
//! - [`Environment`]: clock and sleeping for reconnect deadlines
//!
//! Intents arrive over an mpsc channel and each new view model is published
//! through a `watch` channel.

use std::sync::Arc;

use pokerlink_core::Environment;
use tokio::sync::{mpsc, watch};

use crate::{Driver, GameState, Intent, Session, TransportCommand, TransportEvent};

/// Capacity of the intent channel.
const INTENT_CHANNEL_CAPACITY: usize = 64;

/// Runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver failed.
    #[error("driver error: {0}")]
    Driver(#[source] E),
}

/// Front-end side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    intents: mpsc::Sender<Intent>,
    state: watch::Receiver<Arc<GameState>>,
}

impl SessionHandle {
    /// Queue an intent. Returns `false` if the runtime has stopped.
    pub async fn send(&self, intent: Intent) -> bool {
        self.intents.send(intent).await.is_ok()
    }

    /// Latest published view model.
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state.borrow())
    }

    /// Subscribe to view model updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<GameState>> {
        self.state.clone()
    }
}

/// Generic runtime that orchestrates a Session and a Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific socket driver
/// - `E`: Environment providing time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    session: Session<E::Instant>,
    intents: mpsc::Receiver<Intent>,
    state_tx: watch::Sender<Arc<GameState>>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a runtime and the handle a front end uses to talk to it.
    pub fn new(driver: D, env: E, session: Session<E::Instant>) -> (Self, SessionHandle) {
        let (intent_tx, intents) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(Arc::clone(session.state()));

        let runtime = Self { driver, env, session, intents, state_tx };
        (runtime, SessionHandle { intents: intent_tx, state: state_rx })
    }

    /// Current view model.
    pub fn state(&self) -> &Arc<GameState> {
        self.session.state()
    }

    /// Run the event loop.
    ///
    /// Returns once [`Intent::Quit`] is received, every [`SessionHandle`] is
    /// dropped, or the driver shuts down.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub async fn run(mut self) -> Result<(), RuntimeError<D::Error>> {
        loop {
            let should_quit = self.process_cycle().await?;
            self.publish();
            if should_quit {
                break;
            }
        }

        tracing::debug!("runtime stopped");
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the runtime should stop.
    async fn process_cycle(&mut self) -> Result<bool, RuntimeError<D::Error>> {
        let due_in = self.session.reconnect_due_in(self.env.now());

        let should_quit = tokio::select! {
            event = self.driver.next_event() => match event {
                Some(event) => {
                    self.handle_transport_event(event);
                    false
                },
                None => {
                    tracing::info!("driver shut down");
                    true
                },
            },
            intent = self.intents.recv() => {
                let intent = intent.unwrap_or(Intent::Quit);
                let quit = intent == Intent::Quit;
                if let Err(e) = self.session.dispatch(intent) {
                    tracing::warn!(error = %e, "intent failed");
                }
                quit
            },
            () = self.env.sleep(due_in.unwrap_or_default()), if due_in.is_some() => {
                self.session.tick(self.env.now());
                false
            },
        };

        self.execute_outgoing().await?;
        Ok(should_quit)
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened(socket) => self.session.handle_open(socket),
            TransportEvent::Text(socket, text) => self.session.handle_text(socket, &text),
            TransportEvent::Error(socket, message) => self.session.handle_error(socket, &message),
            TransportEvent::Closed(socket, code) => {
                self.session.handle_close(socket, code, self.env.now());
            },
        }
    }

    /// Execute all pending transport commands.
    async fn execute_outgoing(&mut self) -> Result<(), RuntimeError<D::Error>> {
        for command in self.session.take_outgoing() {
            let result = match command {
                TransportCommand::Open { socket, url } => self.driver.open(socket, &url).await,
                TransportCommand::Send { socket, text } => {
                    self.driver.send_text(socket, text).await
                },
                TransportCommand::Close { socket, code, reason } => {
                    self.driver.close(socket, code, reason).await
                },
            };
            result.map_err(RuntimeError::Driver)?;
        }
        Ok(())
    }

    fn publish(&self) {
        let state = self.session.state();
        self.state_tx.send_if_modified(|current| {
            if Arc::ptr_eq(current, state) {
                return false;
            }
            *current = Arc::clone(state);
            true
        });
    }
}

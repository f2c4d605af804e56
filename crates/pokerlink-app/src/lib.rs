//! Application layer for Pokerlink
//!
//! Pure view-model reducer, session orchestration and a generic runtime,
//! enabling deterministic tests with the same code that runs in production.
//!
//! # Components
//!
//! - [`GameState`]: immutable view model a UI renders from
//! - [`reduce`]: pure transition function over [`GameEvent`]s
//! - [`Session`]: connection manager plus view model, driven by [`Intent`]s
//! - [`Driver`]: trait for platform-specific socket I/O
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod event;
mod intent;
mod reducer;
mod runtime;
mod session;
mod state;

pub use action::TransportCommand;
pub use driver::{Driver, TransportEvent};
pub use event::GameEvent;
pub use intent::Intent;
pub use reducer::{GAME_CANCELLED_ERROR, KICKED_ERROR, SESSION_REPLACED_ERROR, reduce};
pub use runtime::{Runtime, RuntimeError, SessionHandle};
pub use session::{Session, SessionConfig};
pub use state::{ActionTimer, ChatEntry, GamePhase, GameState, MAX_CHAT_MESSAGES};

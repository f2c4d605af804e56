//! Connection layer for pokerlink
//!
//! Owns the lifecycle of one game-session socket: token-authenticated
//! connect, outbound framing with sequence numbers, and automatic
//! reconnection with exponential backoff. Pure state machine with no I/O;
//! drivers execute the returned [`ConnectionAction`]s.
//!
//! # Components
//!
//! - [`ConnectionManager`]: socket lifecycle and reconnect policy
//! - [`Environment`]: clock abstraction for production and tests
//! - [`ConnectionError`]: caller errors (bad endpoint, encode failure)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod connection;
pub mod env;
pub mod error;

pub use connection::{
    CLOSE_CONNECTION_REPLACED, CLOSE_NORMAL, ConnectionAction, ConnectionConfig,
    ConnectionManager, ConnectionState, DEFAULT_BACKOFF, SocketId,
};
pub use env::Environment;
pub use error::ConnectionError;

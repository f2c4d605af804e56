//! Production glue for Pokerlink sessions.
//!
//! # Components
//!
//! - [`WsTransport`]: tokio-tungstenite [`pokerlink_app::Driver`]
//! - [`GameServerApi`]: join and socket-token REST calls
//! - [`SystemEnv`]: real clock for reconnect deadlines
//! - [`commands`]: text commands for the `pokerlink` binary

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
pub mod commands;
mod error;
mod system_env;
mod transport;
pub mod ws_url;

pub use api::{GameServerApi, JoinResponse};
pub use error::{ApiError, ClientError, TransportError};
pub use system_env::SystemEnv;
pub use transport::{CLOSE_ABNORMAL, CLOSE_NO_STATUS, WsTransport};

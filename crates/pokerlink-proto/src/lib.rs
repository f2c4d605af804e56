//! Pokerlink protocol
//!
//! Wire types for the real-time game-session socket. Every frame is a JSON
//! object carrying a `type` discriminant, a sequence number and a payload:
//!
//! - Inbound (server to client): `{ type, gameId, sequenceNumber, data }`
//! - Outbound (client to server): `{ type, sequenceNumber, data? }`
//!
//! The tag set is closed on both sides. [`ServerMessageType`] and
//! [`ClientMessageType`] enumerate it, and [`ServerMessage`] /
//! [`ClientMessage`] pair every tag with its typed payload so consumers can
//! match exhaustively.
//!
//! Decoding happens in two stages. [`InboundFrame`] only guarantees the
//! text was a JSON value; [`InboundFrame::decode`] then validates the
//! envelope and payload.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
mod frame;
mod kind;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use frame::{ClientFrame, InboundFrame, ServerFrame};
pub use kind::{ClientMessageType, ServerMessageType};
pub use payloads::{ClientMessage, ServerMessage};

/// Player identifier as assigned by the game server.
pub type PlayerId = i64;

//! Transport side-effects.
//!
//! This module defines [`TransportCommand`], the socket work a
//! [`crate::Session`] asks the runtime to perform through its
//! [`crate::Driver`].

use pokerlink_core::SocketId;

/// Socket operations produced by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    /// Open a socket and report its events under `socket`.
    Open {
        /// Id for this socket's events.
        socket: SocketId,
        /// Full URL including the token.
        url: String,
    },

    /// Send a text frame.
    Send {
        /// Target socket.
        socket: SocketId,
        /// Encoded frame.
        text: String,
    },

    /// Close a socket.
    Close {
        /// Socket to close.
        socket: SocketId,
        /// WebSocket close code.
        code: u16,
        /// Close reason.
        reason: String,
    },
}

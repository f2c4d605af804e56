//! Driver trait for abstracting socket I/O.
//!
//! The [`Driver`] trait decouples the session runtime from a specific
//! WebSocket implementation. Production uses tokio-tungstenite, while tests
//! use an in-memory driver; the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use pokerlink_core::SocketId;

/// Events a driver reports for the sockets it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake finished.
    Opened(SocketId),
    /// A text frame arrived.
    Text(SocketId, String),
    /// The socket failed; a `Closed` follows.
    Error(SocketId, String),
    /// The socket closed, or never opened.
    Closed(SocketId, u16),
}

/// Abstracts socket I/O for the session runtime.
///
/// Opening is asynchronous from the session's point of view: `open` starts
/// the handshake and the outcome arrives later as [`TransportEvent::Opened`]
/// or [`TransportEvent::Closed`].
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wait for the next socket event.
    ///
    /// Returns `None` once the driver has shut down. Must be cancel safe: the
    /// runtime polls it inside `tokio::select!`.
    fn next_event(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Start opening a socket to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver can no longer open sockets.
    fn open(
        &mut self,
        socket: SocketId,
        url: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver can no longer send.
    fn send_text(
        &mut self,
        socket: SocketId,
        text: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close a socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver can no longer close sockets.
    fn close(
        &mut self,
        socket: SocketId,
        code: u16,
        reason: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

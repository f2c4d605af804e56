//! Client errors.

use pokerlink_app::RuntimeError;
use thiserror::Error;

/// WebSocket transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Handshake failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Reading or writing an open socket failed.
    #[error("stream error: {0}")]
    Stream(String),
}

/// REST errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A URL could not be parsed or joined.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl {
        /// Offending input.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Scheme is neither HTTP nor WebSocket.
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    /// Request, transport or body decode failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server message, or the raw body.
        message: String,
    },
}

/// Top-level errors for the command-line client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session runtime failed.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError<TransportError>),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The runtime task panicked or was cancelled.
    #[error("runtime task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

//! Error types for the connection manager.
//!
//! Transport failures are not errors here: the manager reports them as
//! [`ConnectionAction::TransportError`](crate::ConnectionAction) and recovers
//! through reconnection. Only caller mistakes surface as [`ConnectionError`].

use thiserror::Error;

/// Errors returned by [`ConnectionManager`](crate::ConnectionManager)
/// operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Endpoint is not an absolute `ws://` or `wss://` URL
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// Endpoint as given
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },

    /// Outbound message could not be serialized
    #[error("failed to encode message: {0}")]
    Encode(String),
}

impl From<pokerlink_proto::ProtocolError> for ConnectionError {
    fn from(err: pokerlink_proto::ProtocolError) -> Self {
        Self::Encode(err.to_string())
    }
}

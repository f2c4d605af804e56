//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame text was not valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// Frame is not an object or its `type` field is absent or not a string.
    #[error("frame has no string `type` field")]
    MissingType,

    /// `type` names a tag outside the known set.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Payload did not match the shape required by its tag.
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload {
        /// Tag of the offending frame.
        kind: &'static str,
        /// Deserializer error description.
        reason: String,
    },

    /// Serialization of an outbound frame failed.
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

impl ProtocolError {
    /// Returns true if the frame was rejected before its tag was known.
    ///
    /// Envelope errors mean the peer sent something that is not a protocol
    /// frame at all; payload errors mean a recognised tag carried bad data.
    pub fn is_envelope_error(&self) -> bool {
        matches!(self, Self::MalformedJson(_) | Self::MissingType | Self::UnknownType(_))
    }
}

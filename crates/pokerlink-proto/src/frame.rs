//! Frame envelopes.
//!
//! [`InboundFrame`] is what the transport hands upward: text that parsed as
//! JSON, nothing more. [`InboundFrame::decode`] validates the envelope and
//! payload into a [`ServerFrame`]. [`ClientFrame`] is the outbound envelope.

use serde_json::{Map, Value};

use crate::{
    ClientMessage, ClientMessageType, ServerMessage, ServerMessageType,
    errors::{ProtocolError, Result},
};

/// A server frame that parsed as JSON but has not been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame(Value);

impl InboundFrame {
    /// Parse socket text.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MalformedJson` if `text` is not JSON
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map(Self)
            .map_err(|e| ProtocolError::MalformedJson(e.to_string()))
    }

    /// Wrap an already parsed value.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Raw JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `type` field, if the frame is an object and the field is a string.
    pub fn tag(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Validate the envelope and decode the payload.
    ///
    /// A missing `gameId` reads as empty and a missing `sequenceNumber` as
    /// zero; neither affects state.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MissingType` if there is no string `type`
    /// - `ProtocolError::UnknownType` if the tag is not a server tag
    /// - `ProtocolError::InvalidPayload` if `data` does not fit the tag
    pub fn decode(&self) -> Result<ServerFrame> {
        let tag = self.tag().ok_or(ProtocolError::MissingType)?;
        let kind = ServerMessageType::from_tag(tag)
            .ok_or_else(|| ProtocolError::UnknownType(tag.to_owned()))?;

        let game_id = self.0.get("gameId").and_then(Value::as_str).unwrap_or_default().to_owned();
        let sequence_number =
            self.0.get("sequenceNumber").and_then(Value::as_u64).unwrap_or_default();
        let data = self.0.get("data").cloned().unwrap_or(Value::Null);

        Ok(ServerFrame { game_id, sequence_number, message: ServerMessage::decode(kind, data)? })
    }
}

/// Validated server-to-client frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFrame {
    /// Session the frame belongs to.
    pub game_id: String,
    /// Server-side sequence number.
    pub sequence_number: u64,
    /// Typed payload.
    pub message: ServerMessage,
}

impl ServerFrame {
    /// Encode to socket text. Used by test servers.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn encode(&self) -> Result<String> {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::from(self.message.kind().as_str()));
        obj.insert("gameId".into(), Value::from(self.game_id.as_str()));
        obj.insert("sequenceNumber".into(), Value::from(self.sequence_number));
        obj.insert("data".into(), self.message.to_data()?);

        serde_json::to_string(&obj).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

/// Client-to-server frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFrame {
    /// Client-local sequence number.
    pub sequence_number: u64,
    /// Typed payload.
    pub message: ClientMessage,
}

impl ClientFrame {
    /// Encode to socket text. `data` is omitted for tags without a payload.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn encode(&self) -> Result<String> {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::from(self.message.kind().as_str()));
        obj.insert("sequenceNumber".into(), Value::from(self.sequence_number));
        if let Some(data) = self.message.to_data()? {
            obj.insert("data".into(), data);
        }

        serde_json::to_string(&obj).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Decode socket text. Used by test servers.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MalformedJson` if `text` is not JSON
    /// - `ProtocolError::MissingType` if there is no string `type`
    /// - `ProtocolError::UnknownType` if the tag is not a client tag
    /// - `ProtocolError::InvalidPayload` if `data` does not fit the tag
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;

        let tag = value.get("type").and_then(Value::as_str).ok_or(ProtocolError::MissingType)?;
        let kind = ClientMessageType::from_tag(tag)
            .ok_or_else(|| ProtocolError::UnknownType(tag.to_owned()))?;
        let sequence_number =
            value.get("sequenceNumber").and_then(Value::as_u64).unwrap_or_default();

        Ok(Self {
            sequence_number,
            message: ClientMessage::decode(kind, value.get("data").cloned())?,
        })
    }
}

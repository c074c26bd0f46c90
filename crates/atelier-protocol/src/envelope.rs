//! The raw wire frame, before any payload typing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// One transport frame: `{"type": <string>, "data": <value>}`.
///
/// The typed layers ([`crate::Request`], [`crate::HostEvent`]) serialize to
/// exactly this shape; `Envelope` exists for the places that need to look at
/// a frame without committing to a payload type, such as logging the kind of
/// a message that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Parse a raw frame. Anything that is not a JSON object with a string
    /// `type` is a deserialization error.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Deserialize)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Serialize)
    }

    /// Payload with an absent or `null` `data` field normalized to `{}`,
    /// matching senders that omit the field for bare requests.
    pub fn normalized_data(&self) -> Value {
        if self.data.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            self.data.clone()
        }
    }
}

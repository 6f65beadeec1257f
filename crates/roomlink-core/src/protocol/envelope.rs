//! Chat message envelope (JSON text frame).
//!
//! Every frame on the wire is exactly this two-field object. The codec adds
//! nothing: no timestamp, no sender id. Such metadata belongs to the
//! transport-level session context or the server.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoomlinkError};

/// Event type used when the sender does not specify one.
pub const DEFAULT_EVENT_TYPE: &str = "TEXT";

/// One chat message as exchanged over the transport.
///
/// Unknown extra fields on inbound frames are tolerated (the server may
/// enrich messages); `content` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Caller-supplied payload.
    pub content: String,
    /// Message kind (field name is `eventType` in JSON).
    #[serde(rename = "eventType", default = "default_event_type")]
    pub event_type: String,
}

fn default_event_type() -> String {
    DEFAULT_EVENT_TYPE.to_string()
}

impl Envelope {
    /// Text message with the default event type.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            event_type: default_event_type(),
        }
    }

    /// Message with an explicit event type.
    pub fn with_event_type(content: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            event_type: event_type.into(),
        }
    }
}

/// Serialize an envelope to its wire form.
pub fn encode(env: &Envelope) -> Result<String> {
    serde_json::to_string(env)
        .map_err(|e| RoomlinkError::Internal(format!("envelope encode failed: {e}")))
}

/// Parse a wire payload into an envelope.
///
/// Any parse failure (invalid JSON, wrong shape, missing `content`) is
/// `MalformedFrame`: the caller drops the frame and keeps the connection.
pub fn decode(payload: &str) -> Result<Envelope> {
    serde_json::from_str(payload)
        .map_err(|e| RoomlinkError::MalformedFrame(format!("invalid envelope json: {e}")))
}

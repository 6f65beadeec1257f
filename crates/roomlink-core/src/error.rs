//! Shared error type across roomlink crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoomlinkError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum RoomlinkError {
    /// Inbound frame that could not be parsed as an envelope. Fatal to the
    /// frame only; the connection survives.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RoomlinkError {
    /// Whether the error invalidates only the offending frame, leaving the
    /// connection usable.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, RoomlinkError::MalformedFrame(_))
    }
}

//! Wire seam between the connection manager and a concrete transport.
//!
//! The manager never touches a socket type directly; it pumps frames
//! through these trait objects. Production uses the tokio-tungstenite
//! connector in [`super::ws`]; tests substitute channel-backed fakes.

use async_trait::async_trait;

use roomlink_core::error::Result;

/// One discrete unit exchanged with the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireFrame {
    /// UTF-8 JSON envelope payload.
    Text(String),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

/// Outbound half of a link.
#[async_trait]
pub trait FrameSink: Send {
    async fn send(&mut self, frame: WireFrame) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

/// Inbound half of a link. `next` yields `None` once the transport is gone.
#[async_trait]
pub trait FrameSource: Send {
    async fn next(&mut self) -> Option<Result<WireFrame>>;
}

/// Dials the chat endpoint and hands back the two halves of a link.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
        auth_token: Option<&str>,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>)>;
}

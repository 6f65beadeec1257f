//! Session facade: the one surface the presentation layer touches.

use std::sync::Arc;

use roomlink_core::error::Result;
use roomlink_core::protocol::envelope::DEFAULT_EVENT_TYPE;
use roomlink_core::protocol::{encode, Envelope};
use roomlink_core::room::RoomId;
use roomlink_core::status;

use crate::config::ChatConfig;
use crate::reconnect::{NoReconnect, ReconnectPolicy};
use crate::transport::conn::{ConnectionManager, ConnectionState, MessageStream};
use crate::transport::endpoint::Endpoint;
use crate::transport::wire::Connector;
use crate::transport::ws::WsConnector;

/// One chat session, bound to at most one room at a time.
///
/// The session exclusively owns its connection: selecting a different room
/// tears the previous link down before the new one is dialed, and dropping
/// the session releases the link on every exit path.
pub struct ChatSession {
    manager: ConnectionManager,
    messages: Option<MessageStream>,
}

impl ChatSession {
    /// Session over the production WebSocket transport, no reconnection.
    pub fn new(cfg: &ChatConfig) -> Self {
        Self::with_connector(cfg, Arc::new(WsConnector), Arc::new(NoReconnect))
    }

    /// Session over an explicit transport and reconnect policy.
    pub fn with_connector(
        cfg: &ChatConfig,
        connector: Arc<dyn Connector>,
        policy: Arc<dyn ReconnectPolicy>,
    ) -> Self {
        let endpoint = Endpoint::new(&cfg.endpoint.base_url, cfg.endpoint.page_secure);
        let manager = ConnectionManager::new(
            connector,
            policy,
            endpoint,
            cfg.auth_token.clone(),
            cfg.session.outbound_queue,
        );
        Self {
            manager,
            messages: None,
        }
    }

    /// Bind the session to `room`, replacing any previous binding.
    pub async fn start(&mut self, room: impl Into<RoomId>) -> Result<()> {
        let room = room.into();
        let stream = self.manager.open(&room).await?;
        self.messages = Some(stream);
        Ok(())
    }

    /// Next inbound message; `None` once the link is gone.
    pub async fn recv(&mut self) -> Option<Envelope> {
        match &mut self.messages {
            Some(stream) => stream.recv().await,
            None => None,
        }
    }

    /// Take ownership of the inbound stream, e.g. to consume it as a
    /// `futures_util::Stream` while the session keeps handling sends.
    pub fn messages(&mut self) -> Option<MessageStream> {
        self.messages.take()
    }

    /// Send a text message. Fire-and-forget: silently dropped unless the
    /// connection is open.
    pub fn send(&self, content: &str) {
        self.send_with_event(content, DEFAULT_EVENT_TYPE);
    }

    /// Send a message with an explicit event type.
    pub fn send_with_event(&self, content: &str, event_type: &str) {
        let env = Envelope::with_event_type(content, event_type);
        match encode(&env) {
            Ok(frame) => self.manager.send(frame),
            Err(e) => tracing::warn!(error = %e, "dropping unencodable message"),
        }
    }

    /// Whether the composer should render for an application in this
    /// status. Pure; independent of connection state.
    pub fn is_chat_available(application_status: Option<&str>) -> bool {
        status::is_chat_available(application_status)
    }

    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.manager.room()
    }

    /// Release the link. Idempotent.
    pub async fn close(&mut self) {
        self.manager.close().await;
        self.messages = None;
    }
}

//! Chat endpoint construction.

use roomlink_core::room::RoomId;

/// Where chat connections are dialed to.
///
/// The scheme inherits the hosting page's security context: a secure page
/// always upgrades to `wss`, and the transport never downgrades a secure
/// page to an insecure channel.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    page_secure: bool,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, page_secure: bool) -> Self {
        Self {
            base_url: base_url.into(),
            page_secure,
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.page_secure {
            "wss"
        } else {
            "ws"
        }
    }

    /// Connection URL for one room: `<scheme>://<base_url>/chat?roomId=<room>`.
    pub fn room_url(&self, room: &RoomId) -> String {
        format!("{}://{}/chat?roomId={}", self.scheme(), self.base_url, room)
    }
}

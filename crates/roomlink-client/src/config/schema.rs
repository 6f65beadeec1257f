use serde::Deserialize;

use roomlink_core::error::{Result, RoomlinkError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    pub version: u32,

    pub endpoint: EndpointSection,

    #[serde(default)]
    pub session: SessionSection,

    /// Bearer credential for the connection handshake, supplied by the auth
    /// collaborator. Never placed in message envelopes.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl ChatConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomlinkError::UnsupportedVersion);
        }

        self.endpoint.validate()?;
        self.session.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSection {
    /// Chat host, `host[:port]` without a scheme. The scheme is derived
    /// from `page_secure`, never configured directly.
    pub base_url: String,

    /// Whether the hosting page itself was loaded securely.
    #[serde(default = "default_page_secure")]
    pub page_secure: bool,
}

impl EndpointSection {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(RoomlinkError::InvalidConfig(
                "endpoint.base_url must not be empty".into(),
            ));
        }
        if self.base_url.contains("://") {
            return Err(RoomlinkError::InvalidConfig(
                "endpoint.base_url must be host[:port], without a scheme".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl SessionSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(RoomlinkError::InvalidConfig(
                "session.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_page_secure() -> bool {
    true
}
fn default_outbound_queue() -> usize {
    256
}

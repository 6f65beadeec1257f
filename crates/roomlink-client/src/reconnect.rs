//! Reconnection policy seam.
//!
//! The session core itself never retries: a transport that drops leaves the
//! session closed until the caller re-opens it. Products that need
//! automatic recovery install a policy; the pump consults it after every
//! unexpected transport loss and redials when it yields a delay.

use std::time::Duration;

/// Strategy consulted after an unexpected transport loss.
pub trait ReconnectPolicy: Send + Sync {
    /// Delay before redial attempt `attempt` (1-based), or `None` to stay
    /// closed. The attempt counter resets once a redial succeeds.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;
}

/// Default policy: never reconnect. An unexpected close leaves the session
/// closed until the caller selects the room again.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReconnect;

impl ReconnectPolicy for NoReconnect {
    fn next_delay(&self, _attempt: u32) -> Option<Duration> {
        None
    }
}

//! Room identifier.

use std::fmt;

/// Opaque identifier of one chat channel, scoped to a single
/// application/task negotiation.
///
/// Supplied externally (application or task external id); the owning
/// session is torn down and rebuilt whenever it changes. An empty id is
/// never connectable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Task and application external ids are numeric upstream.
impl From<u64> for RoomId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

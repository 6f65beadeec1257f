//! Top-level facade crate for roomlink.
//!
//! Re-exports core types and the client library so users can depend on a single crate.

pub mod core {
    pub use roomlink_core::*;
}

pub mod client {
    pub use roomlink_client::*;
}

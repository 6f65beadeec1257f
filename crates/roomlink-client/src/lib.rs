//! roomlink client library entry.
//!
//! This crate wires the config layer, the WebSocket transport, the
//! connection manager, and the reconnect seam into the `ChatSession`
//! surface the presentation layer consumes. It is intended to be used by
//! the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod reconnect;
pub mod session;
pub mod transport;

pub use session::ChatSession;
pub use transport::conn::{ConnectionManager, ConnectionState, MessageStream};

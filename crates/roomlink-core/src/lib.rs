//! roomlink core: transport-agnostic chat primitives, error types, and the
//! availability gate.
//!
//! This crate defines the wire-level envelope, the application-status gate,
//! and the error surface shared by the client crate and any future tooling.
//! It intentionally carries no transport or runtime dependencies so it can
//! be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RoomlinkError`/`Result` so a hosting
//! process never crashes on malformed frames or bad status strings.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod room;
pub mod status;

/// Shared result type.
pub use error::{Result, RoomlinkError};
pub use protocol::envelope::Envelope;
pub use room::RoomId;
pub use status::{is_chat_available, ApplicationStatus};

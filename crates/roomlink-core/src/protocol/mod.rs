//! Wire protocol for the chat transport.
//!
//! A single text lane: UTF-8 JSON frames shaped as the two-field
//! [`envelope::Envelope`]. The codec is pure and stateless; malformed input
//! is reported as `RoomlinkError::MalformedFrame` instead of panicking, so
//! hostile or garbled traffic can never take the session down.

pub mod envelope;

pub use envelope::{decode, encode, Envelope};

//! Envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use roomlink_core::protocol::{decode, Envelope};

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_envelope_min() {
    let s = load("envelope_min.json");
    let env: Envelope = decode(&s).unwrap();
    assert_eq!(env.content, "hello");
    assert_eq!(env.event_type, "TEXT");
}

#[test]
fn parse_envelope_full() {
    let s = load("envelope_full.json");
    let env: Envelope = decode(&s).unwrap();
    assert_eq!(env.content, "offer accepted, starting monday");
    assert_eq!(env.event_type, "SYSTEM");
}

#[test]
fn parse_envelope_with_server_enrichment() {
    // Servers may attach metadata; extra fields must not break decoding.
    let s = load("envelope_enriched.json");
    let env: Envelope = decode(&s).unwrap();
    assert_eq!(env.content, "hi");
    assert_eq!(env.event_type, "TEXT");
}

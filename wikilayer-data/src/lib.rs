//! Network adapters for the Wikipedia marker layer.
//!
//! Responsibilities:
//! - Fetch geosearch results from a MediaWiki API over HTTP.
//! - Deliver completions to the host event loop through a channel.
//!
//! Boundaries:
//! - Do not encode layer rules (live in `wikilayer-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - No global mutable state; request ids are allocated per transport.

pub mod transport;

//! Core domain types for bunbox.
//!
//! bunbox vendors the [Bun](https://bun.sh) JavaScript runtime with a host
//! application: it maps the host platform to the matching upstream release,
//! keeps a cached copy of the binary, and resolves which executable a host
//! should invoke.
//!
//! This crate holds the pure parts of that system:
//! - Platform taxonomy and mapping to upstream release tags
//! - Canonical path resolution for the cache, binary, binstub and manifest
//! - Run-event payloads and the emitter port runtime adapters implement
//!
//! Network, filesystem mutation and process dispatch live in
//! `bunbox-runtime`.

pub mod events;
pub mod paths;
pub mod platform;
pub mod ports;

//! Ports implemented by runtime adapters.

mod run_emitter;

pub use run_emitter::{NoopEmitter, RunEventEmitter};

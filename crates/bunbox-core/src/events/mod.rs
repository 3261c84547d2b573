//! Event payloads emitted around execution dispatch.

use std::time::Duration;

use serde::Serialize;

/// Payload emitted for every dispatch of the managed Bun binary.
///
/// `duration` is measured from dispatch to child exit and is therefore
/// only present for supervised subprocess runs; a process replacement has
/// no "after" to measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEvent {
    /// The full command line, target path and arguments joined by spaces.
    pub command: String,
    /// Wall-clock duration of the subprocess, if one was awaited.
    pub duration: Option<Duration>,
}

impl RunEvent {
    /// Create a new run event.
    pub const fn new(command: String, duration: Option<Duration>) -> Self {
        Self { command, duration }
    }
}

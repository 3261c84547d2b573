//! Run-event emitter trait for instrumentation.
//!
//! This module defines the abstraction the dispatcher notifies around each
//! invocation of the managed binary. Implementations handle transport
//! details (log subscribers, notification buses, test recorders).

use crate::events::RunEvent;

/// Trait for emitting run events.
///
/// This abstraction keeps instrumentation out of the dispatch path and
/// prevents any concrete bus from becoming part of the public API surface.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and hosts that don't consume events
/// - Host-specific implementations (notification bus, metrics bridge, ...)
pub trait RunEventEmitter: Send + Sync {
    /// Emit a run event.
    ///
    /// Implementations should handle the event quickly or buffer it;
    /// this method is called on the dispatch path and should not block.
    fn emit(&self, event: RunEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn RunEventEmitter>` without requiring
    /// the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn RunEventEmitter>;
}

/// A no-op emitter for tests and hosts without an event listener.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl RunEventEmitter for NoopEmitter {
    fn emit(&self, _event: RunEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn RunEventEmitter> {
        Box::new(self.clone())
    }
}

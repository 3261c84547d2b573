//! Capability-gated integrations with optional third-party tools.
//!
//! Each adapter targets one optional component. At activation time the
//! registry probes every adapter; only adapters whose target is actually
//! registered in the current process get applied. Probing absence is a
//! normal, silent outcome - a host without any of these tools loses
//! nothing.

mod cssbundling;
mod execjs;
mod hooks;
mod jsbundling;
mod vite;

use std::sync::Arc;

use tracing::debug;

use crate::runner::Runner;

pub use cssbundling::Cssbundling;
pub use execjs::ExecJs;
pub use hooks::{
    BundlerTasks, IntegrationHooks, JsRuntimeHost, ViteExecutableResolver, ViteRunner,
};
pub use jsbundling::Jsbundling;
pub use vite::Vite;

/// One capability-gated patch unit.
pub trait Integration: Send + Sync {
    /// Stable identifier, reported from [`Registry::activate_all`].
    fn id(&self) -> &'static str;

    /// Whether the adapter's target is present. Must be side-effect-free.
    fn probe(&self) -> bool;

    /// Install the redirection. Returns whether it took effect. Safe to
    /// call repeatedly; re-application replaces the previous override
    /// rather than compounding it.
    fn apply(&self) -> bool;
}

/// The fixed set of adapters, activated together.
///
/// Holds no state beyond the adapter list; `activate_all` may be called
/// any number of times.
pub struct Registry {
    adapters: Vec<Box<dyn Integration>>,
}

impl Registry {
    /// A registry with the built-in adapter set.
    pub fn with_default_adapters(hooks: Arc<IntegrationHooks>, runner: Arc<Runner>) -> Self {
        Self {
            adapters: vec![
                Box::new(ExecJs::new(Arc::clone(&hooks), Arc::clone(&runner))),
                Box::new(Jsbundling::new(Arc::clone(&hooks), Arc::clone(&runner))),
                Box::new(Cssbundling::new(Arc::clone(&hooks), Arc::clone(&runner))),
                Box::new(Vite::new(hooks, runner)),
            ],
        }
    }

    /// A registry with an explicit adapter set.
    pub fn from_adapters(adapters: Vec<Box<dyn Integration>>) -> Self {
        Self { adapters }
    }

    /// Ids of all adapters in this registry, applied or not.
    pub fn adapter_ids(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    /// Probe every adapter and apply those whose target is present.
    ///
    /// Returns the ids of the adapters that were applied successfully.
    pub fn activate_all(&self) -> Vec<&'static str> {
        let mut applied = Vec::new();
        for adapter in &self.adapters {
            if !adapter.probe() {
                debug!(adapter = adapter.id(), "target absent, skipping");
                continue;
            }
            if adapter.apply() {
                debug!(adapter = adapter.id(), "integration applied");
                applied.push(adapter.id());
            }
        }
        applied
    }
}

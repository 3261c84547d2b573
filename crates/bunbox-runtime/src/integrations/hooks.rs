//! Registration points for optional third-party build-tool components.
//!
//! bunbox never links against the tools it integrates with. Instead, each
//! optional component (or a thin shim for it) registers a typed handle
//! here when it loads; adapters probe these slots and, when a handle is
//! present, install command overrides through it. An empty slot simply
//! means the component is not part of this process.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Host for an embeddable-JavaScript-runtime selection.
///
/// The target keeps a table of named runtimes; bunbox replaces its Bun
/// entry and makes it the default.
pub trait JsRuntimeHost: Send + Sync {
    /// Register (or replace) the named runtime backed by `command` and
    /// select it as the default runtime.
    fn set_runtime(&self, name: &str, command: Vec<String>);
}

/// Bundler task commands (install / build) exposed by a bundling tool.
///
/// Overrides are layered: the target consults the override first and falls
/// back to its own default, so clearing an override restores the original
/// behavior.
pub trait BundlerTasks: Send + Sync {
    fn set_install_command_override(&self, command: Option<String>);
    fn set_build_command_override(&self, command: Option<String>);

    /// The effective install command: the override when set, the target's
    /// own default otherwise.
    fn install_command(&self) -> String;

    /// The effective build command.
    fn build_command(&self) -> String;
}

/// Resolver deciding which argv a Vite-style dev-server runner executes.
///
/// Receives the target's user-configured executable path (if any) so that
/// a custom binstub can keep precedence over any redirection.
pub type ViteExecutableResolver = Arc<dyn Fn(Option<&Path>, &[String]) -> Vec<String> + Send + Sync>;

/// A Vite-style dev-server runner.
pub trait ViteRunner: Send + Sync {
    /// A user-configured executable path, honored ahead of any override.
    fn custom_bin_path(&self) -> Option<PathBuf>;

    /// Install the resolver the runner uses to build its executable argv.
    fn set_executable_resolver(&self, resolver: ViteExecutableResolver);
}

/// The slots optional components register themselves into.
///
/// An explicit context object rather than hidden module state: tests and
/// embedders construct fresh instances, while hosts that want load-time
/// registration share [`IntegrationHooks::global`].
#[derive(Default)]
pub struct IntegrationHooks {
    js_runtime: RwLock<Option<Arc<dyn JsRuntimeHost>>>,
    js_bundler: RwLock<Option<Arc<dyn BundlerTasks>>>,
    css_bundler: RwLock<Option<Arc<dyn BundlerTasks>>>,
    vite: RwLock<Option<Arc<dyn ViteRunner>>>,
}

impl IntegrationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide hook registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<IntegrationHooks> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    pub fn register_js_runtime(&self, host: Arc<dyn JsRuntimeHost>) {
        *write_slot(&self.js_runtime) = Some(host);
    }

    pub fn js_runtime(&self) -> Option<Arc<dyn JsRuntimeHost>> {
        read_slot(&self.js_runtime)
    }

    pub fn register_js_bundler(&self, tasks: Arc<dyn BundlerTasks>) {
        *write_slot(&self.js_bundler) = Some(tasks);
    }

    pub fn js_bundler(&self) -> Option<Arc<dyn BundlerTasks>> {
        read_slot(&self.js_bundler)
    }

    pub fn register_css_bundler(&self, tasks: Arc<dyn BundlerTasks>) {
        *write_slot(&self.css_bundler) = Some(tasks);
    }

    pub fn css_bundler(&self) -> Option<Arc<dyn BundlerTasks>> {
        read_slot(&self.css_bundler)
    }

    pub fn register_vite(&self, runner: Arc<dyn ViteRunner>) {
        *write_slot(&self.vite) = Some(runner);
    }

    pub fn vite(&self) -> Option<Arc<dyn ViteRunner>> {
        read_slot(&self.vite)
    }
}

fn read_slot<T: ?Sized>(slot: &RwLock<Option<Arc<T>>>) -> Option<Arc<T>> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write_slot<T: ?Sized>(
    slot: &RwLock<Option<Arc<T>>>,
) -> std::sync::RwLockWriteGuard<'_, Option<Arc<T>>> {
    slot.write().unwrap_or_else(PoisonError::into_inner)
}

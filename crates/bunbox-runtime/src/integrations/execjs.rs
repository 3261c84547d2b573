//! Adapter for embeddable-JavaScript-runtime hosts.
//!
//! Replaces the target's Bun runtime definition with one that launches the
//! resolved bunbox executable, and selects it as the default runtime.

use std::sync::Arc;

use crate::runner::Runner;

use super::Integration;
use super::hooks::IntegrationHooks;

/// Name under which the redirected runtime is registered with the target.
const RUNTIME_NAME: &str = "Bun.sh";

pub struct ExecJs {
    hooks: Arc<IntegrationHooks>,
    runner: Arc<Runner>,
}

impl ExecJs {
    pub fn new(hooks: Arc<IntegrationHooks>, runner: Arc<Runner>) -> Self {
        Self { hooks, runner }
    }
}

impl Integration for ExecJs {
    fn id(&self) -> &'static str {
        "execjs"
    }

    fn probe(&self) -> bool {
        self.hooks.js_runtime().is_some()
    }

    fn apply(&self) -> bool {
        let Some(host) = self.hooks.js_runtime() else {
            return false;
        };

        host.set_runtime(
            RUNTIME_NAME,
            vec![self.runner.preferred_path().display().to_string()],
        );
        true
    }
}

//! Adapter for JavaScript bundling task modules.
//!
//! Rewrites the target's install and build commands to run through the
//! resolved bunbox executable. The target's own defaults stay reachable:
//! clearing the overrides restores them.

use std::sync::Arc;

use crate::runner::Runner;

use super::Integration;
use super::hooks::IntegrationHooks;

pub struct Jsbundling {
    hooks: Arc<IntegrationHooks>,
    runner: Arc<Runner>,
}

impl Jsbundling {
    pub fn new(hooks: Arc<IntegrationHooks>, runner: Arc<Runner>) -> Self {
        Self { hooks, runner }
    }
}

impl Integration for Jsbundling {
    fn id(&self) -> &'static str {
        "jsbundling"
    }

    fn probe(&self) -> bool {
        self.hooks.js_bundler().is_some()
    }

    fn apply(&self) -> bool {
        let Some(tasks) = self.hooks.js_bundler() else {
            return false;
        };

        let bun = self.runner.preferred_path();
        tasks.set_install_command_override(Some(format!("{} install", bun.display())));
        tasks.set_build_command_override(Some(format!("{} run --bun build", bun.display())));
        true
    }
}

//! Adapter for CSS bundling task modules.
//!
//! Identical in shape to the JavaScript bundling adapter; only the build
//! entry point differs.

use std::sync::Arc;

use crate::runner::Runner;

use super::Integration;
use super::hooks::IntegrationHooks;

pub struct Cssbundling {
    hooks: Arc<IntegrationHooks>,
    runner: Arc<Runner>,
}

impl Cssbundling {
    pub fn new(hooks: Arc<IntegrationHooks>, runner: Arc<Runner>) -> Self {
        Self { hooks, runner }
    }
}

impl Integration for Cssbundling {
    fn id(&self) -> &'static str {
        "cssbundling"
    }

    fn probe(&self) -> bool {
        self.hooks.css_bundler().is_some()
    }

    fn apply(&self) -> bool {
        let Some(tasks) = self.hooks.css_bundler() else {
            return false;
        };

        let bun = self.runner.preferred_path();
        tasks.set_install_command_override(Some(format!("{} install", bun.display())));
        tasks.set_build_command_override(Some(format!("{} run --bun build:css", bun.display())));
        true
    }
}

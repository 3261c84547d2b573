//! Adapter for Vite-style dev-server runners.
//!
//! Installs an executable resolver that routes the runner through the
//! bunbox executable (`bun x --bun ... vite`). A user-configured custom
//! binary path keeps precedence: the resolver steps aside whenever that
//! path exists.

use std::sync::Arc;

use crate::runner::Runner;

use super::Integration;
use super::hooks::IntegrationHooks;

pub struct Vite {
    hooks: Arc<IntegrationHooks>,
    runner: Arc<Runner>,
}

impl Vite {
    pub fn new(hooks: Arc<IntegrationHooks>, runner: Arc<Runner>) -> Self {
        Self { hooks, runner }
    }
}

impl Integration for Vite {
    fn id(&self) -> &'static str {
        "vite"
    }

    fn probe(&self) -> bool {
        self.hooks.vite().is_some()
    }

    fn apply(&self) -> bool {
        let Some(target) = self.hooks.vite() else {
            return false;
        };

        let runner = Arc::clone(&self.runner);
        target.set_executable_resolver(Arc::new(move |custom_bin, exec_args| {
            // A custom binstub configured on the target side still wins.
            if let Some(bin) = custom_bin {
                if bin.exists() {
                    return vec![bin.display().to_string()];
                }
            }

            let mut argv = vec![
                runner.preferred_path().display().to_string(),
                "x".to_string(),
                "--bun".to_string(),
            ];
            argv.extend(exec_args.iter().cloned());
            argv.push("vite".to_string());
            argv
        }));
        true
    }
}

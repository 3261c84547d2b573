//! Binary lifecycle, execution dispatch and integrations for bunbox.
//!
//! This crate does the impure half of vendoring Bun: it downloads and
//! caches the platform-specific binary, decides which executable a host
//! invocation hits, rewrites the process `PATH`, and redirects optional
//! third-party tools to the managed binary.
#![deny(unsafe_code)]

pub mod bun;
pub mod env_path;
pub mod integrations;
mod runner;

// Re-export the dispatcher and its vocabulary
pub use runner::{
    BunArgs, EXIT_MISSING_BINARY, ExecMode, ExecTarget, ProcessSpawner, RunError, RunOutcome,
    Runner, SystemSpawner,
};

// Re-export acquisition essentials
pub use bun::{BunArtifact, BunError, BunResult, Installer, resolve_bun};

// Re-export PATH handling
pub use env_path::EnvPath;

// Re-export the integration surface
pub use integrations::{IntegrationHooks, Registry};

/// Run the managed Bun binary with `args`, replacing the current process.
///
/// A shortcut for hosts that only ever hand control over to Bun:
///
/// ```rust,ignore
/// bunbox_runtime::call("--version")?;
/// bunbox_runtime::call(vec!["add", "postcss"])?;
/// ```
///
/// Exits the process with status 127 if the managed binary is not
/// installed; on success this never returns.
pub fn call(args: impl Into<BunArgs>) -> anyhow::Result<RunOutcome> {
    let runner = Runner::new()?;
    Ok(runner.run(args, ExecMode::Replace)?)
}

//! Subcommand definitions.

use clap::Subcommand;

/// All bunbox subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Download and vendor the Bun runtime
    Install {
        /// Vendor a specific version instead of the latest release
        #[arg(long)]
        version: Option<String>,

        /// Vendor for an explicit platform instead of the build host
        /// (e.g. 'aarch64-darwin')
        #[arg(long)]
        platform: Option<String>,

        /// Refresh the binary even if one is already vendored
        #[arg(long)]
        force: bool,
    },

    /// Show the managed Bun installation state
    Status,

    /// Remove the vendored binary and stale downloads
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Run the vendored Bun with the given arguments
    Run {
        /// Replace this process instead of supervising a child
        #[arg(long)]
        replace: bool,

        /// Arguments forwarded to Bun
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Check whether a newer Bun release is available
    CheckUpdates,

    /// Print resolved bunbox paths
    Paths,
}

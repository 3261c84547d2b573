//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the Bun vendoring tool.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "bunbox")]
#[command(about = "Vendor and run the Bun JavaScript runtime")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_args() {
        let cli = Cli::parse_from(["bunbox", "--verbose", "status"]);
        assert!(cli.verbose);
    }

    #[test]
    fn run_forwards_hyphenated_args() {
        let cli = Cli::parse_from(["bunbox", "run", "install", "--no-save"]);
        match cli.command {
            Some(Commands::Run { replace, args }) => {
                assert!(!replace);
                assert_eq!(args, vec!["install", "--no-save"]);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn install_accepts_version_and_platform() {
        let cli = Cli::parse_from([
            "bunbox",
            "install",
            "--version",
            "1.1.38",
            "--platform",
            "aarch64-darwin",
        ]);
        match cli.command {
            Some(Commands::Install {
                version, platform, ..
            }) => {
                assert_eq!(version.as_deref(), Some("1.1.38"));
                assert_eq!(platform.as_deref(), Some("aarch64-darwin"));
            }
            _ => panic!("expected install command"),
        }
    }
}

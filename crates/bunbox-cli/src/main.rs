//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers which delegate to bunbox-runtime.

use clap::Parser;

use bunbox_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Install {
            version,
            platform,
            force,
        } => {
            handlers::install(version, platform, force).await?;
        }
        Commands::Status => {
            handlers::status()?;
        }
        Commands::Clear { force } => {
            handlers::clear(force)?;
        }
        Commands::Run { replace, args } => {
            handlers::run(args, replace)?;
        }
        Commands::CheckUpdates => {
            handlers::check_updates().await?;
        }
        Commands::Paths => {
            handlers::paths_info()?;
        }
    }

    Ok(())
}

//! Command handlers.
//!
//! Handlers translate parsed arguments into calls on `bunbox-runtime` and
//! print user-facing output. No dispatch logic lives here.

use std::fs;
use std::io::{self, Write};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use bunbox_core::paths;
use bunbox_runtime::bun::{self, Installer};
use bunbox_runtime::{EnvPath, ExecMode, RunOutcome, Runner};

/// Handle the install command.
pub async fn install(
    version: Option<String>,
    platform: Option<String>,
    force: bool,
) -> Result<()> {
    let mut installer = Installer::new()?;
    if let Some(version) = version {
        installer = installer.pin_version(version);
    }

    if force {
        let binary = paths::bun_binary_path()?;
        if binary.exists() {
            fs::remove_file(&binary)?;
        }
    }

    let artifact = match platform {
        Some(platform) => {
            println!("Vendoring Bun for {platform}...");
            installer.acquire_for(&platform).await?
        }
        None => {
            println!("Vendoring Bun for this platform...");
            let pb = download_progress_bar();
            let callback = |downloaded: u64, total: u64| {
                if pb.length() != Some(total) {
                    pb.set_length(total);
                }
                pb.set_position(downloaded);
            };
            let artifact = installer.acquire_with_progress(&callback).await?;
            pb.finish_and_clear();
            artifact
        }
    };

    if artifact.freshly_downloaded {
        println!();
        println!("Bun installed successfully!");
        println!("  Binary: {}", artifact.executable_path.display());
        if let Some(version) = &artifact.version {
            println!("  Version: {version}");
        }
        println!("  Platform: {}", artifact.platform_tag);
    } else {
        println!(
            "Bun is already vendored in: {}",
            artifact.cache_dir.display()
        );
        println!("Use --force to refresh the binary.");
    }

    Ok(())
}

fn download_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

/// Handle the status command.
pub fn status() -> Result<()> {
    bun::handle_status()
}

/// Handle the clear command.
///
/// Sweeps only bunbox-managed files out of the cache directory; anything
/// else sharing the directory is left alone.
pub fn clear(force: bool) -> Result<()> {
    let installer = Installer::new()?;

    if !installer.cache_dir().exists() {
        println!("Bun is not installed.");
        return Ok(());
    }

    if !force {
        print!("This will remove the vendored Bun binary. Continue? [y/N]: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Clear cancelled.");
            return Ok(());
        }
    }

    let removed = installer.clear()?;
    if removed.is_empty() {
        println!("Nothing to remove.");
    } else {
        for path in &removed {
            println!("Removed {}", path.display());
        }
    }

    Ok(())
}

/// Handle the run command.
pub fn run(args: Vec<String>, replace: bool) -> Result<()> {
    // Make the vendored binary visible to anything the child spawns.
    if let Ok(vendor) = paths::vendor_dir() {
        EnvPath::prepend(&vendor);
    }

    let runner = Runner::new()?;
    let mode = if replace {
        ExecMode::Replace
    } else {
        ExecMode::Subprocess
    };

    match runner.run(args, mode)? {
        RunOutcome::Success => Ok(()),
        RunOutcome::Failure(code) => {
            // Mirror the child's exit code so scripts see the real result.
            std::process::exit(code.unwrap_or(1));
        }
    }
}

/// Handle the check-updates command.
pub async fn check_updates() -> Result<()> {
    let installer = Installer::new()?;

    let Some(manifest) = installer.manifest() else {
        println!("Bun is not installed.");
        println!("Run 'bunbox install' to vendor it.");
        return Ok(());
    };

    println!(
        "Current version: {} ({})",
        manifest.version, manifest.platform
    );
    println!();
    println!("Checking for updates...");

    let latest = installer.version().await?;
    if latest == manifest.version {
        println!("Bun is up to date");
    } else {
        println!("New version available: {latest}");
        println!("Run 'bunbox install --force' to update.");
    }

    Ok(())
}

/// Handle the paths command.
pub fn paths_info() -> Result<()> {
    let data_root = paths::data_root()?;
    let vendor = paths::vendor_dir()?;
    let binary = paths::bun_binary_path()?;
    let binstub = paths::binstub_path();
    let manifest = paths::manifest_path()?;

    let state = |exists: bool| if exists { "present" } else { "absent" };

    println!("Data root:       {}", data_root.display());
    println!("Vendor dir:      {}", vendor.display());
    println!(
        "Managed binary:  {} ({})",
        binary.display(),
        state(binary.exists())
    );
    println!(
        "Project binstub: {} ({})",
        binstub.display(),
        state(binstub.exists())
    );
    println!(
        "Manifest:        {} ({})",
        manifest.display(),
        state(manifest.exists())
    );

    Ok(())
}

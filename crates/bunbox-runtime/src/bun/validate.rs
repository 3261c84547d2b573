//! Binary validation and status reporting for the managed Bun binary.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

use bunbox_core::paths::bun_binary_path;

use super::install::InstallManifest;

/// Validate that the managed Bun binary is functional.
pub fn validate_bun_binary(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!(
            "bun not found at: {}\n\nRun 'bunbox install' to vendor it.",
            path.display()
        );
    }

    if !path.is_file() {
        bail!("bun path is not a file: {}", path.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = path.metadata().context("Failed to read binary metadata")?;
        if metadata.permissions().mode() & 0o111 == 0 {
            bail!("bun is not executable: {}", path.display());
        }
    }

    let output = Command::new(path)
        .arg("--version")
        .output()
        .context("Failed to execute bun")?;

    if !output.status.success() {
        bail!(
            "bun binary appears corrupted: {}\n\nRun 'bunbox install' after 'bunbox clear' to fix.",
            path.display()
        );
    }

    Ok(())
}

/// The version the managed binary reports for itself.
pub fn installed_version(path: &Path) -> Result<String> {
    let output = Command::new(path)
        .arg("--version")
        .output()
        .context("Failed to execute bun")?;

    if !output.status.success() {
        bail!("bun --version exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Handle the status command.
pub fn handle_status() -> Result<()> {
    let binary_path = bun_binary_path().map_err(|e| anyhow::anyhow!("{}", e))?;

    if !binary_path.exists() {
        println!("Status: Not installed");
        println!();
        println!("Run 'bunbox install' to vendor the Bun runtime");
        return Ok(());
    }

    println!("Status: Installed");
    println!("Binary: {}", binary_path.display());

    match validate_bun_binary(&binary_path) {
        Ok(()) => println!("Health: ok"),
        Err(e) => {
            println!("Health: error - {e}");
            return Ok(());
        }
    }

    if let Ok(version) = installed_version(&binary_path) {
        println!("Version: {version}");
    }

    if let Some(parent) = binary_path.parent() {
        if let Some(manifest) = InstallManifest::load(parent) {
            println!();
            println!("Install information:");
            println!("  Version: {}", manifest.version);
            println!("  Platform: {}", manifest.platform);
            println!("  Installed at: {}", manifest.installed_at);
        }
    }

    Ok(())
}

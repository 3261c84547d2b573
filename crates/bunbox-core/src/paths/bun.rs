//! Bun binary path resolution.
//!
//! Provides the cache layout for the managed Bun binary and the
//! project-local binstub convention.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the cache root.
pub const DATA_DIR_ENV: &str = "BUNBOX_DATA_DIR";

/// Filename of the install manifest written next to the managed binary.
pub const MANIFEST_FILE: &str = "bun-install.json";

/// Get the root directory for bunbox data.
///
/// Resolution order:
/// 1. `BUNBOX_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g. `~/.local/share/bunbox`)
pub fn data_root() -> Result<PathBuf, PathError> {
    data_root_from(env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

/// Pure form of [`data_root`] with the override made explicit, for tests
/// and callers that manage their own configuration.
pub fn data_root_from(override_dir: Option<PathBuf>) -> Result<PathBuf, PathError> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("bunbox"))
}

/// The directory holding the managed Bun executable and its manifest.
///
/// Temporary release archives are downloaded into this directory too, so
/// that cache clearing has a single place to sweep.
pub fn vendor_dir() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("vendor").join("bun"))
}

/// The local filename of the Bun executable for the build target.
pub const fn binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "bun.exe"
    }

    #[cfg(not(target_os = "windows"))]
    {
        "bun"
    }
}

/// Get the path to the managed Bun binary.
pub fn bun_binary_path() -> Result<PathBuf, PathError> {
    Ok(vendor_dir()?.join(binary_name()))
}

/// Get the path to the install manifest.
pub fn manifest_path() -> Result<PathBuf, PathError> {
    Ok(vendor_dir()?.join(MANIFEST_FILE))
}

/// The project-local binstub path, relative to the host project root.
///
/// A binstub at this location always takes precedence over the managed
/// binary. The path is deliberately relative: it is resolved against the
/// current working directory at every invocation, so a long-lived host
/// observes binstubs added or removed while it runs.
pub fn binstub_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        PathBuf::from("bin").join("bun.cmd")
    }

    #[cfg(not(target_os = "windows"))]
    {
        PathBuf::from("bin").join("bun")
    }
}

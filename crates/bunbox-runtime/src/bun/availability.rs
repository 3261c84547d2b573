//! Managed binary availability checking and path resolution.
//!
//! This module provides centralized logic for resolving the managed Bun
//! binary path with support for an explicit override and validation of
//! the resolved candidate.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the managed binary path.
pub const BUN_PATH_ENV: &str = "BUNBOX_BUN_PATH";

/// Errors that can occur when resolving or validating the managed binary.
#[derive(Debug, Error)]
pub enum BunAvailabilityError {
    /// The binary was not found at the expected location.
    #[error("Bun binary not found at: {path}\n\nPlease vendor Bun by running:\n  bunbox install")]
    NotFound {
        /// The path where the binary was expected
        path: PathBuf,
    },

    /// The binary exists but is not executable (permission denied).
    #[error(
        "Bun binary exists but is not executable: {path}\n\nPlease check file permissions or reinstall with:\n  bunbox install"
    )]
    NotExecutable {
        /// The path to the non-executable binary
        path: PathBuf,
    },

    /// The binary exists but permission was denied when trying to access it.
    #[error("Permission denied accessing Bun binary: {path}\n\nPlease check file permissions.")]
    PermissionDenied {
        /// The path to the inaccessible binary
        path: PathBuf,
    },

    /// Failed to resolve the path (e.g. data directory not available).
    #[error("Failed to resolve Bun binary path: {0}")]
    PathResolution(String),
}

/// Result type for availability operations.
pub type BunAvailabilityResult<T> = Result<T, BunAvailabilityError>;

/// Resolve the managed Bun binary path with validation.
///
/// Precedence:
/// 1. `BUNBOX_BUN_PATH` environment variable (explicit override)
/// 2. Default path from `bunbox_core::paths::bun_binary_path()`
///
/// The resolved candidate must exist and carry an execute permission bit.
pub fn resolve_bun() -> BunAvailabilityResult<PathBuf> {
    if let Ok(env_path) = std::env::var(BUN_PATH_ENV) {
        let path = PathBuf::from(env_path);
        return validate_candidate(&path);
    }

    let default_path = bunbox_core::paths::bun_binary_path()
        .map_err(|e| BunAvailabilityError::PathResolution(e.to_string()))?;

    validate_candidate(&default_path)
}

/// Validate that a binary exists and is executable.
fn validate_candidate(path: &Path) -> BunAvailabilityResult<PathBuf> {
    if !path.exists() {
        return Err(BunAvailabilityError::NotFound {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(metadata) => {
                let mode = metadata.permissions().mode();
                if mode & 0o111 == 0 {
                    return Err(BunAvailabilityError::NotExecutable {
                        path: path.to_path_buf(),
                    });
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(BunAvailabilityError::PermissionDenied {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(BunAvailabilityError::PathResolution(format!(
                    "Failed to read metadata for {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_candidate_is_not_found() {
        let nonexistent = PathBuf::from("/nonexistent/path/to/bun");
        let result = validate_candidate(&nonexistent);
        assert!(matches!(result, Err(BunAvailabilityError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_candidate_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bun");
        std::fs::write(&path, b"#!binary").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = validate_candidate(&path);
        assert!(matches!(
            result,
            Err(BunAvailabilityError::NotExecutable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn executable_candidate_resolves() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bun");
        std::fs::write(&path, b"#!binary").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(validate_candidate(&path).unwrap(), path);
    }

    #[test]
    fn error_messages_include_install_instructions() {
        let err = validate_candidate(&PathBuf::from("/nonexistent/bun")).unwrap_err();
        assert!(err.to_string().contains("bunbox install"));
    }
}

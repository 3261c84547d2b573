//! Error types for Bun binary management.
//!
//! This module provides a unified error type for acquisition operations,
//! keeping error plumbing out of orchestration modules.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while acquiring or clearing the managed binary.
#[derive(Debug, Error)]
pub enum BunError {
    // === Download ===
    /// Failed to fetch release information from GitHub
    #[error("Failed to fetch release from GitHub: {0}")]
    ReleaseFetchFailed(String),

    /// Failed to download the release archive
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// The archive did not contain the expected executable entry
    #[error("Archive {archive} has no entry named '{expected}'")]
    ArchiveEntryMissing { archive: PathBuf, expected: String },

    /// Failed to extract the archive
    #[error("Failed to extract archive: {0}")]
    ExtractionFailed(String),

    // === Platform, Path & IO ===
    /// Platform resolution failed
    #[error("Platform error: {0}")]
    Platform(#[from] bunbox_core::platform::PlatformError),

    /// Path resolution failed
    #[error("Path error: {0}")]
    Path(#[from] bunbox_core::paths::PathError),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Bun management operations
pub type BunResult<T> = Result<T, BunError>;

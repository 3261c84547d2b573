//! Managed Bun binary lifecycle.
//!
//! This module provides all acquisition-related functionality:
//! - Upstream release lookup (latest version, archive naming)
//! - Streamed archive download and single-entry extraction
//! - Idempotent installation and cache clearing
//! - Binary validation and status checking

// === Submodules ===

mod availability;
mod download;
pub mod error;
mod install;
mod release;
mod validate;

// === Public API (facade) ===

// Error types
pub use error::{BunError, BunResult};

// Availability
pub use availability::{BUN_PATH_ENV, BunAvailabilityError, BunAvailabilityResult, resolve_bun};

// Acquisition
pub use download::ProgressCallback;
pub use install::{BunArtifact, InstallManifest, Installer};

// Release metadata
pub use release::{BUN_REPO, archive_name, download_url, fetch_latest_version, version_from_tag};

// Validation and status
pub use validate::{handle_status, installed_version, validate_bun_binary};

//! Path utilities for the bunbox cache and user-configurable locations.
//!
//! This module provides the canonical path resolution for all bunbox
//! components:
//! - Cache root and vendor directory for the managed binary
//! - Managed executable and install-manifest locations
//! - Project-local binstub convention
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - Environment overrides are resolved here, nowhere else

mod bun;
mod ensure;
mod error;

// Error type
pub use error::PathError;

// Cache layout
pub use bun::{
    DATA_DIR_ENV, MANIFEST_FILE, binary_name, binstub_path, bun_binary_path, data_root,
    data_root_from, manifest_path, vendor_dir,
};

// Directory operations
pub use ensure::ensure_directory;

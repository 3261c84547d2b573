//! Process-wide `PATH` prepending for the managed binary's directory.
//!
//! Putting the vendor directory first on `PATH` lets tools that already
//! know how to find a `bun` executable pick up the managed one without
//! being patched. This only helps once bunbox itself is loaded, so the
//! integration registry still exists for tools that resolve earlier.

use std::env;
use std::path::Path;

/// The environment variable being rewritten.
const PATH_VAR: &str = "PATH";

/// Idempotent `PATH` prepending.
pub struct EnvPath;

impl EnvPath {
    /// The current process search path.
    pub fn current() -> String {
        env::var(PATH_VAR).unwrap_or_default()
    }

    /// The `PATH` list separator for the current platform.
    pub const fn separator() -> char {
        if cfg!(target_os = "windows") { ';' } else { ':' }
    }

    /// Prepend a directory to the process `PATH`.
    ///
    /// Returns `None` for an empty directory (a no-op), otherwise the
    /// resulting search path. Calling this twice with the same directory
    /// leaves the path unchanged after the first call.
    pub fn prepend(new_dir: &Path) -> Option<String> {
        let new_dir = new_dir.to_str()?;
        if new_dir.is_empty() {
            return None;
        }

        let current = Self::current();
        match prepend_onto(&current, new_dir, cfg!(target_os = "windows")) {
            Some(updated) => {
                env::set_var(PATH_VAR, &updated);
                Some(updated)
            }
            None => Some(current),
        }
    }
}

/// Pure core of [`EnvPath::prepend`].
///
/// Returns the rewritten path, or `None` when `current` already starts
/// with `new_dir`. The "already present" comparison is case-insensitive on
/// the Windows family and case-sensitive elsewhere, matching each family's
/// filesystem conventions.
fn prepend_onto(current: &str, new_dir: &str, windows: bool) -> Option<String> {
    let already_present = if windows {
        current.to_lowercase().starts_with(&new_dir.to_lowercase())
    } else {
        current.starts_with(new_dir)
    };

    if already_present {
        None
    } else {
        let separator = if windows { ';' } else { ':' };
        Some(format!("{new_dir}{separator}{current}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_with_platform_separator() {
        assert_eq!(
            prepend_onto("/usr/bin:/bin", "/opt/bun", false),
            Some("/opt/bun:/usr/bin:/bin".to_string())
        );
        assert_eq!(
            prepend_onto("C:\\Windows", "C:\\Bun", true),
            Some("C:\\Bun;C:\\Windows".to_string())
        );
    }

    #[test]
    fn is_idempotent() {
        let first = prepend_onto("/usr/bin", "/opt/bun", false).unwrap();
        // Second application sees the directory in front and changes nothing.
        assert_eq!(prepend_onto(&first, "/opt/bun", false), None);
    }

    #[test]
    fn windows_family_compares_case_insensitively() {
        assert_eq!(prepend_onto("/Opt/Bin;C:\\Windows", "/opt/bin", true), None);
    }

    #[test]
    fn other_families_compare_case_sensitively() {
        // Same strings as above, but a case-sensitive family treats them
        // as distinct directories.
        let updated = prepend_onto("/Opt/Bin:/usr/bin", "/opt/bin", false).unwrap();
        assert_eq!(updated, "/opt/bin:/Opt/Bin:/usr/bin");
    }

    #[test]
    fn empty_path_still_gains_the_directory() {
        assert_eq!(
            prepend_onto("", "/opt/bun", false),
            Some("/opt/bun:".to_string())
        );
    }

    #[test]
    fn empty_directory_is_a_no_op() {
        assert_eq!(EnvPath::prepend(Path::new("")), None);
    }
}

//! Directory creation helpers.

use std::fs;
use std::path::Path;

use super::error::PathError;

/// Ensure a directory exists, creating it (and its parents) if needed.
///
/// Fails if the path exists but is not a directory.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());

        // Idempotent on an existing directory.
        ensure_directory(&nested).unwrap();
    }

    #[test]
    fn rejects_files_posing_as_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("occupied");
        fs::write(&file, b"data").unwrap();

        let err = ensure_directory(&file).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }
}

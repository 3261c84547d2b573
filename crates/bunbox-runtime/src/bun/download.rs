//! Archive download and extraction for the managed Bun binary.
//!
//! Downloads are streamed to disk; extraction pulls exactly one entry out
//! of the archive, the executable itself. Upstream archives nest the
//! binary inside a platform-named directory (`bun-linux-x64/bun`), so
//! entries are matched on their final path component.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;

use super::error::{BunError, BunResult};

/// Progress callback type for archive downloads.
/// Called with (`downloaded_bytes`, `total_bytes`).
pub type ProgressCallback<'a> = &'a dyn Fn(u64, u64);

const USER_AGENT: &str = "bunbox";

/// Download a file, streaming chunks to `dest` and reporting progress.
pub(super) async fn download_archive(
    client: &Client,
    url: &str,
    dest: &Path,
    callback: Option<ProgressCallback<'_>>,
) -> BunResult<()> {
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| BunError::DownloadFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BunError::DownloadFailed(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(dest)?;
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| BunError::DownloadFailed(e.to_string()))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;

        if let Some(cb) = callback {
            cb(downloaded, total_size);
        }
    }

    Ok(())
}

/// Extract the single entry named `executable` from `zip_path` to `dest`
/// and mark it executable.
///
/// Everything else in the archive is ignored; a missing entry means the
/// archive is corrupt or built for another platform.
pub(super) fn extract_executable(zip_path: &Path, dest: &Path, executable: &str) -> BunResult<()> {
    let file = File::open(zip_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| BunError::ExtractionFailed(e.to_string()))?;

    let mut index = None;
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| BunError::ExtractionFailed(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let file_name = entry.name().rsplit('/').next().unwrap_or("");
        if file_name == executable {
            index = Some(i);
            break;
        }
    }

    let Some(index) = index else {
        return Err(BunError::ArchiveEntryMissing {
            archive: zip_path.to_path_buf(),
            expected: executable.to_string(),
        });
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|e| BunError::ExtractionFailed(e.to_string()))?;
    let mut out = File::create(dest)?;
    io::copy(&mut entry, &mut out).map_err(|e| BunError::ExtractionFailed(e.to_string()))?;
    drop(out);

    set_executable(dest)?;

    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> BunResult<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> BunResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_exactly_the_executable_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("bun-linux-x64.zip");
        write_archive(
            &archive,
            &[
                ("bun-linux-x64/LICENSE", b"license text".as_slice()),
                ("bun-linux-x64/bun", b"#!binary".as_slice()),
            ],
        );

        let dest = tmp.path().join("bun");
        extract_executable(&archive, &dest, "bun").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"#!binary");
        // Nothing else was extracted.
        assert!(!tmp.path().join("LICENSE").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn missing_entry_is_a_distinct_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("bun-linux-x64.zip");
        write_archive(&archive, &[("bun-linux-x64/README.md", b"docs".as_slice())]);

        let dest = tmp.path().join("bun");
        let err = extract_executable(&archive, &dest, "bun").unwrap_err();
        assert!(matches!(err, BunError::ArchiveEntryMissing { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn matches_on_final_path_component_only() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("bun-windows-x64-baseline.zip");
        write_archive(
            &archive,
            &[
                // A directory sharing the executable's stem must not match.
                ("bun-windows-x64-baseline/bun.exe.d/notes", b"x".as_slice()),
                ("bun-windows-x64-baseline/bun.exe", b"MZ".as_slice()),
            ],
        );

        let dest = tmp.path().join("bun.exe");
        extract_executable(&archive, &dest, "bun.exe").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"MZ");
    }
}

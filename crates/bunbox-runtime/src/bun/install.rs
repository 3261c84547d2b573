//! Idempotent acquisition of the managed Bun binary.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use bunbox_core::paths::{self, MANIFEST_FILE};
use bunbox_core::platform::{self, PlatformMapping};

use super::download::{ProgressCallback, download_archive, extract_executable};
use super::error::{BunError, BunResult};
use super::release::{self, fetch_latest_version};

/// On-disk state of the managed executable after an acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BunArtifact {
    /// Version of the vendored binary. `None` when an existing binary was
    /// found without a readable manifest.
    pub version: Option<String>,
    /// Upstream platform tag the binary was built for.
    pub platform_tag: String,
    /// Directory holding the binary and its manifest.
    pub cache_dir: PathBuf,
    /// Full path of the executable.
    pub executable_path: PathBuf,
    /// Whether this call performed a download, or found the binary in place.
    pub freshly_downloaded: bool,
}

/// Install manifest written next to the managed binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallManifest {
    pub version: String,
    pub platform: String,
    pub installed_at: String,
}

impl InstallManifest {
    /// Load the manifest from a cache directory.
    ///
    /// An unreadable or malformed manifest is treated as absent; the binary
    /// on disk is authoritative, the manifest is bookkeeping.
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let path = cache_dir.join(MANIFEST_FILE);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed install manifest");
                None
            }
        }
    }

    fn write(&self, cache_dir: &Path) -> BunResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BunError::ExtractionFailed(e.to_string()))?;
        fs::write(cache_dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }
}

/// Downloads and caches the platform-specific Bun binary.
///
/// The installer is idempotent: if the destination executable already
/// exists, `acquire` returns without touching the network. The version to
/// install is either pinned at construction or resolved once per installer
/// instance from the latest upstream release.
///
/// The cache directory is shared, single-writer state. Nothing here guards
/// against two processes populating it concurrently; callers that need
/// that guarantee must lock around `acquire` themselves.
pub struct Installer {
    client: Client,
    cache_dir: PathBuf,
    pinned_version: Option<String>,
    latest_version: OnceCell<String>,
}

impl Installer {
    /// Create an installer targeting the default vendor directory.
    pub fn new() -> BunResult<Self> {
        Ok(Self::with_cache_dir(paths::vendor_dir()?))
    }

    /// Create an installer targeting an explicit cache directory.
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            client: Client::new(),
            cache_dir,
            pinned_version: None,
            latest_version: OnceCell::new(),
        }
    }

    /// Pin the version to install instead of resolving the latest release.
    #[must_use]
    pub fn pin_version(mut self, version: impl Into<String>) -> Self {
        self.pinned_version = Some(version.into());
        self
    }

    /// The cache directory this installer manages.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The version this installer will vendor: the pinned version, or the
    /// latest upstream release, fetched once per installer instance.
    pub async fn version(&self) -> BunResult<String> {
        if let Some(version) = &self.pinned_version {
            return Ok(version.clone());
        }
        let version = self
            .latest_version
            .get_or_try_init(|| fetch_latest_version(&self.client))
            .await?;
        Ok(version.clone())
    }

    /// Acquire the binary for the current host platform.
    pub async fn acquire(&self) -> BunResult<BunArtifact> {
        self.acquire_mapping(platform::resolve_host()?, None).await
    }

    /// Acquire the binary for the current host platform, reporting
    /// download progress.
    pub async fn acquire_with_progress(
        &self,
        progress: ProgressCallback<'_>,
    ) -> BunResult<BunArtifact> {
        self.acquire_mapping(platform::resolve_host()?, Some(progress))
            .await
    }

    /// Acquire the binary for an explicitly named platform.
    ///
    /// Used when vendoring for a platform other than the build host.
    pub async fn acquire_for(&self, raw_platform: &str) -> BunResult<BunArtifact> {
        self.acquire_mapping(platform::resolve(raw_platform)?, None)
            .await
    }

    async fn acquire_mapping(
        &self,
        mapping: &'static PlatformMapping,
        progress: Option<ProgressCallback<'_>>,
    ) -> BunResult<BunArtifact> {
        let executable_path = self.cache_dir.join(mapping.executable);

        // Existence is re-checked on every call rather than cached: the
        // cache directory can change out-of-band between invocations.
        if executable_path.exists() {
            debug!(path = %executable_path.display(), "binary already vendored");
            return Ok(BunArtifact {
                version: InstallManifest::load(&self.cache_dir).map(|m| m.version),
                platform_tag: mapping.release_tag.to_string(),
                cache_dir: self.cache_dir.clone(),
                executable_path,
                freshly_downloaded: false,
            });
        }

        let version = self.version().await?;
        paths::ensure_directory(&self.cache_dir)?;

        let archive_path = self.cache_dir.join(release::archive_name(mapping.release_tag));
        let url = release::download_url(&version, mapping.release_tag);
        debug!(url = %url, "downloading release archive");
        download_archive(&self.client, &url, &archive_path, progress).await?;

        let extracted = extract_executable(&archive_path, &executable_path, mapping.executable);
        // The archive is transient state: removed whether or not extraction
        // succeeded, so a failed install never leaves a stale download.
        if let Err(e) = fs::remove_file(&archive_path) {
            warn!(path = %archive_path.display(), error = %e, "could not remove downloaded archive");
        }
        extracted?;

        let manifest = InstallManifest {
            version: version.clone(),
            platform: mapping.release_tag.to_string(),
            installed_at: Utc::now().to_rfc3339(),
        };
        manifest.write(&self.cache_dir)?;

        Ok(BunArtifact {
            version: Some(version),
            platform_tag: mapping.release_tag.to_string(),
            cache_dir: self.cache_dir.clone(),
            executable_path,
            freshly_downloaded: true,
        })
    }

    /// The manifest for the current cache contents, if one exists.
    pub fn manifest(&self) -> Option<InstallManifest> {
        InstallManifest::load(&self.cache_dir)
    }

    /// Remove the vendored binary and any stale downloads.
    ///
    /// Deletes only files bunbox manages: the executable under any
    /// platform's name, release archives, and the install manifest.
    /// Unrelated files sharing the directory are left untouched.
    ///
    /// Returns the paths that were removed.
    pub fn clear(&self) -> BunResult<Vec<PathBuf>> {
        let mut removed = Vec::new();

        if !self.cache_dir.exists() {
            return Ok(removed);
        }

        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if is_managed_file(name) {
                let path = entry.path();
                fs::remove_file(&path)?;
                removed.push(path);
            }
        }

        Ok(removed)
    }
}

/// Whether a cache-directory filename belongs to bunbox.
fn is_managed_file(name: &str) -> bool {
    name == "bun"
        || name == "bun.exe"
        || name == MANIFEST_FILE
        || (name.starts_with("bun") && name.ends_with(".zip"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_mapping() -> &'static PlatformMapping {
        platform::resolve("x86_64-linux").unwrap()
    }

    #[tokio::test]
    async fn acquire_is_a_no_op_when_binary_exists() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bun"), b"#!binary").unwrap();

        // No pinned version: a download attempt would have to hit the
        // network for version resolution, which this test environment
        // would turn into an error. The early return must win first.
        let installer = Installer::with_cache_dir(tmp.path().to_path_buf());
        let artifact = installer
            .acquire_mapping(linux_mapping(), None)
            .await
            .unwrap();

        assert!(!artifact.freshly_downloaded);
        assert_eq!(artifact.executable_path, tmp.path().join("bun"));
        assert_eq!(artifact.platform_tag, "linux-x64");
        // Without a manifest the version is unknown, not invented.
        assert_eq!(artifact.version, None);
    }

    #[tokio::test]
    async fn acquire_reports_manifest_version_for_existing_binary() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bun"), b"#!binary").unwrap();
        let manifest = InstallManifest {
            version: "1.1.38".to_string(),
            platform: "linux-x64".to_string(),
            installed_at: Utc::now().to_rfc3339(),
        };
        manifest.write(tmp.path()).unwrap();

        let installer = Installer::with_cache_dir(tmp.path().to_path_buf());
        let artifact = installer
            .acquire_mapping(linux_mapping(), None)
            .await
            .unwrap();

        assert_eq!(artifact.version.as_deref(), Some("1.1.38"));
    }

    #[tokio::test]
    async fn pinned_version_needs_no_network() {
        let installer =
            Installer::with_cache_dir(PathBuf::from("/nonexistent")).pin_version("1.1.38");
        assert_eq!(installer.version().await.unwrap(), "1.1.38");
    }

    #[test]
    fn clear_removes_only_managed_files() {
        let tmp = tempfile::tempdir().unwrap();
        for name in [
            "bun",
            "bun.exe",
            "bun-linux-x64.zip",
            "bun-install.json",
            "unrelated.txt",
        ] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let installer = Installer::with_cache_dir(tmp.path().to_path_buf());
        let mut removed: Vec<String> = installer
            .clear()
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        removed.sort();

        assert_eq!(
            removed,
            vec!["bun", "bun-install.json", "bun-linux-x64.zip", "bun.exe"]
        );
        assert!(tmp.path().join("unrelated.txt").exists());
    }

    #[test]
    fn clear_on_missing_directory_is_harmless() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = Installer::with_cache_dir(tmp.path().join("never-created"));
        assert!(installer.clear().unwrap().is_empty());
    }

    #[test]
    fn managed_file_patterns() {
        assert!(is_managed_file("bun"));
        assert!(is_managed_file("bun.exe"));
        assert!(is_managed_file("bun-windows-x64-baseline.zip"));
        assert!(is_managed_file("bun-install.json"));
        assert!(!is_managed_file("bundle.zip.bak"));
        assert!(!is_managed_file("notes.txt"));
        assert!(!is_managed_file("bunfig.toml"));
    }

    #[test]
    fn malformed_manifest_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), b"not json").unwrap();
        assert!(InstallManifest::load(tmp.path()).is_none());
    }
}

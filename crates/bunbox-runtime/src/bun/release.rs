//! Upstream release lookup for the Bun runtime.
//!
//! Bun tags its GitHub releases `bun-v<version>` and attaches one archive
//! per platform named `bun-<platform-tag>.zip`. This module knows that
//! naming scheme and nothing else about the archives.

use reqwest::Client;
use serde::Deserialize;

use super::error::{BunError, BunResult};

/// GitHub repository the Bun runtime is released from.
pub const BUN_REPO: &str = "oven-sh/bun";

/// Prefix Bun puts in front of the version in its release tags.
const TAG_PREFIX: &str = "bun-v";

const USER_AGENT: &str = "bunbox";

/// GitHub API response for a release
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
}

/// Fetch the latest released Bun version, without the tag prefix.
pub async fn fetch_latest_version(client: &Client) -> BunResult<String> {
    let url = format!("https://api.github.com/repos/{BUN_REPO}/releases/latest");

    let response = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github.v3+json")
        .send()
        .await
        .map_err(|e| BunError::ReleaseFetchFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BunError::ReleaseFetchFailed(format!(
            "GitHub API returned {}",
            response.status()
        )));
    }

    let release: GitHubRelease = response
        .json()
        .await
        .map_err(|e| BunError::ReleaseFetchFailed(e.to_string()))?;

    Ok(version_from_tag(&release.tag_name))
}

/// Strip the release-tag prefix, leaving the bare version.
pub fn version_from_tag(tag: &str) -> String {
    tag.strip_prefix(TAG_PREFIX).unwrap_or(tag).to_string()
}

/// Archive filename for a platform tag.
pub fn archive_name(platform_tag: &str) -> String {
    format!("bun-{platform_tag}.zip")
}

/// Download URL for a version and platform tag.
pub fn download_url(version: &str, platform_tag: &str) -> String {
    format!(
        "https://github.com/{BUN_REPO}/releases/download/{TAG_PREFIX}{version}/{}",
        archive_name(platform_tag)
    )
}

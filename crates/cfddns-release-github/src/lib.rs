// # GitHub Release Source
//
// Implements `ReleaseSource` on top of GitHub Releases.
//
// ## Release layout
//
// A release carries one raw binary per platform, named
// `<bin>_<os>_<arch>` (`.exe` on Windows), plus a `SHA256SUMS` file in
// `sha256sum` format. Platform names follow Go conventions
// (`darwin`, `amd64`, `arm64`, ...). Archived assets are not supported.
//
// ## Install
//
// 1. Pick the asset for the running platform
// 2. Download it and `SHA256SUMS`; refuse on checksum mismatch
// 3. Write it next to the running executable and swap it in place

use async_trait::async_trait;
use cfddns_core::traits::{Release, ReleaseAsset, ReleaseSource};
use cfddns_core::upgrade::parse_version;
use cfddns_core::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// GitHub REST API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Name of the checksum file attached to each release
pub const CHECKSUM_FILE: &str = "SHA256SUMS";

/// HTTP timeout for API requests and downloads
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
}

/// The running platform in Go naming (`linux`/`amd64`, `darwin`/`arm64`, ...)
pub fn platform() -> (&'static str, &'static str) {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    };
    (os, arch)
}

/// Find the binary asset for `bin` on `os`/`arch`
///
/// Accepts `<bin>_<os>_<arch>` and names carrying a version or other tag
/// between the binary and the platform (`<bin>_2025.3.1_<os>_<arch>`),
/// with `.exe` on Windows.
pub fn select_asset<'a>(release: &'a Release, bin: &str, os: &str, arch: &str) -> Option<&'a ReleaseAsset> {
    let prefix = format!("{}_", bin.to_ascii_lowercase());
    let platform = format!("{os}_{arch}");
    let suffix = format!("_{platform}");

    release.assets.iter().find(|asset| {
        let name = asset.name.to_ascii_lowercase();
        let name = match name.strip_suffix(".exe") {
            Some(stem) if os == "windows" => stem,
            _ => name.as_str(),
        };
        match name.strip_prefix(&prefix) {
            Some(rest) if rest == platform => true,
            Some(rest) => rest.strip_suffix(&suffix).is_some_and(|tag| !tag.is_empty()),
            None => false,
        }
    })
}

/// Look up the expected SHA-256 of `file` in a `sha256sum`-style listing
pub fn expected_checksum(sums: &str, file: &str) -> Option<String> {
    sums.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?.trim_start_matches('*');
        (name == file).then(|| digest.to_ascii_lowercase())
    })
}

/// Release channel backed by a GitHub repository
#[derive(Debug, Clone)]
pub struct GithubReleases {
    owner: String,
    repo: String,
    bin: String,
    api_base: String,
    client: reqwest::Client,
}

impl GithubReleases {
    /// Channel for `owner/repo`, whose binaries are named after `bin`
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, bin: impl Into<String>) -> Result<Self> {
        Self::with_api_base(owner, repo, bin, GITHUB_API_BASE)
    }

    /// Channel against a custom API base URL
    pub fn with_api_base(
        owner: impl Into<String>,
        repo: impl Into<String>,
        bin: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let bin = bin.into();
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(format!("{bin}-self-upgrade"))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            owner: owner.into(),
            repo: repo.into(),
            bin,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::upgrade(format!(
                "download of {url} failed: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("failed to read download: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Download the binary for `os`/`arch` and verify it against `SHA256SUMS`
    pub async fn download_verified(&self, release: &Release, os: &str, arch: &str) -> Result<Vec<u8>> {
        let asset = select_asset(release, &self.bin, os, arch).ok_or_else(|| {
            Error::upgrade(format!("no release asset for {os}/{arch} in {}", release.tag))
        })?;
        let sums_asset = release
            .assets
            .iter()
            .find(|a| a.name == CHECKSUM_FILE)
            .ok_or_else(|| Error::upgrade(format!("{CHECKSUM_FILE} not found in {}", release.tag)))?;

        let sums = self.download(&sums_asset.url).await?;
        let sums = String::from_utf8_lossy(&sums);
        let expected = expected_checksum(&sums, &asset.name).ok_or_else(|| {
            Error::upgrade(format!("no checksum for {} in {CHECKSUM_FILE}", asset.name))
        })?;

        debug!("Downloading {}", asset.url);
        let binary = self.download(&asset.url).await?;
        let actual = hex::encode(Sha256::digest(&binary));
        if actual != expected {
            return Err(Error::upgrade(format!(
                "checksum mismatch for {}: expected {expected}, got {actual}",
                asset.name
            )));
        }

        Ok(binary)
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn latest(&self) -> Result<Option<Release>> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, self.repo
        );
        debug!("Checking {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::http(format!("request failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(Error::upgrade(format!("release lookup failed: HTTP {status}")));
            }
            _ => {}
        }

        let release: GithubRelease = response
            .json()
            .await
            .map_err(|e| Error::upgrade(format!("failed to parse release: {e}")))?;

        Ok(Some(Release {
            version: parse_version(&release.tag_name)?,
            tag: release.tag_name,
            assets: release
                .assets
                .into_iter()
                .map(|a| ReleaseAsset {
                    name: a.name,
                    url: a.browser_download_url,
                })
                .collect(),
        }))
    }

    async fn install(&self, release: &Release) -> Result<PathBuf> {
        let (os, arch) = platform();
        let binary = self.download_verified(release, os, arch).await?;

        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| Error::upgrade(format!("{} has no parent directory", exe.display())))?;

        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(&binary)?;
        staged.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))?;
        }

        self_replace::self_replace(staged.path())?;
        info!("Replaced {} with {}", exe.display(), release.tag);
        Ok(exe)
    }
}

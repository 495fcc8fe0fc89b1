// # Release Source Trait
//
// Where self-upgrade looks for newer builds and how it installs them.
//
// ## Implementations
//
// - GitHub Releases: `cfddns-release-github` crate

use async_trait::async_trait;
use semver::Version;
use std::path::PathBuf;

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// File name (e.g., "cfddns_linux_amd64")
    pub name: String,
    /// Download URL
    pub url: String,
}

/// A published release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Parsed release version
    pub version: Version,
    /// Tag as published (e.g., "v2025.3.1")
    pub tag: String,
    /// Attached files
    pub assets: Vec<ReleaseAsset>,
}

/// Trait for release channels
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest published release
    ///
    /// Returns `Ok(None)` when the channel has no releases at all.
    async fn latest(&self) -> Result<Option<Release>, crate::Error>;

    /// Install `release` over the running executable
    ///
    /// Returns the path of the replaced executable.
    async fn install(&self, release: &Release) -> Result<PathBuf, crate::Error>;
}

//! Self-upgrade decision
//!
//! Compares the running version against the latest published release and
//! installs the release only when it is strictly newer.

use crate::error::{Error, Result};
use crate::traits::ReleaseSource;
pub use semver::Version;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a self-upgrade attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The running version is the latest (or newer)
    AlreadyLatest {
        current: Version,
        latest: Version,
    },

    /// A newer release was installed
    Upgraded {
        from: Version,
        to: Version,
        /// The replaced executable
        path: PathBuf,
    },
}

impl UpgradeOutcome {
    pub fn upgraded(&self) -> bool {
        matches!(self, Self::Upgraded { .. })
    }
}

impl fmt::Display for UpgradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLatest { .. } => write!(f, "Already on latest release"),
            Self::Upgraded { to, .. } => write!(f, "Updated to version {to}"),
        }
    }
}

/// Parse a version string, ignoring a leading `v`
pub fn parse_version(text: &str) -> Result<Version> {
    let text = text.trim();
    let text = text.strip_prefix('v').unwrap_or(text);
    Version::parse(text).map_err(|e| Error::upgrade(format!("invalid version {text:?}: {e}")))
}

/// Upgrade the running executable if `source` has a newer release
///
/// # Errors
///
/// - the running version does not parse
/// - the source has no releases at all
/// - fetching or installing the release fails
pub async fn self_upgrade(current: &str, source: &dyn ReleaseSource) -> Result<UpgradeOutcome> {
    let current = parse_version(current)?;

    let release = source
        .latest()
        .await?
        .ok_or_else(|| Error::upgrade("no releases found"))?;
    debug!("Latest release {} ({})", release.version, release.tag);

    if release.version <= current {
        return Ok(UpgradeOutcome::AlreadyLatest {
            current,
            latest: release.version,
        });
    }

    info!("Upgrading from {} to {}", current, release.version);
    let path = source.install(&release).await?;

    Ok(UpgradeOutcome::Upgraded {
        from: current,
        to: release.version,
        path,
    })
}

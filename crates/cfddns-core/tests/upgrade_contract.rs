//! Contract Test: Self-Upgrade
//!
//! - An older running version installs the latest release
//! - A newer or equal running version installs nothing and is not an error
//! - A channel without releases is an error

mod common;

use cfddns_core::{Error, UpgradeOutcome, self_upgrade};
use common::*;

#[tokio::test]
async fn older_version_upgrades() {
    let source = ScriptedReleaseSource::with_latest("v2025.3.1");

    let outcome = self_upgrade("2015.1.1", &source).await.unwrap();

    assert!(outcome.upgraded());
    assert_eq!(outcome.to_string(), "Updated to version 2025.3.1");
    assert_eq!(source.installs(), vec!["v2025.3.1".to_string()]);
}

#[tokio::test]
async fn newer_version_does_not_upgrade() {
    let source = ScriptedReleaseSource::with_latest("v2025.3.1");

    let outcome = self_upgrade("2035.1.1", &source).await.unwrap();

    assert!(matches!(outcome, UpgradeOutcome::AlreadyLatest { .. }));
    assert!(source.installs().is_empty());
}

#[tokio::test]
async fn equal_version_does_not_upgrade() {
    let source = ScriptedReleaseSource::with_latest("v2025.3.1");

    let outcome = self_upgrade("2025.3.1", &source).await.unwrap();

    assert!(!outcome.upgraded());
    assert!(source.installs().is_empty());
}

#[tokio::test]
async fn dev_build_upgrades_to_release() {
    let source = ScriptedReleaseSource::with_latest("v2025.3.1");

    let outcome = self_upgrade("2025.3.1-dev", &source).await.unwrap();
    assert!(outcome.upgraded());
}

#[tokio::test]
async fn no_releases_is_an_error() {
    let result = self_upgrade("2025.3.1", &ScriptedReleaseSource::empty()).await;

    match result {
        Err(Error::Upgrade(message)) => assert_eq!(message, "no releases found"),
        other => panic!("expected Upgrade error, got {other:?}"),
    }
}

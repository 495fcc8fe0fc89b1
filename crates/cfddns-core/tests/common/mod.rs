//! Test doubles shared by the contract tests
//!
//! In-memory stand-ins for the provider, IP source and release channel,
//! with call counters so tests can assert what was (not) called.

#![allow(dead_code)]

use async_trait::async_trait;
use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, DnsRecord, IpSource, Release, ReleaseSource, Zone};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory DNS provider
///
/// Clones share state and counters, so a test can keep one handle and give
/// the engine another.
#[derive(Clone, Default)]
pub struct FakeProvider {
    zones: Arc<Mutex<Vec<Zone>>>,
    records: Arc<Mutex<Vec<DnsRecord>>>,
    fail_edit: Arc<Mutex<Option<String>>>,
    find_zone_calls: Arc<AtomicUsize>,
    find_record_calls: Arc<AtomicUsize>,
    edit_calls: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone
    pub fn with_zone(self, id: &str, name: &str) -> Self {
        self.zones.lock().unwrap().push(Zone {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Add an A record
    pub fn with_record(self, zone_id: &str, id: &str, name: &str, content: &str, ttl: u32) -> Self {
        self.records.lock().unwrap().push(a_record(zone_id, id, name, content, ttl));
        self
    }

    /// Make every edit fail with `message`
    pub fn failing_edits(self, message: &str) -> Self {
        *self.fail_edit.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn find_zone_calls(&self) -> usize {
        self.find_zone_calls.load(Ordering::SeqCst)
    }

    pub fn find_record_calls(&self) -> usize {
        self.find_record_calls.load(Ordering::SeqCst)
    }

    pub fn edit_calls(&self) -> usize {
        self.edit_calls.load(Ordering::SeqCst)
    }

    /// Current content of a record, by name
    pub fn content_of(&self, name: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.content.clone())
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn find_zone(&self, name: &str) -> Result<Zone> {
        self.find_zone_calls.fetch_add(1, Ordering::SeqCst);
        self.zones
            .lock()
            .unwrap()
            .iter()
            .find(|z| z.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("zone {name}")))
    }

    async fn find_record(&self, zone_id: &str, name: &str) -> Result<DnsRecord> {
        self.find_record_calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.zone_id.as_deref() == Some(zone_id) && r.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record {name}")))
    }

    async fn edit_record(&self, zone_id: &str, record_id: &str, content: Ipv4Addr) -> Result<DnsRecord> {
        self.edit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_edit.lock().unwrap().clone() {
            return Err(Error::provider("fake", message));
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.zone_id.as_deref() == Some(zone_id) && r.id == record_id)
            .ok_or_else(|| Error::not_found(format!("record {record_id}")))?;
        record.content = content.to_string();
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

pub fn a_record(zone_id: &str, id: &str, name: &str, content: &str, ttl: u32) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        zone_id: Some(zone_id.to_string()),
        name: name.to_string(),
        record_type: "A".to_string(),
        content: content.to_string(),
        ttl,
        extra: serde_json::Map::new(),
    }
}

/// An IP source that always returns the same address
#[derive(Clone)]
pub struct FixedIpSource {
    ip: Ipv4Addr,
    calls: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for FixedIpSource {
    async fn discover(&self) -> Result<Ipv4Addr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// An IP source whose endpoints are all down
pub struct ExhaustedIpSource;

#[async_trait]
impl IpSource for ExhaustedIpSource {
    async fn discover(&self) -> Result<Ipv4Addr> {
        Err(Error::IpDiscoveryExhausted)
    }
}

/// A release channel with a fixed latest release
#[derive(Clone, Default)]
pub struct ScriptedReleaseSource {
    latest: Option<Release>,
    installs: Arc<Mutex<Vec<String>>>,
}

impl ScriptedReleaseSource {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_latest(tag: &str) -> Self {
        let version = cfddns_core::upgrade::parse_version(tag).unwrap();
        Self {
            latest: Some(Release {
                version,
                tag: tag.to_string(),
                assets: Vec::new(),
            }),
            installs: Arc::default(),
        }
    }

    /// Tags installed so far
    pub fn installs(&self) -> Vec<String> {
        self.installs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseSource for ScriptedReleaseSource {
    async fn latest(&self) -> Result<Option<Release>> {
        Ok(self.latest.clone())
    }

    async fn install(&self, release: &Release) -> Result<PathBuf> {
        self.installs.lock().unwrap().push(release.tag.clone());
        Ok(PathBuf::from("/usr/local/bin/cfddns"))
    }
}

// # DNS Provider Trait
//
// The capability interface the update engine consumes. Providers only look
// things up and write what they are told; deciding *whether* to write is
// owned by `UpdateEngine`.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
// - Tests: in-memory fakes in `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::DnsProvider;
//
// let zone = provider.find_zone("example.com").await?;
// let record = provider.find_record(&zone.id, "host.example.com").await?;
// let updated = provider
//     .edit_record(&zone.id, &record.id, "203.0.113.7".parse()?)
//     .await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A DNS zone as known to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone ID
    pub id: String,
    /// Zone name (e.g., "example.com")
    pub name: String,
}

/// A DNS record as returned by the provider
///
/// Fields the engine does not use are kept in `extra` so the verbose dump
/// shows the record exactly as the provider reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID
    pub id: String,

    /// Owning zone ID, when the provider includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,

    /// Fully-qualified record name
    pub name: String,

    /// Record type, always "A" for records this tool manages
    #[serde(rename = "type")]
    pub record_type: String,

    /// Current record content (the IP address as text)
    pub content: String,

    /// Time-to-live in seconds; 0 or 1 means provider default ("auto")
    #[serde(default)]
    pub ttl: u32,

    /// Any additional provider-specific fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - One remote call per method, no retries, no caching between calls
/// - Zero matches is an error (`Error::NotFound`), never an empty success
/// - `edit_record` returns the record as it exists after the edit
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Find a zone by exact name
    async fn find_zone(&self, name: &str) -> Result<Zone, crate::Error>;

    /// Find an A record by exact name within a zone
    async fn find_record(&self, zone_id: &str, name: &str) -> Result<DnsRecord, crate::Error>;

    /// Replace the content of an A record
    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: Ipv4Addr,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

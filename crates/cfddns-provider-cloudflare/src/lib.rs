// # Cloudflare DNS Provider
//
// Implements `DnsProvider` against the Cloudflare API v4.
//
// - One HTTP request per trait call, no retry, no backoff, no caching
// - 10 second timeout on every request
// - Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - Cloudflare envelope errors (`success: false`) surfaced verbatim
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - An empty token is rejected at construction
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name.exact=...&type=A`
// - Edit DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use cfddns_core::traits::{DnsProvider, DnsRecord, Zone};
use cfddns_core::{Error, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// HTTP timeout for API requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Standard Cloudflare response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

fn describe(errors: &[ApiMessage]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a non-success HTTP status to an error
///
/// `what` names the object being looked up or edited, for 404s.
fn status_error(status: StatusCode, detail: &str, what: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "invalid API token or insufficient permissions (status {status})"
        )),
        404 => Error::not_found(what),
        429 => Error::rate_limited(format!("please retry later (status {status})")),
        500..=599 => Error::provider(
            "cloudflare",
            format!("server error (transient): {status} - {detail}"),
        ),
        _ => Error::provider("cloudflare", format!("{status} - {detail}")),
    }
}

/// Cloudflare DNS provider
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider against the public Cloudflare API
    ///
    /// `api_token` needs Zone:Read and DNS:Edit permissions.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a provider against a custom API base URL
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Send one authenticated request and unwrap the response envelope
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::http(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .map(|envelope| describe(&envelope.errors))
                .unwrap_or(body);
            return Err(status_error(status, &detail, what));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| Error::provider("cloudflare", format!("failed to parse response: {e}")))?;

        if !envelope.success {
            return Err(Error::provider("cloudflare", describe(&envelope.errors)));
        }

        envelope
            .result
            .ok_or_else(|| Error::provider("cloudflare", "response has no result"))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn find_zone(&self, name: &str) -> Result<Zone> {
        tracing::debug!("Looking up zone: {}", name);

        let request = self
            .client
            .get(format!("{}/zones", self.base_url))
            .query(&[("name", name)]);
        let what = format!("zone {name}");
        let zones: Vec<Zone> = self.call(request, &what).await?;

        zones.into_iter().next().ok_or_else(|| Error::not_found(what))
    }

    async fn find_record(&self, zone_id: &str, name: &str) -> Result<DnsRecord> {
        tracing::debug!("Looking up A record: {} in zone {}", name, zone_id);

        let request = self
            .client
            .get(format!("{}/zones/{}/dns_records", self.base_url, zone_id))
            .query(&[("name.exact", name), ("type", "A")]);
        let what = format!("record {name}");
        let records: Vec<DnsRecord> = self.call(request, &what).await?;

        let mut record = records.into_iter().next().ok_or_else(|| Error::not_found(what))?;
        record.zone_id.get_or_insert_with(|| zone_id.to_string());
        Ok(record)
    }

    async fn edit_record(&self, zone_id: &str, record_id: &str, content: Ipv4Addr) -> Result<DnsRecord> {
        tracing::debug!("Editing record {} in zone {} -> {}", record_id, zone_id, content);

        let request = self
            .client
            .patch(format!(
                "{}/zones/{}/dns_records/{}",
                self.base_url, zone_id, record_id
            ))
            .json(&serde_json::json!({
                "type": "A",
                "content": content.to_string(),
            }));
        let mut record: DnsRecord = self.call(request, &format!("record {record_id}")).await?;

        record.zone_id.get_or_insert_with(|| zone_id.to_string());
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

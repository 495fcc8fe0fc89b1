// # HTTP IP Source
//
// Discovers the public IPv4 address by asking external "what is my IP"
// services.
//
// ## Fallback
//
// Endpoints are tried once each, in order. A transport error, a status
// other than 200, an unreadable body or a body that is not an IPv4 literal
// skips to the next endpoint. The first valid address wins; if none is
// found the result is `Error::IpDiscoveryExhausted`.

use async_trait::async_trait;
use cfddns_core::ip::parse_ipv4;
use cfddns_core::traits::IpSource;
use cfddns_core::{Error, Result};
use reqwest::StatusCode;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, warn};

/// Default IP check services, in the order they are tried
pub const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://ipv4.icanhazip.com",
    "https://ipv4.ifconfig.me",
    "https://api.ipify.org",
];

/// Per-request timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source with ordered fallback
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URLs to fetch the address from, in order
    endpoints: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source over the default services
    pub fn new() -> Result<Self> {
        Self::with_endpoints(DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect())
    }

    /// Create a source over custom endpoints
    pub fn with_endpoints(endpoints: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { endpoints, client })
    }

    /// Endpoints in the order they are tried
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Fetch and validate the address from one endpoint
    async fn fetch_ip(&self, url: &str) -> std::result::Result<Ipv4Addr, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if response.status() != StatusCode::OK {
            return Err(format!("HTTP status {}", response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        parse_ipv4(body.trim()).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn discover(&self) -> Result<Ipv4Addr> {
        for url in &self.endpoints {
            match self.fetch_ip(url).await {
                Ok(ip) => {
                    debug!("{} reported {}", url, ip);
                    return Ok(ip);
                }
                Err(reason) => warn!("Skipping IP source {}: {}", url, reason),
            }
        }

        Err(Error::IpDiscoveryExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn endpoint(server: &MockServer, route: &str, status: u16, body: &str) -> String {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
        format!("{}{}", server.uri(), route)
    }

    #[test]
    fn default_services_in_order() {
        let source = HttpIpSource::new().unwrap();
        assert_eq!(source.endpoints().len(), 3);
        assert_eq!(source.endpoints()[0], "https://ipv4.icanhazip.com");
        assert_eq!(source.endpoints()[2], "https://api.ipify.org");
    }

    #[tokio::test]
    async fn first_valid_answer_wins() {
        let server = MockServer::start().await;
        let first = endpoint(&server, "/first", 200, "203.0.113.7\n").await;

        let source = HttpIpSource::with_endpoints(vec![first]).unwrap();
        assert_eq!(source.discover().await.unwrap(), Ipv4Addr::new(203, 0, 113, 7));
    }

    #[tokio::test]
    async fn falls_back_past_bad_status_and_bad_body() {
        let server = MockServer::start().await;
        let down = endpoint(&server, "/down", 503, "").await;
        let ipv6 = endpoint(&server, "/v6", 200, "2001:db8::ff00:42").await;
        let garbage = endpoint(&server, "/garbage", 200, "<html>oops</html>").await;
        let good = endpoint(&server, "/good", 200, "  198.51.100.23  ").await;

        let source = HttpIpSource::with_endpoints(vec![down, ipv6, garbage, good]).unwrap();
        assert_eq!(source.discover().await.unwrap(), Ipv4Addr::new(198, 51, 100, 23));
    }

    #[tokio::test]
    async fn non_200_success_is_skipped() {
        let server = MockServer::start().await;
        let accepted = endpoint(&server, "/accepted", 202, "203.0.113.7").await;

        let source = HttpIpSource::with_endpoints(vec![accepted]).unwrap();
        assert!(matches!(source.discover().await, Err(Error::IpDiscoveryExhausted)));
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let server = MockServer::start().await;
        let good = endpoint(&server, "/good", 200, "203.0.113.7").await;

        Mock::given(method("GET"))
            .and(path("/never"))
            .respond_with(ResponseTemplate::new(200).set_body_string("198.51.100.1"))
            .expect(0)
            .mount(&server)
            .await;
        let never = format!("{}/never", server.uri());

        let source = HttpIpSource::with_endpoints(vec![good, never]).unwrap();
        assert_eq!(source.discover().await.unwrap(), Ipv4Addr::new(203, 0, 113, 7));
    }

    #[tokio::test]
    async fn exhausted_when_all_fail() {
        let server = MockServer::start().await;
        let down = endpoint(&server, "/down", 500, "").await;
        // Nothing listens on port 9 of the loopback
        let unreachable = "http://127.0.0.1:9/".to_string();

        let source = HttpIpSource::with_endpoints(vec![down, unreachable]).unwrap();
        assert!(matches!(source.discover().await, Err(Error::IpDiscoveryExhausted)));
    }
}

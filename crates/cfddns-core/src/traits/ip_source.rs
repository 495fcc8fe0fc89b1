// # IP Source Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP "what is my IP" services: `cfddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::IpSource;
//
// let ip = source.discover().await?;
// println!("public address: {ip}");
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// Sources are consulted once per run and only when no explicit `--ip`
/// override was given. Failures of individual endpoints are the source's
/// business; the caller only sees the first valid address or
/// `Error::IpDiscoveryExhausted`.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Discover the current public IPv4 address
    async fn discover(&self) -> Result<Ipv4Addr, crate::Error>;
}

//! Core traits for cfddns
//!
//! The abstract interfaces the engine and the validator depend on.
//!
//! - [`IpSource`]: Discover the public IPv4 address
//! - [`DnsProvider`]: Look up and edit DNS records via a provider API
//! - [`ReleaseSource`]: Find and install newer releases of the binary

pub mod ip_source;
pub mod dns_provider;
pub mod release_source;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsRecord, Zone};
pub use release_source::{Release, ReleaseAsset, ReleaseSource};

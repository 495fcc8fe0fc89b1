//! IPv4 literal validation

use crate::error::{Error, Result};
use std::net::Ipv4Addr;

/// Parse `text` as a dotted-quad IPv4 address
///
/// IPv6 literals, including IPv4-mapped forms, are rejected.
pub fn parse_ipv4(text: &str) -> Result<Ipv4Addr> {
    text.parse::<Ipv4Addr>()
        .map_err(|_| Error::InvalidIp(text.to_string()))
}

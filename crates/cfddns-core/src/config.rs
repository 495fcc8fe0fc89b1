//! Run configuration and argument validation
//!
//! [`RunArgs`] is what the user typed; [`RunConfig`] is the fully resolved,
//! immutable configuration the engine runs with. Validation fills in
//! defaults and fails fast, in a fixed order:
//!
//! 1. record present
//! 2. token from the flag, else from `CLOUDFLARE_API_TOKEN`
//! 3. zone from the flag, else the record's registrable domain
//! 4. IP from the flag (must be IPv4), else discovered
//! 5. apex guard: record == zone needs `force`

use crate::error::{Error, Result};
use crate::ip::parse_ipv4;
use crate::traits::IpSource;
use crate::zone::{normalize_name, registrable_domain};
use std::net::Ipv4Addr;
use tracing::debug;

/// Environment variable consulted when no token flag is given
pub const TOKEN_ENV_VAR: &str = "CLOUDFLARE_API_TOKEN";

/// Raw, unvalidated inputs for one run
///
/// Empty strings count as "not supplied".
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Record to update (positional)
    pub record: Option<String>,
    /// API token override
    pub token: Option<String>,
    /// Zone name override
    pub domain: Option<String>,
    /// IP override
    pub ip: Option<String>,
    /// Allow updating the zone apex
    pub force: bool,
    /// Dump the final record as JSON
    pub verbose: bool,
}

/// Fully resolved configuration for one run
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Record to update, normalised
    pub record: String,
    /// Zone owning the record, normalised
    pub zone: String,
    /// Target address
    pub ip: Ipv4Addr,
    /// Apex override was given
    pub force: bool,
    /// Dump the final record as JSON
    pub verbose: bool,
    /// Provider API token
    /// ⚠️ NEVER log this value
    token: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("record", &self.record)
            .field("zone", &self.zone)
            .field("ip", &self.ip)
            .field("force", &self.force)
            .field("verbose", &self.verbose)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl RunConfig {
    /// Build a configuration directly, bypassing validation
    pub fn new(
        record: impl Into<String>,
        token: impl Into<String>,
        zone: impl Into<String>,
        ip: Ipv4Addr,
    ) -> Self {
        Self {
            record: record.into(),
            zone: zone.into(),
            ip,
            force: false,
            verbose: false,
            token: token.into(),
        }
    }

    /// Set the verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Provider API token
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// The trimmed value, or `None` when it is blank
fn supplied(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RunArgs {
    /// Resolve these arguments into a [`RunConfig`]
    ///
    /// # Parameters
    ///
    /// - `env_token`: value of [`TOKEN_ENV_VAR`], read by the caller
    /// - `ip_source`: consulted only when no IP override is given
    ///
    /// # Errors
    ///
    /// The first unsatisfied requirement, in the order listed in the module
    /// docs. Everything here is an argument-validation failure.
    pub async fn validate(
        self,
        env_token: Option<String>,
        ip_source: &dyn IpSource,
    ) -> Result<RunConfig> {
        let record = supplied(self.record)
            .map(|r| normalize_name(&r))
            .filter(|r| !r.is_empty())
            .ok_or(Error::MissingRecord)?;

        let token = match supplied(self.token) {
            Some(token) => token,
            None => {
                let token = supplied(env_token).ok_or(Error::MissingToken)?;
                debug!("Using API token from {}", TOKEN_ENV_VAR);
                token
            }
        };

        let zone = match supplied(self.domain) {
            Some(domain) => normalize_name(&domain),
            None => {
                let zone = registrable_domain(&record).ok_or_else(|| {
                    Error::zone(format!(
                        "could not determine zone domain for {record}, use --domain"
                    ))
                })?;
                debug!("Derived zone {} from record {}", zone, record);
                zone
            }
        };

        let ip = match supplied(self.ip) {
            Some(ip) => parse_ipv4(&ip)?,
            None => {
                let ip = ip_source.discover().await?;
                debug!("Discovered public address {}", ip);
                ip
            }
        };

        if record == zone && !self.force {
            return Err(Error::RootDomainGuard(record));
        }

        Ok(RunConfig {
            record,
            zone,
            ip,
            force: self.force,
            verbose: self.verbose,
            token,
        })
    }
}

//! Error types for cfddns
//!
//! Every failure is terminal for the run. The binary decides the exit code
//! from the stage the error was raised in, not from the variant alone.

use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cfddns
#[derive(Error, Debug)]
pub enum Error {
    /// No record name was supplied
    #[error("missing record")]
    MissingRecord,

    /// No API token from the flag or the environment
    #[error("missing token")]
    MissingToken,

    /// The zone could not be derived from the record or was not found
    #[error("{0}")]
    ZoneResolution(String),

    /// An explicit IP override is not an IPv4 literal
    #[error("invalid IP: {0:?}")]
    InvalidIp(String),

    /// Refusing to touch the zone apex without `--force`
    #[error("--force required to update root domain {0}")]
    RootDomainGuard(String),

    /// The A record lookup failed
    #[error("{0}")]
    RecordResolution(String),

    /// The record edit failed
    #[error("{0}")]
    ProviderUpdate(String),

    /// Every IP discovery endpoint failed
    #[error("failed to get IPv4 address")]
    IpDiscoveryExhausted,

    /// Lookup returned no match
    #[error("{0} not found")]
    NotFound(String),

    /// Authentication errors
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Provider-specific error
    #[error("{provider}: {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Self-upgrade errors
    #[error("upgrade failed: {0}")]
    Upgrade(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O errors (executable replacement)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a zone resolution error
    pub fn zone(msg: impl Into<String>) -> Self {
        Self::ZoneResolution(msg.into())
    }

    /// Create a record resolution error
    pub fn record(msg: impl Into<String>) -> Self {
        Self::RecordResolution(msg.into())
    }

    /// Create a provider update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::ProviderUpdate(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an upgrade error
    pub fn upgrade(msg: impl Into<String>) -> Self {
        Self::Upgrade(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

//! Run outcomes and how they are reported

use crate::error::Result;
use crate::traits::DnsRecord;
use std::fmt;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Record already pointed at the target address; nothing was written
    Unchanged {
        /// The record as found
        record: DnsRecord,
    },

    /// Record content was replaced
    Updated {
        /// The record before the edit
        previous: DnsRecord,
        /// The record as returned by the edit
        current: DnsRecord,
    },
}

impl Outcome {
    /// The final state of the record
    pub fn record(&self) -> &DnsRecord {
        match self {
            Self::Unchanged { record } => record,
            Self::Updated { current, .. } => current,
        }
    }

    /// Whether a write was issued
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Pretty-printed JSON of the final record state
    pub fn detail(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.record())?)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged { .. } => write!(f, "No update needed"),
            Self::Updated { previous, current } => write!(
                f,
                "Updated {} to {} from {} (TTL {})",
                current.name,
                current.content,
                previous.content,
                Ttl(current.ttl)
            ),
        }
    }
}

/// TTL as shown to the user
///
/// Cloudflare reports 1 for "automatic"; 0 never appears in its responses
/// but is treated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl(pub u32);

impl Ttl {
    /// Provider default rather than an explicit value
    pub fn is_auto(self) -> bool {
        self.0 <= 1
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto() {
            write!(f, "auto")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

//! Update engine
//!
//! The UpdateEngine takes a validated [`RunConfig`] and brings the remote A
//! record in line with it:
//!
//! ```text
//! RunConfig ──► find_zone ──► find_record ──► content == ip ? ──► Unchanged
//!                                                   │
//!                                                   └── no ──► edit_record ──► Updated
//! ```
//!
//! Every step is awaited in order; a failure at any step ends the run before
//! anything is written. There is no retry and no local state: the provider
//! is the only source of truth for the current content.

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::report::Outcome;
use crate::traits::DnsProvider;
use tracing::{debug, info};

/// Orchestrates one zone → record → compare → edit pass
pub struct UpdateEngine {
    /// DNS provider for lookups and edits
    provider: Box<dyn DnsProvider>,
}

impl UpdateEngine {
    /// Create a new engine over `provider`
    pub fn new(provider: Box<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// Run one update pass
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome::Unchanged)`: the record already holds `config.ip`
    /// - `Ok(Outcome::Updated)`: exactly one edit was issued and succeeded
    /// - `Err(Error)`: `ZoneResolution`, `RecordResolution` or
    ///   `ProviderUpdate`, carrying the provider's message
    pub async fn run(&self, config: &RunConfig) -> Result<Outcome> {
        let provider = self.provider.provider_name();

        let zone = self
            .provider
            .find_zone(&config.zone)
            .await
            .map_err(|e| Error::zone(e.to_string()))?;
        debug!("[{}] zone {} -> {}", provider, zone.name, zone.id);

        let record = self
            .provider
            .find_record(&zone.id, &config.record)
            .await
            .map_err(|e| Error::record(e.to_string()))?;
        debug!(
            "[{}] record {} -> {} (content {})",
            provider, record.name, record.id, record.content
        );

        let target = config.ip.to_string();
        if record.content == target {
            info!("{} already points at {}", record.name, target);
            return Ok(Outcome::Unchanged { record });
        }

        info!(
            "Updating {} from {} to {}",
            record.name, record.content, target
        );
        let updated = self
            .provider
            .edit_record(&zone.id, &record.id, config.ip)
            .await
            .map_err(|e| Error::update(e.to_string()))?;

        Ok(Outcome::Updated {
            previous: record,
            current: updated,
        })
    }
}

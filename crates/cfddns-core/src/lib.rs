// # cfddns-core
//
// Core library for cfddns, a Cloudflare dynamic DNS client.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for discovering the public IPv4 address
// - **DnsProvider**: Trait for finding zones/records and editing record content
// - **ReleaseSource**: Trait for finding and installing newer releases
// - **RunArgs / RunConfig**: Argument validation into an immutable run configuration
// - **UpdateEngine**: Orchestrates zone → record → compare → edit
// - **Outcome**: What a run did, and how it is reported
//
// ## Design Principles
//
// 1. **Explicit configuration**: No process-wide state; everything a run needs is in `RunConfig`
// 2. **Capability traits**: The engine depends on traits, never on a concrete API client
// 3. **Typed results**: Nothing below the binary exits the process
// 4. **Idempotency**: A write is issued only when the remote content differs

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod ip;
pub mod report;
pub mod upgrade;
pub mod zone;

// Re-export core types for convenience
pub use traits::{DnsProvider, DnsRecord, IpSource, Release, ReleaseAsset, ReleaseSource, Zone};
pub use engine::UpdateEngine;
pub use config::{RunArgs, RunConfig, TOKEN_ENV_VAR};
pub use error::{Error, Result};
pub use report::{Outcome, Ttl};
pub use upgrade::{UpgradeOutcome, self_upgrade};

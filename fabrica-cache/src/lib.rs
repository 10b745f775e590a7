//! Two-tier cache for Fabrica.
//!
//! # Architecture
//!
//! - Tier 1 is a local in-process map with TTL expiry and a per-group entry
//!   bound enforced by insertion-order eviction.
//! - Tier 2 is an optional external distributed cache behind the
//!   [`DistributedCache`] trait; server deployments plug one in, everything
//!   else runs local-only. Absence is a normal mode, not an error.
//! - [`TieredCache`] composes the two: reads consult tier 2 first and
//!   repopulate tier 1 on a hit; writes go through to both tiers with
//!   independent TTLs. Tier-2 failures degrade silently to tier 1.
//!
//! Entries are ranked for eviction by insertion age. A cache hit does not
//! refresh an entry's position.

mod error;
mod group;
mod local;
mod remote;
mod tiered;

pub use error::{CacheError, CacheResult};
pub use group::CacheGroup;
pub use local::LocalCache;
pub use remote::{DistributedCache, RemoteTier};
pub use tiered::TieredCache;

use std::time::Duration;

/// Configuration for one cache group.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for local entries.
    pub ttl: Duration,
    /// Time-to-live handed to the distributed tier, in seconds. Independent
    /// from the local TTL.
    pub distributed_ttl_secs: u64,
    /// Maximum entry count per group before insertion-order eviction.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            distributed_ttl_secs: 300,
            max_entries: 100,
        }
    }
}

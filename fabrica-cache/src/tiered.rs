use crate::{CacheConfig, CacheGroup, DistributedCache, LocalCache, RemoteTier};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Two-tier cache for one logical group.
///
/// Reads consult the distributed tier first; a hit repopulates the local
/// tier. Writes go through to both tiers with independent TTLs. The local
/// tier enforces TTL expiry and the per-group entry bound.
pub struct TieredCache<V> {
    group: CacheGroup,
    local: LocalCache<V>,
    remote: RemoteTier,
}

impl<V> TieredCache<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    #[must_use]
    pub fn new(
        group: CacheGroup,
        config: &CacheConfig,
        distributed: Option<Arc<dyn DistributedCache>>,
    ) -> Self {
        Self {
            group,
            local: LocalCache::new(config.ttl, config.max_entries),
            remote: RemoteTier::new(distributed, config.distributed_ttl_secs),
        }
    }

    /// Local-only cache for groups that never replicate (e.g. source-hash
    /// memos).
    #[must_use]
    pub fn local_only(group: CacheGroup, config: &CacheConfig) -> Self {
        Self {
            group,
            local: LocalCache::new(config.ttl, config.max_entries),
            remote: RemoteTier::absent(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        if let Some(raw) = self.remote.get(&self.group.key(key)).await {
            match serde_json::from_value::<V>(raw) {
                Ok(value) => {
                    debug!(group = %self.group, key, "distributed cache hit");
                    self.local.set(key, value.clone());
                    return Some(value);
                }
                Err(err) => {
                    warn!(group = %self.group, key, error = %err, "undecodable distributed cache entry, treating as miss");
                }
            }
        }
        self.local.get(key)
    }

    pub async fn set(&self, key: &str, value: V) {
        match serde_json::to_value(&value) {
            Ok(raw) => self.remote.set(&self.group.key(key), raw).await,
            Err(err) => {
                warn!(group = %self.group, key, error = %err, "value not serializable for distributed tier");
            }
        }
        self.local.set(key, value);
    }

    pub async fn delete(&self, key: &str) {
        self.remote.delete(&self.group.key(key)).await;
        self.local.delete(key);
    }

    /// Clears the whole group on both tiers.
    pub async fn clear(&self) {
        self.remote.clear_prefix(&self.group.prefix()).await;
        self.local.clear();
    }

    #[must_use]
    pub fn group(&self) -> CacheGroup {
        self.group
    }

    /// Direct access to the local tier, used by tests and diagnostics.
    #[must_use]
    pub fn local(&self) -> &LocalCache<V> {
        &self.local
    }
}

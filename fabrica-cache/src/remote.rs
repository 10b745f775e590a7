use crate::{CacheError, CacheResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// The optional distributed cache collaborator (tier 2).
///
/// Present only in server-side contexts where the backing service is
/// reachable. Implementations report transport failures as
/// [`CacheError::TierUnavailable`]; the tiered cache degrades to the local
/// tier on any error.
#[async_trait]
pub trait DistributedCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> CacheResult<()>;
    async fn delete(&self, key: &str) -> CacheResult<()>;
    /// Removes every key under the given namespace prefix.
    async fn clear_prefix(&self, prefix: &str) -> CacheResult<()>;
}

/// Decorator over the optional distributed tier.
///
/// Exposes infallible operations: absence of a backing cache and transport
/// errors both surface as "absent", logged at warning level. Callers never
/// special-case the missing tier.
#[derive(Clone)]
pub struct RemoteTier {
    cache: Option<Arc<dyn DistributedCache>>,
    ttl_secs: u64,
}

impl RemoteTier {
    #[must_use]
    pub fn new(cache: Option<Arc<dyn DistributedCache>>, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    /// A tier with no backing cache; every read misses, every write is a
    /// no-op.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            cache: None,
            ttl_secs: 0,
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn_degraded("get", key, &err);
                None
            }
        }
    }

    pub async fn set(&self, key: &str, value: Value) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.set(key, value, self.ttl_secs).await {
                warn_degraded("set", key, &err);
            }
        }
    }

    pub async fn delete(&self, key: &str) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.delete(key).await {
                warn_degraded("delete", key, &err);
            }
        }
    }

    pub async fn clear_prefix(&self, prefix: &str) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.clear_prefix(prefix).await {
                warn_degraded("clear", prefix, &err);
            }
        }
    }
}

fn warn_degraded(op: &str, key: &str, err: &CacheError) {
    warn!(op, key, error = %err, "distributed cache unavailable, serving from local tier");
}

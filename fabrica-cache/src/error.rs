//! Error types for the cache layer.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur in cache operations.
///
/// Tier-2 errors never escape [`crate::TieredCache`]; the remote tier
/// degrades to absence and logs. This type exists for [`crate::DistributedCache`]
/// implementations to report their failures.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Distributed tier unreachable (timeout, connection refused, ...).
    #[error("distributed cache unavailable: {0}")]
    TierUnavailable(String),

    /// Payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

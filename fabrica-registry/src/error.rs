//! Error types for the widget registry.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A field referenced a capability no widget provides.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// A capability name was registered twice.
    #[error("capability already registered: {0}")]
    AlreadyRegistered(String),

    /// The registry failed to initialize.
    #[error("registry initialization failed: {0}")]
    InitializationFailed(String),
}

//! Error types for the orchestration engine.

use fabrica_loader::LoaderError;
use fabrica_model::SinkError;
use fabrica_registry::RegistryError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A snapshot was requested before initialization completed.
    #[error("engine not initialized")]
    NotReady,

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("model store error: {0}")]
    Store(#[from] SinkError),

    #[error(transparent)]
    Initialization(#[from] InitError),
}

/// Failure of one initialization attempt.
///
/// Cheaply clonable so a single failure can be surfaced to every concurrent
/// waiter of the shared attempt.
#[derive(Debug, Clone, Error)]
#[error("initialization failed: {0}")]
pub struct InitError(pub Arc<EngineError>);

impl InitError {
    #[must_use]
    pub fn new(err: EngineError) -> Self {
        Self(Arc::new(err))
    }
}

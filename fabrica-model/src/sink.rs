use crate::Definition;
use async_trait::async_trait;
use thiserror::Error;

/// Error produced by a [`ModelSink`] implementation.
#[derive(Debug, Error)]
#[error("model sink error: {0}")]
pub struct SinkError(pub String);

/// The single persistent-store operation this core invokes: materialize the
/// table/collection model backing a compiled definition.
///
/// Implemented by the document-store layer. This core never performs
/// queries against the store.
#[async_trait]
pub trait ModelSink: Send + Sync {
    async fn ensure_model(&self, definition: &Definition) -> Result<(), SinkError>;
}

/// No-op sink for contexts without a persistent store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullModelSink;

#[async_trait]
impl ModelSink for NullModelSink {
    async fn ensure_model(&self, _definition: &Definition) -> Result<(), SinkError> {
        Ok(())
    }
}

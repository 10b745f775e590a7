//! Error types for the loader.

use fabrica_registry::RegistryError;
use thiserror::Error;

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors that can occur while loading and compiling definition sources.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// I/O failure reading a definition source. Retried with backoff, then
    /// skip-and-log for batch operations.
    #[error("failed to read definition source '{path}': {message}")]
    SourceRead { path: String, message: String },

    /// Malformed definition source. Never retried.
    #[error("failed to compile definition source '{path}': {message}")]
    Compile { path: String, message: String },

    /// A placeholder field referenced a capability the registry cannot
    /// resolve. The field is dropped, the definition kept.
    #[error("capability resolution failed for field '{field}'")]
    CapabilityResolution {
        field: String,
        #[source]
        source: RegistryError,
    },

    /// The widget registry failed to come up; no compile pass can run.
    #[error("widget registry unavailable: {0}")]
    Registry(#[from] RegistryError),
}

impl LoaderError {
    pub(crate) fn source_read(path: impl Into<String>, message: impl ToString) -> Self {
        Self::SourceRead {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn compile(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Compile {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for failures worth retrying (transient I/O); compile errors are
    /// deterministic and never retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SourceRead { .. })
    }
}

//! Source-provider strategies.
//!
//! A provider enumerates the raw definition sources available to this
//! deployment. Per-item read failures are retried, then logged and skipped;
//! only a systemic failure (the whole provider unreachable) aborts an
//! enumeration.

mod artifact;
mod fs;
mod remote;

pub use artifact::ArtifactProvider;
pub use fs::FsProvider;
pub use remote::RemoteProvider;

use crate::{DefinitionSource, LoaderResult};
use async_trait::async_trait;

/// Enumerates and fetches raw definition sources.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Lists every available source. Unreadable individual sources are
    /// skipped after retries; errors here are systemic.
    async fn list_sources(&self) -> LoaderResult<Vec<DefinitionSource>>;

    /// Fetches the single source whose path leaf matches `name`, or `None`
    /// when no such source exists anymore.
    async fn fetch_source(&self, name: &str) -> LoaderResult<Option<DefinitionSource>>;
}

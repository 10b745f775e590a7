//! Definition-source loading and compilation for Fabrica.
//!
//! # Architecture
//!
//! - A [`SourceProvider`] enumerates raw definition sources. Three
//!   interchangeable strategies exist, selected by deployment mode: a
//!   filesystem scanner (development), a remote structure API (browser /
//!   deployed), and a pre-compiled artifact directory (production server).
//! - The [`Compiler`] turns raw source text into a canonical
//!   [`fabrica_model::Definition`]. Sources are a declarative JSON form;
//!   field construction is evaluated only against the capability table the
//!   caller passes in, never against ambient state. Fields referencing a
//!   capability missing from the table are placeholders, resolved
//!   asynchronously through the widget registry; an unresolvable field is
//!   dropped, never the whole definition.
//! - The [`Loader`] drives batches: one source failing to compile is logged
//!   and skipped without aborting the pass. Provider I/O retries with
//!   exponential backoff before surfacing a terminal error for that item.

mod compile;
mod error;
mod loader;
mod provider;
mod retry;
mod source;

pub use compile::{Compiler, RawDefinition, RawField};
pub use error::{LoaderError, LoaderResult};
pub use loader::{LoadedDefinition, Loader, LoaderConfig};
pub use provider::{ArtifactProvider, FsProvider, RemoteProvider, SourceProvider};
pub use retry::{with_backoff, RetryConfig};
pub use source::{content_hash, DefinitionSource, DeployMode};

//! Content-definition orchestration engine for Fabrica.
//!
//! # Architecture
//!
//! [`ContentEngine`] is the service object the rest of the system talks to.
//! Constructed once at process start, it coordinates the loader, the widget
//! registry, the category tree builder, and the two-tier cache:
//!
//! - First use runs a single-flight initialization pass: every concurrent
//!   caller of [`ContentEngine::wait_for_initialization`] awaits the same
//!   pending attempt; a failed attempt rejects all of its waiters and the
//!   engine stays retryable.
//! - Reads are served from cache; misses lazily reload single definitions.
//! - [`ContentEngine::update_collections`] re-scans sources, skipping items
//!   whose content hash is unchanged unless a forced recompile is requested,
//!   then republishes the definition/category snapshot to subscribers.

mod engine;
mod error;
pub mod tree;

pub use engine::{ContentEngine, EngineConfig, EngineState, Snapshot};
pub use error::{EngineError, EngineResult, InitError};

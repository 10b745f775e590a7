//! Core type definitions for Fabrica.
//!
//! Defines the identifier and path types every other Fabrica crate depends
//! on:
//! - [`DefinitionId`] — stable UUID identity of a content-type definition
//! - [`ContentPath`] — normalized slash-separated hierarchy string that
//!   places a definition in the category tree

mod ids;
mod path;

pub use ids::DefinitionId;
pub use path::{ContentPath, PathError};

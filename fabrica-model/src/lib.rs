//! Content-definition model for Fabrica.
//!
//! Defines the shapes the rest of the system compiles into, caches, and
//! serves to the API/GraphQL layer:
//! - [`Definition`] — canonical in-memory description of one content type
//! - [`Field`] / [`FieldDescriptor`] — one entry in a definition's field
//!   list, and the resolved shape a capability builder produces
//! - [`CategoryNode`] — a node of the category tree mirroring storage paths
//! - [`PathOverrides`] — static icon/order configuration per category path
//! - [`ModelSink`] — the single persistent-store operation this core invokes
//!
//! These types are the wire contract: the API layer consumes them as JSON
//! to generate per-collection schemas and resolvers.

mod category;
mod definition;
mod field;
mod overrides;
mod sink;

pub use category::CategoryNode;
pub use definition::{Definition, DefinitionStatus, FeatureFlags};
pub use field::{Field, FieldDescriptor, FieldHooks, FieldType};
pub use overrides::{PathOverride, PathOverrides};
pub use sink::{ModelSink, NullModelSink, SinkError};

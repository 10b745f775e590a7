//! Widget/capability registry for Fabrica.
//!
//! Field-construction capabilities are referenced by name from definition
//! sources. Each registered capability is an identity builder: it collects
//! its arguments verbatim into a [`FieldDescriptor`] for the widget
//! implementation to interpret later. The registry is the ONLY evaluation
//! context definition sources are compiled against — sources never see
//! ambient process state.
//!
//! Initialization registers the built-in capability set and is idempotent
//! and single-flight; plugins add their own capabilities through
//! [`WidgetRegistry::register`].

mod error;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::{CapabilityBuilder, CapabilityTable, IdentityBuilder, WidgetRegistry};

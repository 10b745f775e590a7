use crate::{RegistryError, RegistryResult};
use fabrica_model::{FieldDescriptor, FieldType};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// A named field-construction capability.
///
/// Builders act as identity functions: they collect the raw arguments from
/// the definition source into a [`FieldDescriptor`] without interpreting
/// them. The widget implementation consumes the collected config later.
pub trait CapabilityBuilder: Send + Sync {
    fn build(&self, args: &Value) -> FieldDescriptor;
}

/// The built-in builder kind: tags the descriptor with a widget name and
/// semantic type, and collects the arguments verbatim.
pub struct IdentityBuilder {
    widget: &'static str,
    field_type: FieldType,
}

impl IdentityBuilder {
    #[must_use]
    pub const fn new(widget: &'static str, field_type: FieldType) -> Self {
        Self { widget, field_type }
    }
}

impl CapabilityBuilder for IdentityBuilder {
    fn build(&self, args: &Value) -> FieldDescriptor {
        FieldDescriptor::new(self.widget, self.field_type).with_config(args.clone())
    }
}

/// Snapshot of the registered builders, handed to the compiler as the
/// explicit (and only) evaluation context for definition sources.
pub type CapabilityTable = HashMap<String, Arc<dyn CapabilityBuilder>>;

const BUILTINS: &[(&str, FieldType)] = &[
    ("text", FieldType::Text),
    ("rich_text", FieldType::RichText),
    ("number", FieldType::Number),
    ("bool", FieldType::Bool),
    ("date_time", FieldType::DateTime),
    ("relation", FieldType::Relation),
    ("media", FieldType::Media),
    ("enumeration", FieldType::Enumeration),
    ("json", FieldType::Json),
    ("extract", FieldType::Extract),
];

/// Registry of field-construction capabilities.
///
/// `initialize` must complete before any compile pass; it is idempotent and
/// single-flight, so concurrent callers share one registration pass.
pub struct WidgetRegistry {
    builders: RwLock<CapabilityTable>,
    init: OnceCell<()>,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builders: RwLock::new(HashMap::new()),
            init: OnceCell::new(),
        }
    }

    /// Registers the built-in capability set. Concurrent and repeated calls
    /// share a single registration pass.
    pub async fn initialize(&self) -> RegistryResult<()> {
        self.init
            .get_or_try_init(|| async move {
                let mut builders = self
                    .builders
                    .write()
                    .map_err(|_| RegistryError::InitializationFailed("lock poisoned".into()))?;
                for &(name, field_type) in BUILTINS {
                    builders.insert(
                        name.to_string(),
                        Arc::new(IdentityBuilder::new(name, field_type)) as Arc<dyn CapabilityBuilder>,
                    );
                }
                info!(capabilities = builders.len(), "widget registry initialized");
                Ok(())
            })
            .await
            .copied()
    }

    /// True once `initialize` has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.init.initialized()
    }

    /// Registers a plugin-supplied capability. Rejects duplicates.
    pub fn register(
        &self,
        name: impl Into<String>,
        builder: Arc<dyn CapabilityBuilder>,
    ) -> RegistryResult<()> {
        let name = name.into();
        let mut builders = self
            .builders
            .write()
            .map_err(|_| RegistryError::InitializationFailed("lock poisoned".into()))?;
        if builders.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        debug!(capability = %name, "capability registered");
        builders.insert(name, builder);
        Ok(())
    }

    /// Resolves a capability by name, initializing the registry first if
    /// needed. Placeholder fields in compiled definitions go through here.
    pub async fn resolve(&self, name: &str, args: &Value) -> RegistryResult<FieldDescriptor> {
        self.initialize().await?;
        let builders = self
            .builders
            .read()
            .map_err(|_| RegistryError::InitializationFailed("lock poisoned".into()))?;
        builders
            .get(name)
            .map(|builder| builder.build(args))
            .ok_or_else(|| RegistryError::UnknownCapability(name.to_string()))
    }

    /// Snapshots the builder map for a compile pass.
    pub fn capability_table(&self) -> CapabilityTable {
        self.builders
            .read()
            .map(|builders| builders.clone())
            .unwrap_or_default()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! The restricted definition-source compiler.
//!
//! Sources are a declarative JSON form. Field construction is evaluated
//! ONLY against the capability table passed in by the caller — a source has
//! no way to reach ambient process state, and unknown source constructs are
//! rejected at parse time.

use crate::{DefinitionSource, LoaderError, LoaderResult};
use fabrica_model::{Definition, DefinitionStatus, Field, FieldHooks, FieldType};
use fabrica_registry::{CapabilityTable, WidgetRegistry};
use fabrica_types::{ContentPath, DefinitionId};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The declarative form of one definition source.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDefinition {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Optional explicit path; the provider-supplied path applies otherwise.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub fields: Vec<RawField>,
    #[serde(default)]
    pub permissions: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub revisioned: bool,
    #[serde(default)]
    pub live_preview: bool,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub status: Option<DefinitionStatus>,
}

/// One field entry in the declarative form. `capability` names the widget
/// that implements the field; `args` are collected verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawField {
    pub field: String,
    pub capability: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub translatable: bool,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub hooks: FieldHooks,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// Compiles raw definition sources into canonical [`Definition`]s.
///
/// The capability table is the whole evaluation context. Fields referencing
/// a capability absent from the table are placeholders and resolve through
/// the registry; a field that still fails to resolve is dropped with a
/// warning, never the whole definition.
pub struct Compiler {
    capabilities: CapabilityTable,
    registry: Arc<WidgetRegistry>,
}

impl Compiler {
    #[must_use]
    pub fn new(capabilities: CapabilityTable, registry: Arc<WidgetRegistry>) -> Self {
        Self {
            capabilities,
            registry,
        }
    }

    /// Compiles one source. Malformed source text is a [`LoaderError::Compile`];
    /// per-field capability failures only drop the affected field.
    pub async fn compile(&self, source: &DefinitionSource) -> LoaderResult<Definition> {
        let raw: RawDefinition = serde_json::from_str(&source.raw)
            .map_err(|err| LoaderError::compile(source.path.as_str(), err))?;

        let path = match &raw.path {
            Some(explicit) => ContentPath::parse(explicit)
                .map_err(|err| LoaderError::compile(source.path.as_str(), err))?,
            None => source.path.clone(),
        };

        let id = match &raw.id {
            Some(existing) => DefinitionId::parse(existing)
                .map_err(|err| LoaderError::compile(source.path.as_str(), err))?,
            None => DefinitionId::new(),
        };

        let leaf = path.leaf().to_string();
        let mut definition = Definition::new(path);
        definition.id = id;
        definition.name = raw.name.unwrap_or_else(|| leaf.clone());
        definition.slug = raw.slug.unwrap_or_else(|| leaf.to_lowercase());
        definition.description = raw
            .description
            .unwrap_or_else(|| format!("{} content type", definition.name));
        definition.icon = raw.icon;
        if let Some(order) = raw.order {
            definition.order = order;
        }
        definition.permissions = raw.permissions;
        definition.features.revisioned = raw.revisioned;
        definition.features.live_preview = raw.live_preview;
        definition.features.strict = raw.strict;
        if let Some(status) = raw.status {
            definition.status = status;
        }

        let mut fields = Vec::with_capacity(raw.fields.len());
        for raw_field in &raw.fields {
            if let Some(field) = self.compile_field(raw_field, definition.path.as_str()).await {
                fields.push(field);
            }
        }
        definition.fields = fields;

        debug!(
            definition = %definition.slug,
            path = %definition.path,
            fields = definition.fields.len(),
            "definition compiled"
        );
        Ok(definition)
    }

    /// Compiles one field, or returns `None` when its capability cannot be
    /// resolved. Boxed for recursion into extract sub-fields.
    fn compile_field<'a>(
        &'a self,
        raw: &'a RawField,
        source_path: &'a str,
    ) -> BoxFuture<'a, Option<Field>> {
        async move {
            let descriptor = match self.capabilities.get(&raw.capability) {
                Some(builder) => builder.build(&raw.args),
                None => {
                    debug!(
                        field = %raw.field,
                        capability = %raw.capability,
                        "capability not in table, resolving placeholder via registry"
                    );
                    match self.registry.resolve(&raw.capability, &raw.args).await {
                        Ok(descriptor) => descriptor,
                        Err(err) => {
                            let err = LoaderError::CapabilityResolution {
                                field: raw.field.clone(),
                                source: err,
                            };
                            warn!(
                                source = source_path,
                                capability = %raw.capability,
                                error = %err,
                                "dropping field, capability unresolvable"
                            );
                            return None;
                        }
                    }
                }
            };

            let mut field = Field::new(raw.field.clone(), descriptor);
            field.label = raw.label.clone().unwrap_or_else(|| raw.field.clone());
            field.required = raw.required;
            field.unique = raw.unique;
            field.translatable = raw.translatable;
            field.default_value = raw.default.clone();
            field.hooks = raw.hooks.clone();

            if !raw.fields.is_empty() {
                if field.descriptor.field_type == FieldType::Extract {
                    for sub in &raw.fields {
                        if let Some(compiled) = self.compile_field(sub, source_path).await {
                            field.fields.push(compiled);
                        }
                    }
                } else {
                    warn!(
                        source = source_path,
                        field = %raw.field,
                        "sub-fields ignored on non-extract field"
                    );
                }
            }

            Some(field)
        }
        .boxed()
    }
}

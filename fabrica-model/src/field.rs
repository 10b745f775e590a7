use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    RichText,
    Number,
    Bool,
    DateTime,
    Relation,
    Media,
    Enumeration,
    Json,
    /// A field owning a nested sub-field list that inlines into the parent's
    /// exposed shape instead of persisting independently.
    Extract,
}

/// The resolved shape a capability builder produces for one field.
///
/// Builders are identity functions over their arguments: the widget name and
/// the raw argument object are collected verbatim into `config` so the API
/// layer can hand them back to the widget implementation unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Capability tag — which widget implements this field.
    pub widget: String,
    pub field_type: FieldType,
    /// Widget arguments, collected verbatim from the definition source.
    #[serde(default)]
    pub config: Value,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(widget: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            widget: widget.into(),
            field_type,
            config: Value::Null,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

/// Opaque capability-hook names attached to a field.
///
/// Hooks are references into the widget registry, not language constructs;
/// this core stores and serves them without interpreting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl FieldHooks {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validate.is_none() && self.display.is_none() && self.transform.is_none()
    }
}

/// One entry in a definition's field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub translatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "FieldHooks::is_empty")]
    pub hooks: FieldHooks,
    /// Sub-fields of an extract field. Empty for every other field type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Field {
    /// Creates a field from its resolved descriptor with flag defaults.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            descriptor,
            required: false,
            unique: false,
            translatable: false,
            default_value: None,
            hooks: FieldHooks::default(),
            fields: Vec::new(),
        }
    }

    /// True for fields whose sub-fields inline into the parent shape.
    #[must_use]
    pub fn is_extractable(&self) -> bool {
        self.descriptor.field_type == FieldType::Extract
    }

    /// Returns the exposed shape of this field: the field itself, or its
    /// inlined sub-fields when extractable. Sub-field names are prefixed
    /// with the owning field's name so the flattened view stays unambiguous.
    #[must_use]
    pub fn flatten(&self) -> Vec<Field> {
        if !self.is_extractable() {
            return vec![self.clone()];
        }
        self.fields
            .iter()
            .flat_map(Field::flatten)
            .map(|mut inner| {
                inner.name = format!("{}.{}", self.name, inner.name);
                inner
            })
            .collect()
    }
}

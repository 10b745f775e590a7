use crate::Field;
use fabrica_types::{ContentPath, DefinitionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publication status of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionStatus {
    Active,
    Draft,
    Archived,
}

impl Default for DefinitionStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Feature flags of a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Keep a revision history for documents of this type.
    #[serde(default)]
    pub revisioned: bool,
    /// Expose a live-preview endpoint for draft documents.
    #[serde(default)]
    pub live_preview: bool,
    /// Reject documents carrying fields outside the declared list.
    #[serde(default)]
    pub strict: bool,
}

/// Canonical in-memory description of one content type.
///
/// Compiled from a definition source by the loader. The `id` is immutable
/// once assigned; recompilation replaces the field list but preserves it.
/// The `path` uniquely determines the definition's position in the category
/// tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub id: DefinitionId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub path: ContentPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_order")]
    pub order: i32,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Role name to allowed actions.
    #[serde(default)]
    pub permissions: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub status: DefinitionStatus,
}

pub(crate) fn default_order() -> i32 {
    999
}

impl Definition {
    /// Creates a definition with defaults derived from its path leaf.
    #[must_use]
    pub fn new(path: ContentPath) -> Self {
        let leaf = path.leaf().to_string();
        Self {
            id: DefinitionId::new(),
            name: leaf.clone(),
            slug: leaf.clone(),
            description: String::new(),
            path,
            icon: None,
            order: default_order(),
            fields: Vec::new(),
            permissions: BTreeMap::new(),
            features: FeatureFlags::default(),
            status: DefinitionStatus::default(),
        }
    }

    /// Returns the exposed field shape with extractable sub-fields inlined.
    #[must_use]
    pub fn exposed_fields(&self) -> Vec<Field> {
        self.fields.iter().flat_map(Field::flatten).collect()
    }
}

use crate::Definition;
use fabrica_types::DefinitionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of the category tree.
///
/// Either a pure grouping folder or a collection leaf wrapping one or more
/// definitions. A node is a collection leaf iff `definitions` is non-empty;
/// intermediate nodes never carry definitions directly, only through
/// descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: DefinitionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i32,
    /// Child nodes keyed by segment name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, CategoryNode>,
    /// Definitions attached at this node. Non-empty only on leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub leaf: bool,
}

impl CategoryNode {
    /// Creates a grouping node with the given name, icon, and order.
    #[must_use]
    pub fn group(name: impl Into<String>, icon: Option<String>, order: i32) -> Self {
        Self {
            id: DefinitionId::new(),
            name: name.into(),
            icon,
            order,
            children: BTreeMap::new(),
            definitions: Vec::new(),
            leaf: false,
        }
    }

    /// True when this node wraps at least one definition.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        !self.definitions.is_empty()
    }

    /// Walks the tree below this node, visiting every node depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a CategoryNode)) {
        visit(self);
        for child in self.children.values() {
            child.walk(visit);
        }
    }

    /// Looks up a descendant by its remaining path segments.
    #[must_use]
    pub fn descend<'a>(&'a self, mut segments: impl Iterator<Item = &'a str>) -> Option<&'a CategoryNode> {
        match segments.next() {
            None => Some(self),
            Some(seg) => self.children.get(seg)?.descend(segments),
        }
    }
}

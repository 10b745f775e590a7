use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Icon and ordering hint for one category path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Static category-path configuration consumed read-only by the tree
/// builder: full prefix path to its icon/order override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathOverrides(BTreeMap<String, PathOverride>);

impl PathOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, entry: PathOverride) {
        self.0.insert(path.into(), entry);
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&PathOverride> {
        self.0.get(path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PathOverride)> for PathOverrides {
    fn from_iter<T: IntoIterator<Item = (String, PathOverride)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

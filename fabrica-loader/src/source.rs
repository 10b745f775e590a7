use fabrica_types::ContentPath;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Deployment mode, selecting the source-provider strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployMode {
    /// Filesystem scan over the project's definition directory.
    Development,
    /// Remote structure API.
    Browser,
    /// Pre-compiled artifact directory.
    Production,
}

/// One raw definition source as enumerated by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSource {
    /// Storage path, mirrored into the category tree.
    pub path: ContentPath,
    /// Raw source text, compiled by [`crate::Compiler`].
    pub raw: String,
}

impl DefinitionSource {
    #[must_use]
    pub fn new(path: ContentPath, raw: impl Into<String>) -> Self {
        Self {
            path,
            raw: raw.into(),
        }
    }

    /// Content memo hash, used to skip recompiling unchanged sources.
    #[must_use]
    pub fn content_hash(&self) -> String {
        content_hash(&self.raw)
    }
}

/// Hex-encoded SHA-256 of source content.
#[must_use]
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        assert_ne!(content_hash("abc"), content_hash("abd"));
        assert_eq!(content_hash("abc").len(), 64);
    }
}

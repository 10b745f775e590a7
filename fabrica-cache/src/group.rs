use std::fmt;

/// Logical cache groups, each with its own entry bound and key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheGroup {
    /// Compiled definitions, keyed by slug.
    Definitions,
    /// Category tree snapshots.
    Categories,
    /// Source-content memo hashes, keyed by path.
    SourceHashes,
}

impl CacheGroup {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Definitions => "definitions",
            Self::Categories => "categories",
            Self::SourceHashes => "source-hashes",
        }
    }

    /// Key namespace prefix used on the distributed tier.
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("fabrica:{}:", self.as_str())
    }

    /// Fully namespaced distributed-tier key.
    #[must_use]
    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }
}

impl fmt::Display for CacheGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

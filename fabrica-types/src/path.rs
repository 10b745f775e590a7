//! Slash-separated content paths.
//!
//! A definition's path places it in the category tree: every segment except
//! the last names a grouping folder, the last segment names the collection
//! node the definition attaches to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when parsing a content path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("content path is empty")]
    Empty,

    #[error("content path '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// A normalized slash-separated hierarchy path, e.g. `shop/products/article`.
///
/// Leading and trailing slashes are stripped on construction; empty segments
/// are rejected. The path uniquely determines a definition's position in the
/// category tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentPath(String);

impl ContentPath {
    /// Parses and normalizes a path string.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        if trimmed.split('/').any(str::is_empty) {
            return Err(PathError::EmptySegment(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ordered path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Returns the final segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the parent path, or `None` for a root-level path.
    #[must_use]
    pub fn parent(&self) -> Option<ContentPath> {
        self.0.rsplit_once('/').map(|(head, _)| Self(head.to_string()))
    }

    /// Returns every ancestor prefix from the root segment down to the full
    /// path, e.g. `a/b/c` yields `a`, `a/b`, `a/b/c`.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.0.char_indices().filter_map(|(i, c)| {
            if c == '/' {
                Some(&self.0[..i])
            } else {
                None
            }
        })
        .chain(std::iter::once(self.0.as_str()))
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentPath> for String {
    fn from(path: ContentPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_strips_surrounding_slashes() {
        let path = ContentPath::parse("/shop/products/").unwrap();
        assert_eq!(path.as_str(), "shop/products");
    }

    #[test]
    fn empty_path_rejected() {
        assert_eq!(ContentPath::parse(""), Err(PathError::Empty));
        assert_eq!(ContentPath::parse("//"), Err(PathError::Empty));
    }

    #[test]
    fn empty_segment_rejected() {
        assert!(matches!(
            ContentPath::parse("a//b"),
            Err(PathError::EmptySegment(_))
        ));
    }

    #[test]
    fn segments_and_leaf() {
        let path = ContentPath::parse("a/b/c").unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(path.leaf(), "c");
    }

    #[test]
    fn parent_of_root_is_none() {
        let path = ContentPath::parse("a").unwrap();
        assert_eq!(path.parent(), None);
        let nested = ContentPath::parse("a/b").unwrap();
        assert_eq!(nested.parent().unwrap().as_str(), "a");
    }

    #[test]
    fn prefixes_walk_down_from_root() {
        let path = ContentPath::parse("a/b/c").unwrap();
        assert_eq!(
            path.prefixes().collect::<Vec<_>>(),
            vec!["a", "a/b", "a/b/c"]
        );
    }

    #[test]
    fn serde_rejects_invalid() {
        let ok: ContentPath = serde_json::from_str("\"a/b\"").unwrap();
        assert_eq!(ok.as_str(), "a/b");
        assert!(serde_json::from_str::<ContentPath>("\"\"").is_err());
    }
}

//! Author types for the co-authorship graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier for an author.
///
/// Wraps the provider-assigned identifier (e.g. a DBLP pid such as `232/1606`).
/// Implements `Ord` so that every collection keyed by author iterates
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    /// Create a new AuthorId. Surrounding whitespace is trimmed.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AuthorId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// An author node in the collaboration graph.
///
/// Depth is fixed at first discovery. Breadth-first expansion guarantees the
/// first discovery is already at minimum distance from the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Canonical identifier.
    pub id: AuthorId,
    /// Display name as reported by the provider.
    pub name: String,
    /// Hop distance from the seed author (0 = seed).
    pub depth: u32,
}

impl Author {
    /// Create a new author.
    pub fn new(id: AuthorId, name: impl Into<String>, depth: u32) -> Self {
        Self {
            id,
            name: name.into(),
            depth,
        }
    }

    /// Whether this author is the traversal seed.
    pub fn is_seed(&self) -> bool {
        self.depth == 0
    }

    /// Compact initials label, e.g. "Ada Lovelace" -> "AL".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .collect()
    }
}

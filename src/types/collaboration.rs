//! Collaboration (edge) types for the co-authorship graph.

use serde::{Deserialize, Serialize};
use super::author::AuthorId;

/// Unordered pair of authors identifying a collaboration.
///
/// Always stored as (low, high) so that {A, B} and {B, A} map to the same key.
/// A key never holds the same author twice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollaborationKey {
    low: AuthorId,
    high: AuthorId,
}

impl CollaborationKey {
    /// Build the canonical key for a pair. Returns `None` for a self-pair.
    pub fn new(a: AuthorId, b: AuthorId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Lower endpoint in canonical order.
    pub fn low(&self) -> &AuthorId {
        &self.low
    }

    /// Higher endpoint in canonical order.
    pub fn high(&self) -> &AuthorId {
        &self.high
    }

    /// Whether the pair touches the given author.
    pub fn touches(&self, id: &AuthorId) -> bool {
        &self.low == id || &self.high == id
    }
}

/// How conflicting joint-publication counts for the same pair are reconciled.
///
/// Counts are never summed across observations: the provider's count for a pair
/// is authoritative and a pair reported from both endpoints would otherwise be
/// double counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightReconciliation {
    /// Keep the largest reported count. Independent of observation order.
    #[default]
    Max,
    /// Keep the first reported count.
    FirstWrite,
}

impl WeightReconciliation {
    /// Reconcile an existing weight with a newly reported one.
    pub fn reconcile(self, current: u32, reported: u32) -> u32 {
        match self {
            Self::Max => current.max(reported),
            Self::FirstWrite => current,
        }
    }
}

impl std::fmt::Display for WeightReconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Max => write!(f, "max"),
            Self::FirstWrite => write!(f, "first-write"),
        }
    }
}

/// A weighted collaboration between two authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    /// Canonical unordered pair.
    pub key: CollaborationKey,
    /// Joint-publication count.
    pub weight: u32,
    /// How many times the pair was reported. Diagnostic only.
    pub observations: u32,
}

impl Collaboration {
    /// Create a collaboration on first observation.
    pub fn new(key: CollaborationKey, weight: u32) -> Self {
        Self {
            key,
            weight,
            observations: 1,
        }
    }
}

/// Outcome of `add_or_update_collaboration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaborationUpdate {
    /// The pair was new and the edge was created.
    Created,
    /// The pair existed and its weight was raised.
    Raised {
        /// Previous weight.
        from: u32,
        /// New weight.
        to: u32,
    },
    /// The pair existed and its weight was kept.
    Unchanged {
        /// Weight kept on the edge.
        kept: u32,
        /// Weight that was reported.
        reported: u32,
    },
}

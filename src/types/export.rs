//! Renderer-facing export of a finished collaboration graph.
//!
//! The export is the hand-off to whatever draws the graph: a flat node list
//! and edge list in canonical order plus a fingerprint. Visual encoding
//! (sizes, widths, colors, tooltips) is left to the consumer.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use super::author::AuthorId;

/// Fingerprint of a graph's nodes and edges.
///
/// Identical graphs produce identical fingerprints regardless of the order in
/// which they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphFingerprint(String);

impl GraphFingerprint {
    /// Compute the fingerprint from canonically ordered node and edge lists.
    pub fn compute(nodes: &[NodeExport], edges: &[EdgeExport]) -> Self {
        Self(canonical_hash_hex(&FingerprintInput { nodes, edges }))
    }

    /// Get as string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    nodes: &'a [NodeExport],
    edges: &'a [EdgeExport],
}

/// Exported author node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExport {
    /// Author identifier.
    pub id: AuthorId,
    /// Display name.
    pub name: String,
    /// Compact node label: the initials of the display name.
    pub label: String,
    /// Hop distance from the seed.
    pub depth: u32,
    /// Number of distinct collaborators in the graph.
    pub degree: usize,
    /// Whether this is the seed author.
    pub is_seed: bool,
}

/// Exported collaboration edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    /// Lower endpoint in canonical order.
    pub source: AuthorId,
    /// Higher endpoint in canonical order.
    pub target: AuthorId,
    /// Joint-publication count.
    pub weight: u32,
}

/// Full graph export.
///
/// Nodes are ordered by (depth, id). Edges are ordered by (source, target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Schema version of the export format.
    pub schema_version: String,
    /// Seed author, if the graph has one.
    pub seed: Option<AuthorId>,
    /// Author nodes.
    pub nodes: Vec<NodeExport>,
    /// Collaboration edges.
    pub edges: Vec<EdgeExport>,
    /// Fingerprint over `nodes` and `edges`.
    pub fingerprint: GraphFingerprint,
}

impl GraphExport {
    /// Look up an exported node by id.
    pub fn node(&self, id: &AuthorId) -> Option<&NodeExport> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Largest edge weight, or 0 for an edgeless graph.
    pub fn max_weight(&self) -> u32 {
        self.edges.iter().map(|e| e.weight).max().unwrap_or(0)
    }

    /// Largest node degree, or 0 for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.nodes.iter().map(|n| n.degree).max().unwrap_or(0)
    }
}

//! In-memory co-authorship graph.
//!
//! Authors are keyed by [`AuthorId`], collaborations by the unordered
//! [`CollaborationKey`]. Both maps are BTree-backed so iteration and export
//! are deterministic.
//!
//! ## Invariants
//!
//! - At most one collaboration per unordered pair
//! - No self-loops
//! - Both endpoints of every collaboration exist as authors
//! - A rejected mutation leaves the graph untouched

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::types::{
    Author, AuthorId, Collaboration, CollaborationKey, CollaborationUpdate,
    EdgeExport, GraphExport, GraphFingerprint, NodeExport, WeightReconciliation,
};
use crate::GRAPH_SCHEMA_VERSION;

/// Error type for graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Both endpoints are the same author.
    #[error("Self-loop rejected for author {0}")]
    SelfLoop(AuthorId),
    /// An endpoint has not been added as an author.
    #[error("Unknown author: {0}")]
    UnknownAuthor(AuthorId),
    /// A collaboration must have at least one joint publication.
    #[error("Zero weight for collaboration {0} - {1}")]
    ZeroWeight(AuthorId, AuthorId),
}

/// Weighted, undirected co-authorship graph.
#[derive(Debug, Clone, Default)]
pub struct CoauthorGraph {
    authors: BTreeMap<AuthorId, Author>,
    collaborations: BTreeMap<CollaborationKey, Collaboration>,
    /// Author -> distinct collaborators.
    adjacency: BTreeMap<AuthorId, BTreeSet<AuthorId>>,
    reconciliation: WeightReconciliation,
}

impl CoauthorGraph {
    /// Create an empty graph using the default (`Max`) reconciliation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the given weight reconciliation rule.
    pub fn with_reconciliation(reconciliation: WeightReconciliation) -> Self {
        Self {
            reconciliation,
            ..Self::default()
        }
    }

    /// Insert an author if absent.
    ///
    /// Returns `true` if the author was inserted. An existing author keeps its
    /// name and depth.
    pub fn add_author(&mut self, id: AuthorId, name: impl Into<String>, depth: u32) -> bool {
        if self.authors.contains_key(&id) {
            return false;
        }
        self.adjacency.entry(id.clone()).or_default();
        self.authors.insert(id.clone(), Author::new(id, name, depth));
        true
    }

    /// Create a collaboration or reconcile its weight.
    ///
    /// Observing the same pair again never sums weights; the reconciliation
    /// rule decides the single stored value, which never decreases.
    pub fn add_or_update_collaboration(
        &mut self,
        a: &AuthorId,
        b: &AuthorId,
        weight: u32,
    ) -> Result<CollaborationUpdate, GraphError> {
        let key = CollaborationKey::new(a.clone(), b.clone())
            .ok_or_else(|| GraphError::SelfLoop(a.clone()))?;
        for endpoint in [a, b] {
            if !self.authors.contains_key(endpoint) {
                return Err(GraphError::UnknownAuthor(endpoint.clone()));
            }
        }
        if weight == 0 {
            return Err(GraphError::ZeroWeight(key.low().clone(), key.high().clone()));
        }

        if let Some(existing) = self.collaborations.get_mut(&key) {
            existing.observations = existing.observations.saturating_add(1);
            let current = existing.weight;
            let next = self.reconciliation.reconcile(current, weight);
            if current != weight {
                debug!(
                    low = %key.low(),
                    high = %key.high(),
                    current,
                    reported = weight,
                    kept = next,
                    rule = %self.reconciliation,
                    "Conflicting joint-publication counts reconciled"
                );
            }
            return Ok(if next > current {
                existing.weight = next;
                CollaborationUpdate::Raised { from: current, to: next }
            } else {
                CollaborationUpdate::Unchanged { kept: current, reported: weight }
            });
        }

        self.adjacency.entry(a.clone()).or_default().insert(b.clone());
        self.adjacency.entry(b.clone()).or_default().insert(a.clone());
        self.collaborations.insert(key.clone(), Collaboration::new(key, weight));
        Ok(CollaborationUpdate::Created)
    }

    /// Number of distinct collaborators of an author, or `None` if absent.
    pub fn node_degree(&self, id: &AuthorId) -> Option<usize> {
        if !self.authors.contains_key(id) {
            return None;
        }
        Some(self.adjacency.get(id).map_or(0, BTreeSet::len))
    }

    /// Get an author.
    pub fn author(&self, id: &AuthorId) -> Option<&Author> {
        self.authors.get(id)
    }

    /// Whether an author is present.
    pub fn contains_author(&self, id: &AuthorId) -> bool {
        self.authors.contains_key(id)
    }

    /// Get the collaboration between two authors, in either order.
    pub fn collaboration(&self, a: &AuthorId, b: &AuthorId) -> Option<&Collaboration> {
        let key = CollaborationKey::new(a.clone(), b.clone())?;
        self.collaborations.get(&key)
    }

    /// All authors in id order.
    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }

    /// All collaborations in canonical key order.
    pub fn collaborations(&self) -> impl Iterator<Item = &Collaboration> {
        self.collaborations.values()
    }

    /// The seed author (the one at depth 0).
    pub fn seed(&self) -> Option<&Author> {
        self.authors.values().find(|a| a.is_seed())
    }

    /// Number of authors.
    pub fn num_authors(&self) -> usize {
        self.authors.len()
    }

    /// Number of collaborations.
    pub fn num_collaborations(&self) -> usize {
        self.collaborations.len()
    }

    /// Whether the graph has no authors.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Deepest discovery depth present.
    pub fn max_depth(&self) -> u32 {
        self.authors.values().map(|a| a.depth).max().unwrap_or(0)
    }

    /// Export the node and edge lists for rendering.
    pub fn export(&self) -> GraphExport {
        let mut nodes: Vec<NodeExport> = self
            .authors
            .values()
            .map(|a| NodeExport {
                id: a.id.clone(),
                name: a.name.clone(),
                label: a.initials(),
                depth: a.depth,
                degree: self.adjacency.get(&a.id).map_or(0, BTreeSet::len),
                is_seed: a.is_seed(),
            })
            .collect();
        nodes.sort_by(|x, y| x.depth.cmp(&y.depth).then_with(|| x.id.cmp(&y.id)));

        // BTreeMap iteration is already canonical (low, high) order.
        let edges: Vec<EdgeExport> = self
            .collaborations
            .values()
            .map(|c| EdgeExport {
                source: c.key.low().clone(),
                target: c.key.high().clone(),
                weight: c.weight,
            })
            .collect();

        let fingerprint = GraphFingerprint::compute(&nodes, &edges);

        GraphExport {
            schema_version: GRAPH_SCHEMA_VERSION.to_string(),
            seed: self.seed().map(|a| a.id.clone()),
            nodes,
            edges,
            fingerprint,
        }
    }
}

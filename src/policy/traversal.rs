//! Traversal policy: depth limit, fan-out cap and weight reconciliation.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::WeightReconciliation;
use crate::DEFAULT_POLICY_VERSION;

/// Controls how far and how wide a crawl expands.
///
/// ## Parameters
///
/// - `max_depth`: Hop limit from the seed. Authors at this depth are created
///   but never expanded. `0` yields a graph holding only the seed.
/// - `max_authors_per_node`: Fan-out cap. Only the first `k` valid
///   collaborators of each expanded author are followed, in provider order.
/// - `weight_reconciliation`: How repeated observations of one pair settle
///   on a single weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Maximum hop distance from the seed.
    pub max_depth: u32,
    /// Fan-out cap per expanded author. `None` means unlimited.
    pub max_authors_per_node: Option<NonZeroUsize>,
    /// Reconciliation rule for conflicting pair weights.
    #[serde(default)]
    pub weight_reconciliation: WeightReconciliation,
}

/// Hash input; the version string is included so policy revisions never collide.
#[derive(Serialize)]
struct PolicyParams<'a> {
    version: &'a str,
    max_depth: u32,
    max_authors_per_node: Option<usize>,
    weight_reconciliation: WeightReconciliation,
}

impl TraversalPolicy {
    /// Create a policy with the default reconciliation rule.
    pub fn new(max_depth: u32, max_authors_per_node: Option<NonZeroUsize>) -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            max_depth,
            max_authors_per_node,
            weight_reconciliation: WeightReconciliation::default(),
        }
    }

    /// Set the depth limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the fan-out cap. `0` removes the cap.
    pub fn with_max_authors_per_node(mut self, cap: usize) -> Self {
        self.max_authors_per_node = NonZeroUsize::new(cap);
        self
    }

    /// Set the reconciliation rule.
    pub fn with_reconciliation(mut self, rule: WeightReconciliation) -> Self {
        self.weight_reconciliation = rule;
        self
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Whether an author discovered at `depth` is expanded.
    pub fn expands(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    /// Number of collaborators to follow out of `available`.
    pub fn fan_out(&self, available: usize) -> usize {
        self.max_authors_per_node
            .map_or(available, |cap| available.min(cap.get()))
    }

    /// Stable hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&PolicyParams {
            version: &self.version,
            max_depth: self.max_depth,
            max_authors_per_node: self.max_authors_per_node.map(NonZeroUsize::get),
            weight_reconciliation: self.weight_reconciliation,
        })
    }
}

impl Default for TraversalPolicy {
    /// Depth 1, no fan-out cap, max reconciliation.
    fn default() -> Self {
        Self::new(1, None)
    }
}

//! Traversal policy definitions.

pub mod traversal;

pub use traversal::TraversalPolicy;
pub use crate::types::WeightReconciliation;

//! # coauthor-graph
//!
//! Bounded breadth-first exploration of academic co-authorship networks.
//!
//! The crate answers one question:
//!
//! > Starting from one author, who have they published with, and who have
//! > those people published with, out to a fixed number of hops?
//!
//! ## Core Contract
//!
//! 1. Resolve a seed author through a [`ProfileProvider`]
//! 2. Expand breadth-first, at most `max_depth` hops, following at most
//!    `max_authors_per_node` collaborators per author
//! 3. Accumulate a deduplicated, weighted [`CoauthorGraph`]
//! 4. Export canonical node/edge lists for rendering
//!
//! ## Architecture
//!
//! ```text
//! Seed query → TraversalEngine → CoauthorGraph → GraphExport → (renderer)
//!                    ↓
//!              ProfileProvider (Dataset, InMemory, Cached)
//! ```
//!
//! ## Guarantees
//!
//! - Terminates on cyclic sources: every author is enqueued at most once
//! - No author deeper than `max_depth`
//! - One edge per unordered pair, never a self-loop, weights never summed
//! - Same provider data + same policy → identical export fingerprint

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod provider;
pub mod query;
pub mod graph;
pub mod traversal;
pub mod canonical;

// Re-exports
pub use types::{
    AuthorId, Author, Collaboration, CollaborationKey, CollaborationUpdate,
    ProfileRecord, CollaboratorRecord, AuthorProfile, CollaboratorEntry,
    RecordRejection, RejectionReason, ProfileError,
    GraphExport, NodeExport, EdgeExport, GraphFingerprint,
};
pub use policy::{TraversalPolicy, WeightReconciliation};
pub use provider::{
    ProfileProvider, ProviderError,
    InMemoryProfileProvider, Dataset, DatasetError, DatasetProvider,
    CachedProvider, ProviderCacheConfig, CacheStats,
};
pub use query::{AuthorQuery, QueryError, normalize_name};
pub use graph::{CoauthorGraph, GraphError};
pub use traversal::{TraversalEngine, TraversalError, CrawlReport, CrawlStats, ExpansionFailure};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version for exported graphs.
/// Increment on breaking changes to the export format.
pub const GRAPH_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "traversal_policy_v1";

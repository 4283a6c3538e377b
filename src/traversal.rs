//! Breadth-first co-authorship crawler.
//!
//! The engine resolves a seed author, then expands outward one author at a
//! time in FIFO order, fetching each author's collaborators from a
//! [`ProfileProvider`] and folding them into a [`CoauthorGraph`].

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::graph::{CoauthorGraph, GraphError};
use crate::policy::TraversalPolicy;
use crate::provider::{ProfileProvider, ProviderError};
use crate::query::{AuthorQuery, QueryError};
use crate::types::{AuthorId, AuthorProfile};

/// Error type for traversal operations.
///
/// Only seed problems are fatal. A failed expansion of any other author is
/// recorded in [`CrawlReport::failures`] and the crawl continues.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    /// The seed query matched no profile.
    #[error("Seed author not found: {0}")]
    SeedNotFound(String),
    /// The seed profile could not be fetched or parsed.
    #[error("Seed author {query} unavailable: {source}")]
    SeedUnavailable {
        /// The seed query as given.
        query: String,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },
    /// The seed string is not a usable query.
    #[error("Invalid seed query: {0}")]
    InvalidQuery(#[from] QueryError),
    /// Graph mutation rejected (internal consistency violation - should never happen).
    #[error("Internal graph error: {0}")]
    Graph(#[from] GraphError),
}

/// A non-seed author whose expansion failed.
///
/// The author stays in the graph as a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionFailure {
    /// Author that could not be expanded.
    pub author: AuthorId,
    /// Depth at which the author was discovered.
    pub depth: u32,
    /// Provider failure.
    pub error: ProviderError,
}

/// Counters collected during a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Profiles successfully fetched and validated, seed included.
    pub profiles_fetched: usize,
    /// Authors whose collaborators were folded into the graph.
    pub expansions: usize,
    /// Non-seed expansions that failed.
    pub failures: usize,
    /// Authors left unexpanded because they sit at the depth limit.
    pub depth_limited: usize,
    /// Collaborator entries dropped as malformed.
    pub rejected_entries: usize,
    /// Collaborator entries pointing back at their own author.
    pub self_references: usize,
    /// Valid collaborator entries cut by the fan-out cap.
    pub truncated_entries: usize,
}

/// Result of a crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Canonical identifier of the seed author.
    pub seed: AuthorId,
    /// The finished graph.
    pub graph: CoauthorGraph,
    /// Non-fatal expansion failures, in the order they occurred.
    pub failures: Vec<ExpansionFailure>,
    /// Crawl counters.
    pub stats: CrawlStats,
    /// Hash of the policy the crawl ran under.
    pub policy_hash: String,
    /// When the crawl started.
    pub started_at: DateTime<Utc>,
    /// When the crawl finished.
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Whether every expansion succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Wall-clock duration of the crawl.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Traversal-local frontier: FIFO queue plus visited set.
///
/// An identifier enters the queue at most once per run.
#[derive(Debug, Default)]
struct Frontier {
    queue: VecDeque<(AuthorId, u32)>,
    visited: HashSet<AuthorId>,
}

impl Frontier {
    /// Enqueue if never seen. Returns whether the author was enqueued.
    fn offer(&mut self, id: &AuthorId, depth: u32) -> bool {
        if !self.visited.insert(id.clone()) {
            return false;
        }
        self.queue.push_back((id.clone(), depth));
        true
    }

    fn pop(&mut self) -> Option<(AuthorId, u32)> {
        self.queue.pop_front()
    }
}

/// Bounded breadth-first co-authorship crawler.
///
/// ## Algorithm
///
/// 1. Resolve the seed via the provider; failure here aborts the crawl
/// 2. Add the seed at depth 0 and enqueue it
/// 3. While the frontier is not empty:
///    - Pop the oldest entry
///    - At `max_depth`, leave it as a leaf
///    - Otherwise fetch its profile; on failure record it and move on
///    - Keep the first `max_authors_per_node` valid collaborators
///    - Add unseen collaborators at depth + 1, reconcile the edge, and
///      enqueue collaborators not yet visited
/// 4. Return the graph
///
/// Provider calls are issued one at a time in frontier order, which keeps
/// depth assignment and edge reconciliation deterministic.
pub struct TraversalEngine<P: ProfileProvider> {
    provider: Arc<P>,
    policy: TraversalPolicy,
}

impl<P: ProfileProvider> TraversalEngine<P> {
    /// Create a new engine.
    pub fn new(provider: Arc<P>, policy: TraversalPolicy) -> Self {
        Self { provider, policy }
    }

    /// Crawl from a seed and return only the graph.
    pub async fn build(&self, seed: &str) -> Result<CoauthorGraph, TraversalError> {
        Ok(self.crawl(seed).await?.graph)
    }

    /// Crawl from a seed name, profile URL or `pid:` identifier.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport, TraversalError> {
        let query = AuthorQuery::parse(seed)?;
        self.crawl_query(&query).await
    }

    /// Crawl from an already parsed query.
    pub async fn crawl_query(&self, query: &AuthorQuery) -> Result<CrawlReport, TraversalError> {
        let started_at = Utc::now();
        let policy_hash = self.policy.params_hash();

        info!(
            seed = %query,
            policy = self.policy.policy_id(),
            max_depth = self.policy.max_depth,
            max_authors_per_node = ?self.policy.max_authors_per_node,
            reconciliation = %self.policy.weight_reconciliation,
            policy_hash = %policy_hash,
            "Starting crawl"
        );

        let seed_profile = self.resolve_seed(query).await?;
        let seed_id = seed_profile.id.clone();

        let mut graph = CoauthorGraph::with_reconciliation(self.policy.weight_reconciliation);
        let mut frontier = Frontier::default();
        let mut failures = Vec::new();
        let mut stats = CrawlStats {
            profiles_fetched: 1,
            ..CrawlStats::default()
        };

        graph.add_author(seed_id.clone(), seed_profile.name.clone(), 0);
        frontier.offer(&seed_id, 0);

        // The seed was fetched during resolution; reuse it for its own expansion.
        let mut seed_profile = Some(seed_profile);

        while let Some((author_id, depth)) = frontier.pop() {
            if !self.policy.expands(depth) {
                stats.depth_limited += 1;
                continue;
            }

            let profile = match seed_profile.take() {
                Some(profile) => profile,
                None => match self.fetch(&author_id).await {
                    Ok(profile) => {
                        stats.profiles_fetched += 1;
                        profile
                    }
                    Err(error) => {
                        warn!(
                            author = %author_id,
                            depth,
                            error = %error,
                            "Expansion failed; keeping author as leaf"
                        );
                        stats.failures += 1;
                        failures.push(ExpansionFailure {
                            author: author_id,
                            depth,
                            error,
                        });
                        continue;
                    }
                },
            };

            self.expand(&mut graph, &mut frontier, &mut stats, &author_id, depth, profile)?;
        }

        let finished_at = Utc::now();
        info!(
            seed = %seed_id,
            authors = graph.num_authors(),
            collaborations = graph.num_collaborations(),
            deepest = graph.max_depth(),
            fetched = stats.profiles_fetched,
            failures = stats.failures,
            latency_ms = (finished_at - started_at).num_milliseconds(),
            "Crawl complete"
        );

        Ok(CrawlReport {
            seed: seed_id,
            graph,
            failures,
            stats,
            policy_hash,
            started_at,
            finished_at,
        })
    }

    /// Get the policy.
    pub fn policy(&self) -> &TraversalPolicy {
        &self.policy
    }

    /// Get a reference to the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn resolve_seed(&self, query: &AuthorQuery) -> Result<AuthorProfile, TraversalError> {
        let record = self.provider.lookup(query).await.map_err(|e| match e {
            ProviderError::NotFound(_) => TraversalError::SeedNotFound(query.to_string()),
            source => TraversalError::SeedUnavailable {
                query: query.to_string(),
                source,
            },
        })?;

        let profile = AuthorProfile::validate(record).map_err(|e| {
            TraversalError::SeedUnavailable {
                query: query.to_string(),
                source: e.into(),
            }
        })?;

        info!(seed = %profile.id, name = %profile.name, "Seed resolved");
        Ok(profile)
    }

    async fn fetch(&self, id: &AuthorId) -> Result<AuthorProfile, ProviderError> {
        let record = self.provider.lookup(&AuthorQuery::Id(id.clone())).await?;
        let profile = AuthorProfile::validate(record)?;
        if &profile.id != id {
            debug!(requested = %id, returned = %profile.id, "Provider returned an aliased profile");
        }
        Ok(profile)
    }

    /// Fold one author's collaborators into the graph.
    ///
    /// `author_id` is the graph key the author was enqueued under, which is
    /// authoritative even if the provider reports an alias.
    fn expand(
        &self,
        graph: &mut CoauthorGraph,
        frontier: &mut Frontier,
        stats: &mut CrawlStats,
        author_id: &AuthorId,
        depth: u32,
        profile: AuthorProfile,
    ) -> Result<(), TraversalError> {
        if !profile.rejected.is_empty() {
            warn!(
                author = %author_id,
                rejected = profile.rejected.len(),
                first_reason = %profile.rejected[0].reason,
                "Skipped malformed collaborator entries"
            );
            stats.rejected_entries += profile.rejected.len();
        }

        let available = profile.collaborators.len();
        let keep = self.policy.fan_out(available);
        stats.truncated_entries += available - keep;
        stats.expansions += 1;

        let next_depth = depth + 1;
        let mut discovered = 0usize;

        for entry in profile.collaborators.into_iter().take(keep) {
            if &entry.id == author_id {
                stats.self_references += 1;
                continue;
            }
            graph.add_author(entry.id.clone(), entry.name, next_depth);
            graph.add_or_update_collaboration(author_id, &entry.id, entry.joint_count)?;
            if frontier.offer(&entry.id, next_depth) {
                discovered += 1;
            }
        }

        debug!(
            author = %author_id,
            depth,
            available,
            kept = keep,
            discovered,
            "Expanded author"
        );
        Ok(())
    }
}

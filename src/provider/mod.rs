//! Profile providers.
//!
//! A provider answers one question: given an author query, what does that
//! author's profile (name, identifier, collaborators) look like? Fetching and
//! parsing the underlying bibliographic source is the provider's business; the
//! traversal engine only sees [`ProfileRecord`]s and [`ProviderError`]s.

pub mod memory;
pub mod dataset;
pub mod cache;

use async_trait::async_trait;

use crate::query::AuthorQuery;
use crate::types::{ProfileError, ProfileRecord};

/// Error type for provider lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No profile matches the query.
    #[error("No profile found for {0}")]
    NotFound(String),
    /// The source could not be reached or returned an error.
    #[error("Fetch failed: {0}")]
    Fetch(String),
    /// The source responded but the profile could not be parsed.
    #[error("Parse failed: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Create a fetch error from any error type.
    pub fn fetch<E: std::error::Error>(e: E) -> Self {
        Self::Fetch(e.to_string())
    }

    /// Create a parse error from any error type.
    pub fn parse<E: std::error::Error>(e: E) -> Self {
        Self::Parse(e.to_string())
    }

    /// Whether the error means "no such author".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<ProfileError> for ProviderError {
    fn from(e: ProfileError) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Trait for profile lookup backends.
///
/// Implementations must return collaborators in a stable order: the fan-out
/// cap keeps a prefix of that order.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Look up one author by identifier or name.
    async fn lookup(&self, query: &AuthorQuery) -> Result<ProfileRecord, ProviderError>;
}

pub use memory::InMemoryProfileProvider;
pub use dataset::{Dataset, DatasetError, DatasetProvider};
pub use cache::{CachedProvider, ProviderCacheConfig, CacheStats};

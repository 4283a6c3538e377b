//! Run-scoped lookup cache.
//!
//! A popular author is often reached through several parents. The engine
//! never expands an author twice within a run, but separate runs (or callers
//! resolving names before a crawl) can share one [`CachedProvider`] to avoid
//! refetching. The cache is an explicit object owned by the caller, never
//! process-wide state.
//!
//! Only successful lookups are cached; errors always reach the inner provider
//! again on the next call.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::query::AuthorQuery;
use crate::types::{AuthorId, ProfileRecord};
use super::{ProfileProvider, ProviderError};

/// Configuration for the provider cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for ProviderCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enabled: true,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups forwarded to the inner provider.
    pub misses: u64,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

impl CacheStats {
    /// Fraction of lookups served from cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Provider wrapper with an LRU cache of successful lookups.
pub struct CachedProvider<P> {
    inner: Arc<P>,
    cache: Option<Mutex<LruCache<AuthorQuery, ProfileRecord>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: ProfileProvider> CachedProvider<P> {
    /// Wrap a provider with the default cache configuration.
    pub fn new(inner: Arc<P>) -> Self {
        Self::with_config(inner, ProviderCacheConfig::default())
    }

    /// Wrap a provider with a custom cache configuration.
    pub fn with_config(inner: Arc<P>, config: ProviderCacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            let size = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
            Mutex::new(LruCache::new(size))
        });
        Self {
            inner,
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get cache statistics. `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            let cache = cache.lock();
            CacheStats {
                hits: self.hits.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
                len: cache.len(),
                cap: cache.cap().get(),
            }
        })
    }
}

#[async_trait]
impl<P: ProfileProvider> ProfileProvider for CachedProvider<P> {
    async fn lookup(&self, query: &AuthorQuery) -> Result<ProfileRecord, ProviderError> {
        let Some(cache) = &self.cache else {
            return self.inner.lookup(query).await;
        };

        let hit = cache.lock().get(query).cloned();
        if let Some(record) = hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(query = %query, "Provider cache hit");
            return Ok(record);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let record = self.inner.lookup(query).await?;

        let mut cache = cache.lock();
        // A name lookup also answers later id lookups for the same author.
        if let AuthorQuery::Name(_) = query {
            if let Some(id) = record.id.as_deref().map(AuthorId::new).filter(|id| !id.is_empty()) {
                cache.put(AuthorQuery::Id(id), record.clone());
            }
        }
        cache.put(query.clone(), record.clone());
        Ok(record)
    }
}

//! In-memory profile provider for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::query::{normalize_name, AuthorQuery};
use crate::types::{AuthorId, ProfileRecord};
use super::{ProfileProvider, ProviderError};

/// In-memory profile provider.
///
/// Uses BTreeMap for deterministic iteration order. Supports per-author
/// failure injection and records every lookup it serves, so tests can assert
/// on fetch order and counts.
#[derive(Debug, Default)]
pub struct InMemoryProfileProvider {
    /// Profiles by id.
    profiles: BTreeMap<AuthorId, ProfileRecord>,
    /// Normalized name -> id. The first profile registered under a name wins.
    names: BTreeMap<String, AuthorId>,
    /// Injected failures by id.
    failures: BTreeMap<AuthorId, ProviderError>,
    /// Lookups served, in order.
    calls: Mutex<Vec<AuthorQuery>>,
}

impl InMemoryProfileProvider {
    /// Create a new empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile under its own id.
    ///
    /// Records without an id cannot be addressed and are ignored; use
    /// [`add_record`](Self::add_record) to store one under an explicit key.
    pub fn add_profile(&mut self, record: ProfileRecord) {
        if let Some(id) = record.id.as_deref().map(AuthorId::new) {
            if !id.is_empty() {
                self.add_record(id, record);
            }
        }
    }

    /// Register a record under an explicit key, whatever its contents.
    pub fn add_record(&mut self, key: AuthorId, record: ProfileRecord) {
        if let Some(name) = record.name.as_deref() {
            let normalized = normalize_name(name);
            if !normalized.is_empty() {
                self.names.entry(normalized).or_insert_with(|| key.clone());
            }
        }
        self.profiles.insert(key, record);
    }

    /// Register a well-formed author with `(id, name, joint_count)` collaborators.
    pub fn add_author(&mut self, id: &str, name: &str, collaborators: &[(&str, &str, u32)]) {
        let record = collaborators
            .iter()
            .fold(ProfileRecord::new(id, name), |record, (cid, cname, count)| {
                record.with_collaborator(*cid, *cname, *count)
            });
        self.add_profile(record);
    }

    /// Make every lookup resolving to `id` fail with `error`.
    pub fn fail_on(&mut self, id: impl Into<AuthorId>, error: ProviderError) {
        self.failures.insert(id.into(), error);
    }

    /// Lookups served so far, in order.
    pub fn calls(&self) -> Vec<AuthorQuery> {
        self.calls.lock().clone()
    }

    /// Number of id lookups served for `id`.
    pub fn fetch_count(&self, id: &AuthorId) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|q| q.as_id() == Some(id))
            .count()
    }

    /// Number of profiles.
    pub fn num_profiles(&self) -> usize {
        self.profiles.len()
    }

    fn resolve(&self, query: &AuthorQuery) -> Result<AuthorId, ProviderError> {
        match query {
            AuthorQuery::Id(id) => Ok(id.clone()),
            AuthorQuery::Name(name) => self
                .names
                .get(&normalize_name(name))
                .cloned()
                .ok_or_else(|| ProviderError::NotFound(name.clone())),
        }
    }
}

#[async_trait]
impl ProfileProvider for InMemoryProfileProvider {
    async fn lookup(&self, query: &AuthorQuery) -> Result<ProfileRecord, ProviderError> {
        self.calls.lock().push(query.clone());

        let id = self.resolve(query)?;
        if let Some(error) = self.failures.get(&id) {
            return Err(error.clone());
        }
        self.profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }
}

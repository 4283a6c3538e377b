//! JSON dataset provider.
//!
//! Serves profiles from a pre-fetched dataset file:
//!
//! ```json
//! {
//!   "authors": [
//!     {
//!       "id": "232/1606",
//!       "name": "Ada Lovelace",
//!       "collaborators": [
//!         { "id": "b/Babbage", "name": "Charles Babbage", "joint_count": 3 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Name lookups are case and whitespace insensitive; when two profiles share a
//! name the first one in file order wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::query::AuthorQuery;
use crate::types::{AuthorId, ProfileRecord};
use super::memory::InMemoryProfileProvider;
use super::{ProfileProvider, ProviderError};

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The dataset is not valid JSON of the expected shape.
    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk dataset shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Author profiles.
    #[serde(default)]
    pub authors: Vec<ProfileRecord>,
}

/// Profile provider backed by a [`Dataset`].
#[derive(Debug)]
pub struct DatasetProvider {
    index: InMemoryProfileProvider,
}

impl DatasetProvider {
    /// Index a dataset.
    ///
    /// Profiles without an id are unaddressable and skipped. Later duplicates
    /// of an id are skipped.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut index = InMemoryProfileProvider::new();
        let mut seen = std::collections::BTreeSet::new();

        for (position, record) in dataset.authors.into_iter().enumerate() {
            let id = match record.id.as_deref().map(AuthorId::new) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    warn!(position, "Skipping dataset profile without id");
                    continue;
                }
            };
            if !seen.insert(id.clone()) {
                warn!(position, author = %id, "Skipping duplicate dataset profile");
                continue;
            }
            index.add_record(id, record);
        }

        Self { index }
    }

    /// Parse and index a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        Ok(Self::from_dataset(dataset))
    }

    /// Load and index a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let provider = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            profiles = provider.num_profiles(),
            "Dataset loaded"
        );
        Ok(provider)
    }

    /// Number of indexed profiles.
    pub fn num_profiles(&self) -> usize {
        self.index.num_profiles()
    }
}

#[async_trait]
impl ProfileProvider for DatasetProvider {
    async fn lookup(&self, query: &AuthorQuery) -> Result<ProfileRecord, ProviderError> {
        self.index.lookup(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"{
        "authors": [
            {"id": "a", "name": "Ada Lovelace",
             "collaborators": [{"id": "b", "name": "Charles Babbage", "joint_count": 3}]},
            {"name": "No Id"},
            {"id": "b", "name": "Charles Babbage", "collaborators": []},
            {"id": "a", "name": "Duplicate Ada", "collaborators": []}
        ]
    }"#;

    #[tokio::test]
    async fn test_load_and_lookup() {
        let provider = DatasetProvider::from_json_str(DATASET).unwrap();
        assert_eq!(provider.num_profiles(), 2);

        let ada = provider.lookup(&AuthorQuery::Name("ada lovelace".into())).await.unwrap();
        assert_eq!(ada.id.as_deref(), Some("a"));
        assert_eq!(ada.collaborators.len(), 1);

        // The first profile for an id wins.
        let by_id = provider.lookup(&AuthorQuery::Id("a".into())).await.unwrap();
        assert_eq!(by_id.name.as_deref(), Some("Ada Lovelace"));
        assert!(provider
            .lookup(&AuthorQuery::Name("Duplicate Ada".into()))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DatasetProvider::from_json_str("{\"authors\": 3}"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = DatasetProvider::from_path("/nonexistent/dataset.json").unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}

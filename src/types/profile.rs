//! Provider records and their validated forms.
//!
//! Providers hand back loosely shaped [`ProfileRecord`]s (every field optional,
//! as scraped). [`AuthorProfile::validate`] turns a record into a typed profile,
//! rejecting malformed collaborator entries individually instead of failing the
//! whole fetch.

use serde::{Deserialize, Serialize};

use super::author::AuthorId;

/// Raw profile record as returned by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Provider identifier of the profile owner.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name of the profile owner.
    #[serde(default)]
    pub name: Option<String>,
    /// Collaborators in provider order.
    #[serde(default)]
    pub collaborators: Vec<CollaboratorRecord>,
}

impl ProfileRecord {
    /// Create a well-formed record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            collaborators: Vec::new(),
        }
    }

    /// Append a well-formed collaborator entry.
    pub fn with_collaborator(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        joint_count: u32,
    ) -> Self {
        self.collaborators.push(CollaboratorRecord {
            id: Some(id.into()),
            name: Some(name.into()),
            joint_count: Some(joint_count),
        });
        self
    }
}

/// Raw collaborator entry as returned by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorRecord {
    /// Co-author identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Co-author display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Number of joint publications with the profile owner.
    #[serde(default)]
    pub joint_count: Option<u32>,
}

/// A validated collaborator entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorEntry {
    /// Co-author identifier.
    pub id: AuthorId,
    /// Co-author display name.
    pub name: String,
    /// Number of joint publications (always >= 1).
    pub joint_count: u32,
}

/// Reason a collaborator entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Missing or blank identifier.
    MissingId,
    /// Missing or blank name.
    MissingName,
    /// Missing joint-publication count.
    MissingCount,
    /// Joint-publication count of zero.
    ZeroCount,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing id"),
            Self::MissingName => write!(f, "missing name"),
            Self::MissingCount => write!(f, "missing joint count"),
            Self::ZeroCount => write!(f, "zero joint count"),
        }
    }
}

/// A collaborator entry that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRejection {
    /// Position of the entry in the provider's list.
    pub position: usize,
    /// Why it was rejected.
    pub reason: RejectionReason,
}

/// A validated author profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// Canonical identifier of the profile owner.
    pub id: AuthorId,
    /// Display name of the profile owner.
    pub name: String,
    /// Valid collaborators, in provider order.
    pub collaborators: Vec<CollaboratorEntry>,
    /// Entries dropped during validation.
    pub rejected: Vec<RecordRejection>,
}

/// Error for a profile whose owner fields are unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// The owner id is missing or blank.
    #[error("profile has no id")]
    MissingId,
    /// The owner name is missing or blank.
    #[error("profile {0} has no name")]
    MissingName(String),
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl AuthorProfile {
    /// Validate a raw record.
    ///
    /// Fails only if the owner's own id or name is unusable. Malformed
    /// collaborator entries are collected in `rejected`.
    pub fn validate(record: ProfileRecord) -> Result<Self, ProfileError> {
        let id = non_blank(record.id.as_ref()).ok_or(ProfileError::MissingId)?;
        let name = non_blank(record.name.as_ref())
            .ok_or_else(|| ProfileError::MissingName(id.to_string()))?;

        let mut collaborators = Vec::with_capacity(record.collaborators.len());
        let mut rejected = Vec::new();

        for (position, entry) in record.collaborators.iter().enumerate() {
            match validate_entry(entry) {
                Ok(valid) => collaborators.push(valid),
                Err(reason) => rejected.push(RecordRejection { position, reason }),
            }
        }

        Ok(Self {
            id: AuthorId::new(id),
            name: name.to_string(),
            collaborators,
            rejected,
        })
    }
}

fn validate_entry(entry: &CollaboratorRecord) -> Result<CollaboratorEntry, RejectionReason> {
    let id = non_blank(entry.id.as_ref()).ok_or(RejectionReason::MissingId)?;
    let name = non_blank(entry.name.as_ref()).ok_or(RejectionReason::MissingName)?;
    let joint_count = entry.joint_count.ok_or(RejectionReason::MissingCount)?;
    if joint_count == 0 {
        return Err(RejectionReason::ZeroCount);
    }
    Ok(CollaboratorEntry {
        id: AuthorId::new(id),
        name: name.to_string(),
        joint_count,
    })
}

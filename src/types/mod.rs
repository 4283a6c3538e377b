//! Core types for the co-authorship graph.

pub mod author;
pub mod collaboration;
pub mod profile;
pub mod export;

pub use author::{AuthorId, Author};
pub use collaboration::{CollaborationKey, Collaboration, CollaborationUpdate, WeightReconciliation};
pub use profile::{
    ProfileRecord, CollaboratorRecord, AuthorProfile, CollaboratorEntry,
    RecordRejection, RejectionReason, ProfileError,
};
pub use export::{GraphExport, NodeExport, EdgeExport, GraphFingerprint};

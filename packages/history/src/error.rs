//! Error types for the history store

use folio_model::{PageId, VersionId, Violations};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Version {version_id} not found for page {page_id}")]
    VersionNotFound { page_id: PageId, version_id: VersionId },

    #[error("Snapshot belongs to page {found}, expected {expected}")]
    WrongPage { expected: PageId, found: PageId },

    #[error("Expected version number {expected}, got {found}")]
    VersionOutOfSequence { expected: u32, found: u32 },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Restored tree is invalid: {0}")]
    Invariant(#[from] Violations),
}

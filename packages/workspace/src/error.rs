//! Errors surfaced by the page engine

use crate::repository::RepositoryError;
use folio_editor::MutationError;
use folio_history::HistoryError;
use folio_model::{EntityRef, ModelError, PageId, PageOrigin, Violations};
use thiserror::Error;

/// Structural edit attempted on a locked page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Page {page_id} is locked {origin} content; clone to edit")]
pub struct LockedPageError {
    pub page_id: PageId,
    pub origin: PageOrigin,
}

impl LockedPageError {
    /// What the caller has to do instead.
    pub fn required_action(&self) -> &'static str {
        "clone to edit"
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(EntityRef),

    #[error("Invariant violation: {0}")]
    InvariantViolation(Violations),

    #[error(transparent)]
    Locked(#[from] LockedPageError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Path {path} is already in use")]
    PathTaken { path: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl EngineError {
    /// Conflicts are resolved by reloading and retrying; everything else is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Conflict(_))
    }

    /// Message suitable for showing to an editor.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::NotFound(entity) => format!("The requested {} no longer exists.", entity_kind(entity)),
            EngineError::Locked(_) => "This page is locked. Create an editable copy to make changes.".to_string(),
            EngineError::Conflict(_) => "This page changed, please retry.".to_string(),
            EngineError::PathTaken { path } => format!("Another page already uses the path {path}."),
            EngineError::InvalidInput(message) => message.clone(),
            EngineError::InvariantViolation(_) | EngineError::Repository(_) => {
                "Something went wrong while saving this page.".to_string()
            }
        }
    }
}

fn entity_kind(entity: &EntityRef) -> &'static str {
    match entity {
        EntityRef::Page(_) => "page",
        EntityRef::Section(_) => "section",
        EntityRef::Component(_) => "component",
        EntityRef::Version(_) => "version",
    }
}

impl From<MutationError> for EngineError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::NotFound(entity) => EngineError::NotFound(entity),
            MutationError::SiblingMismatch { .. } => EngineError::Conflict(err.to_string()),
            MutationError::Invariant(violations) => EngineError::InvariantViolation(violations),
            MutationError::InvalidInput(message) => EngineError::InvalidInput(message),
            other => EngineError::InvalidInput(other.to_string()),
        }
    }
}

impl From<HistoryError> for EngineError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::VersionNotFound { version_id, .. } => {
                EngineError::NotFound(EntityRef::Version(version_id))
            }
            HistoryError::VersionOutOfSequence { .. } => EngineError::Conflict(err.to_string()),
            HistoryError::Invariant(violations) => EngineError::InvariantViolation(violations),
            HistoryError::WrongPage { .. } => EngineError::InvalidInput(err.to_string()),
            HistoryError::Serialization(e) => EngineError::Repository(e.to_string()),
        }
    }
}

impl From<ModelError> for EngineError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFound(entity) => EngineError::NotFound(entity),
            ModelError::Invariant(violations) => EngineError::InvariantViolation(violations),
            ModelError::InvalidPath { .. } => EngineError::InvalidInput(err.to_string()),
        }
    }
}

impl From<Violations> for EngineError {
    fn from(violations: Violations) -> Self {
        EngineError::InvariantViolation(violations)
    }
}

impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::PathTaken { path } => EngineError::PathTaken { path },
            RepositoryError::History(e) => e.into(),
            RepositoryError::Model(e) => e.into(),
            RepositoryError::Storage(message) => EngineError::Repository(message),
        }
    }
}

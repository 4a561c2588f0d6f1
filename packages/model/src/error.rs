//! Error types for the tree model

use crate::ids::{ComponentId, PageId, SectionId, VersionId};
use crate::validate::Violations;
use std::fmt;
use thiserror::Error;

/// Reference to an entity that could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Page(PageId),
    Section(SectionId),
    Component(ComponentId),
    Version(VersionId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Page(id) => write!(f, "page {id}"),
            EntityRef::Section(id) => write!(f, "section {id}"),
            EntityRef::Component(id) => write!(f, "component {id}"),
            EntityRef::Version(id) => write!(f, "version {id}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{0} not found")]
    NotFound(EntityRef),

    #[error("Invariant violation: {0}")]
    Invariant(#[from] Violations),

    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}

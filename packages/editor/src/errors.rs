//! Error types for the mutation engine

use folio_model::{ComponentId, ComponentType, EntityRef, Violations};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// A reorder did not name exactly the current siblings.
    #[error(
        "Reorder of {scope} does not match current siblings \
         ({missing} missing, {unexpected} unexpected, {duplicated} duplicated)"
    )]
    SiblingMismatch {
        scope: EntityRef,
        missing: usize,
        unexpected: usize,
        duplicated: usize,
    },

    #[error("Component {component_id} is a {from}; changing it to {to} requires remove and insert")]
    TypeChange {
        component_id: ComponentId,
        from: ComponentType,
        to: ComponentType,
    },

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Making {parent_id} the parent of {component_id} would create a cycle")]
    CycleDetected {
        component_id: ComponentId,
        parent_id: ComponentId,
    },

    #[error("Component {0} cannot hold children")]
    NotAContainer(ComponentId),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invariant violation: {0}")]
    Invariant(#[from] Violations),
}

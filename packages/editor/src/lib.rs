//! # Folio Editor
//!
//! Mutation engine for folio pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ admin UI: drag/drop, add, edit intents      │
//! └─────────────────────────────────────────────┘
//!                     ↓ Mutation
//! ┌─────────────────────────────────────────────┐
//! │ editor: validated structural edits          │
//! │  - insert/remove/update/reorder/duplicate   │
//! │  - post-effects keep the tree consistent    │
//! │  - apply_all: copy → apply → validate       │
//! │  - edit sessions with undo/redo             │
//! └─────────────────────────────────────────────┘
//!                     ↓ Page
//! ┌─────────────────────────────────────────────┐
//! │ workspace: per-page lock, commit, history   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Dense orders**: every successful mutation leaves section and
//!    component orders as `0..n-1`
//! 2. **All or nothing**: [`apply_all`] works on a copy; a failure anywhere
//!    leaves the input page untouched
//! 3. **Full-sequence reorders**: partial reorders are rejected
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{apply_all, ComponentDraft, Mutation};
//!
//! let (next, outcomes) = apply_all(&page, &[Mutation::InsertComponent {
//!     section_id,
//!     component: ComponentDraft::new("cta", content),
//!     at_index: Some(1),
//! }])?;
//! ```

mod commit;
mod errors;
mod mutations;
mod post_effects;
mod session;
mod undo_stack;

pub use commit::apply_all;
pub use errors::MutationError;
pub use mutations::{
    copy_section, ComponentChanges, ComponentDraft, Mutation, MutationOutcome, PageDetails,
    SectionChanges, SectionDraft,
};
pub use post_effects::{
    AppliedMutation, DetachOrphanedChildren, PostEffect, PostEffectEngine, PruneStalePlacements,
};
pub use session::EditSession;
pub use undo_stack::{MutationBatch, UndoStack};

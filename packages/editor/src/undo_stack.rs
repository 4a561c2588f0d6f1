//! # Page History for Editing
//!
//! Snapshot-based undo and redo over a working copy.
//!
//! Every recorded step keeps the whole page as it was before the step. Undo
//! swaps that copy back in and parks the current page for redo. Recording a
//! new step drops anything that was undone.
//!
//! Inserts and duplicates mint fresh identifiers, so replaying inverse
//! mutations could not reproduce the same tree; whole-page copies can.
//!
//! ```rust,ignore
//! let mut history = UndoStack::with_max_levels(50);
//! history.apply(&mutation, &mut page)?;
//! history.undo(&mut page);
//! ```

use crate::commit::apply_all;
use crate::errors::MutationError;
use crate::mutations::{Mutation, MutationOutcome};
use folio_model::Page;
use std::slice;

/// One undo step: the mutations it applied and the page before them.
#[derive(Debug, Clone)]
pub struct MutationBatch {
    pub mutations: Vec<Mutation>,

    pub before: Page,

    /// Label shown in undo/redo menus
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
struct UndoneBatch {
    batch: MutationBatch,
    after: Page,
}

#[derive(Debug, Default)]
struct OpenBatch {
    mutations: Vec<Mutation>,
    before: Option<Page>,
    description: Option<String>,
}

#[derive(Debug)]
pub struct UndoStack {
    undo_stack: Vec<MutationBatch>,
    redo_stack: Vec<UndoneBatch>,

    /// 0 keeps every step
    max_levels: usize,

    current_batch: Option<OpenBatch>,
}

impl UndoStack {
    /// Keeps the last 100 steps.
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Applies `mutation` to `page` and records the step.
    pub fn apply(&mut self, mutation: &Mutation, page: &mut Page) -> Result<MutationOutcome, MutationError> {
        let mut outcomes = self.apply_all(slice::from_ref(mutation), page)?;
        Ok(outcomes.pop().unwrap_or(MutationOutcome::Unchanged))
    }

    /// Applies `mutations` as one atomic step. On error `page` is untouched
    /// and nothing is recorded.
    pub fn apply_all(
        &mut self,
        mutations: &[Mutation],
        page: &mut Page,
    ) -> Result<Vec<MutationOutcome>, MutationError> {
        let (next, outcomes) = apply_all(page, mutations)?;
        let before = std::mem::replace(page, next);

        match &mut self.current_batch {
            Some(open) => {
                open.before.get_or_insert(before);
                open.mutations.extend_from_slice(mutations);
            }
            None => self.push_batch(MutationBatch {
                mutations: mutations.to_vec(),
                before,
                description: None,
            }),
        }

        Ok(outcomes)
    }

    /// Steps applied until [`end_batch`](Self::end_batch) undo as one.
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(OpenBatch::default());
    }

    pub fn end_batch(&mut self) {
        if let Some(open) = self.current_batch.take() {
            if let (Some(before), false) = (open.before, open.mutations.is_empty()) {
                self.push_batch(MutationBatch {
                    mutations: open.mutations,
                    before,
                    description: open.description,
                });
            }
        }
    }

    /// No-op outside a batch.
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(open) = &mut self.current_batch {
            open.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Undone steps no longer apply on top of the new page.
        self.redo_stack.clear();
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, page: &mut Page) -> bool {
        match self.undo_stack.pop() {
            Some(batch) => {
                let after = std::mem::replace(page, batch.before.clone());
                self.redo_stack.push(UndoneBatch { batch, after });
                true
            }
            None => false,
        }
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, page: &mut Page) -> bool {
        match self.redo_stack.pop() {
            Some(UndoneBatch { batch, after }) => {
                *page = after;
                self.undo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Label of the step [`undo`](Self::undo) would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|undone| undone.batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

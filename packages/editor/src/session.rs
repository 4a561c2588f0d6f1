//! # Edit Sessions
//!
//! An EditSession is one editor's detached working copy of a page. Edits
//! land on the copy only; nothing is persisted until the owner commits the
//! session, and dropping it discards every change.
//!
//! The session remembers the page revision it started from so a commit can
//! detect that someone else changed the page in the meantime.

use crate::errors::MutationError;
use crate::mutations::{Mutation, MutationOutcome};
use crate::undo_stack::UndoStack;
use folio_model::{Page, PageId};

/// Detached working copy of one page
#[derive(Debug)]
pub struct EditSession {
    base: Page,
    working: Page,
    undo: UndoStack,
}

impl EditSession {
    /// Create a session starting from `page` as loaded.
    pub fn new(page: Page) -> Self {
        Self::with_max_undo_levels(page, 100)
    }

    pub fn with_max_undo_levels(page: Page, max_undo_levels: usize) -> Self {
        Self {
            working: page.clone(),
            base: page,
            undo: UndoStack::with_max_levels(max_undo_levels),
        }
    }

    pub fn page_id(&self) -> PageId {
        self.base.id
    }

    /// Revision of the page when the session was opened
    pub fn base_revision(&self) -> u64 {
        self.base.revision
    }

    /// Page as loaded when the session was opened
    pub fn base(&self) -> &Page {
        &self.base
    }

    /// Current working copy
    pub fn page(&self) -> &Page {
        &self.working
    }

    /// True when the working copy differs from the loaded page
    pub fn is_dirty(&self) -> bool {
        self.working.sections != self.base.sections
            || self.working.title != self.base.title
            || self.working.path != self.base.path
            || self.working.description != self.base.description
            || self.working.page_type != self.base.page_type
            || self.working.seo != self.base.seo
    }

    /// Apply one mutation to the working copy
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationOutcome, MutationError> {
        self.undo.apply(&mutation, &mut self.working)
    }

    /// Apply several mutations as one atomic, undoable step
    pub fn apply_batch(
        &mut self,
        description: impl Into<String>,
        mutations: &[Mutation],
    ) -> Result<Vec<MutationOutcome>, MutationError> {
        self.undo.begin_batch();
        self.undo.set_batch_description(description);
        let result = self.undo.apply_all(mutations, &mut self.working);
        self.undo.end_batch();
        result
    }

    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.working)
    }

    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.working)
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    /// Consume the session, yielding the base revision and the working copy
    pub fn into_parts(self) -> (u64, Page) {
        (self.base.revision, self.working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::{ComponentDraft, SectionDraft};
    use folio_model::{ComponentContent, LayoutKind, SectionId, TenantId};

    fn session() -> EditSession {
        let mut page = Page::new(TenantId::new(), "Home", "/");
        page.revision = 7;
        EditSession::new(page)
    }

    #[test]
    fn test_new_session_is_clean() {
        let session = session();
        assert_eq!(session.base_revision(), 7);
        assert!(!session.is_dirty());
        assert!(!session.undo_stack().can_undo());
    }

    #[test]
    fn test_edits_stay_on_working_copy() {
        let mut session = session();
        let section_id = session
            .apply(Mutation::InsertSection {
                section: SectionDraft::new("Hero", LayoutKind::Single),
                at_index: None,
            })
            .unwrap()
            .section_id()
            .unwrap();

        assert!(session.is_dirty());
        assert_eq!(session.page().sections.len(), 1);
        assert!(session.base().sections.is_empty());
        assert_eq!(session.page().sections[0].id, section_id);
    }

    #[test]
    fn test_failed_batch_is_not_recorded() {
        let mut session = session();
        let result = session.apply_batch(
            "broken",
            &[
                Mutation::InsertSection {
                    section: SectionDraft::new("Hero", LayoutKind::Single),
                    at_index: None,
                },
                Mutation::InsertComponent {
                    section_id: SectionId::new(),
                    component: ComponentDraft::new("x", ComponentContent::Spacer { height: 1 }),
                    at_index: None,
                },
            ],
        );

        assert!(result.is_err());
        assert!(!session.is_dirty());
        assert!(!session.undo_stack().can_undo());
    }

    #[test]
    fn test_undo_back_to_clean() {
        let mut session = session();
        session
            .apply(Mutation::InsertSection {
                section: SectionDraft::new("Hero", LayoutKind::Single),
                at_index: None,
            })
            .unwrap();
        assert!(session.undo());
        assert!(!session.is_dirty());
        assert!(!session.undo());
    }
}

//! Atomic application of a mutation list.

use crate::errors::MutationError;
use crate::mutations::{Mutation, MutationOutcome};
use crate::post_effects::PostEffectEngine;
use folio_model::{validate, Page};
use tracing::{debug, warn};

/// Applies `mutations` in order to a copy of `page`, then validates it.
///
/// On success the new page and one outcome per mutation are returned. On any
/// failure `page` is untouched and nothing is returned, so a caller can only
/// ever persist a fully applied, validated tree.
pub fn apply_all(page: &Page, mutations: &[Mutation]) -> Result<(Page, Vec<MutationOutcome>), MutationError> {
    let engine = PostEffectEngine::new();
    let mut working = page.clone();
    let mut outcomes = Vec::with_capacity(mutations.len());

    for (index, mutation) in mutations.iter().enumerate() {
        match engine.apply_with_effects(mutation, &mut working) {
            Ok(applied) => {
                debug!(
                    page_id = %page.id,
                    op = mutation.kind(),
                    effects = applied.effects.len(),
                    "Applied mutation"
                );
                outcomes.push(applied.outcome);
            }
            Err(e) => {
                debug!(page_id = %page.id, op = mutation.kind(), index, error = %e, "Mutation rejected");
                return Err(e);
            }
        }
    }

    if let Err(violations) = validate(&working) {
        warn!(page_id = %page.id, violations = %violations, "Mutated tree failed validation");
        return Err(MutationError::Invariant(violations));
    }

    Ok((working, outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::ComponentDraft;
    use folio_model::{ComponentContent, LayoutKind, Section, SectionId, TenantId};
    use pretty_assertions::assert_eq;

    fn page() -> (Page, SectionId) {
        let mut page = Page::new(TenantId::new(), "Home", "/");
        let section = Section::new(page.id, "Body", LayoutKind::Single);
        let id = section.id;
        page.sections.push(section);
        (page, id)
    }

    #[test]
    fn test_failure_leaves_input_untouched() {
        let (page, section_id) = page();
        let before = page.clone();

        let result = apply_all(
            &page,
            &[
                Mutation::InsertComponent {
                    section_id,
                    component: ComponentDraft::new("a", ComponentContent::Spacer { height: 1 }),
                    at_index: None,
                },
                Mutation::RemoveSection {
                    section_id: SectionId::new(),
                },
            ],
        );

        assert!(result.is_err());
        assert_eq!(page, before);
    }

    #[test]
    fn test_invalid_tree_is_rejected() {
        let (mut page, _) = page();
        page.published = true;
        page.title.clear();

        let result = apply_all(&page, &[]);
        assert!(matches!(result, Err(MutationError::Invariant(_))));
    }

    #[test]
    fn test_outcomes_follow_input_order() {
        let (page, section_id) = page();
        let (next, outcomes) = apply_all(
            &page,
            &[
                Mutation::InsertComponent {
                    section_id,
                    component: ComponentDraft::new("a", ComponentContent::Spacer { height: 1 }),
                    at_index: None,
                },
                Mutation::MoveSectionUp { section_id },
            ],
        )
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[1], MutationOutcome::Unchanged);
        assert_eq!(next.component_count(), 1);
    }
}

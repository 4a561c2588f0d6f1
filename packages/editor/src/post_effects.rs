//! # Secondary Mutations
//!
//! Mutations trigger follow-up mutations that keep the rest of the page
//! consistent with the primary change.
//!
//! ## Design
//!
//! - Removing a component → its nested children are detached (parent set to
//!   none), never removed with it
//! - Removing a component or changing a section's custom regions → stale
//!   custom-layout placements are dropped
//!
//! Effects inspect the page *after* the primary mutation and return
//! secondary mutations. They are deterministic, and secondary mutations do
//! not trigger further effects.

use crate::errors::MutationError;
use crate::mutations::{ComponentChanges, Mutation, MutationOutcome, SectionChanges};
use folio_model::Page;
use std::collections::HashSet;

/// Derives follow-up mutations that keep the tree consistent after a primary one.
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Analyze the applied mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation>;
}

/// Detach children whose parent component was removed
#[derive(Debug)]
pub struct DetachOrphanedChildren;

impl PostEffect for DetachOrphanedChildren {
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        match mutation {
            Mutation::RemoveComponent { component_id } => page
                .components()
                .filter(|c| c.parent_id.as_ref() == Some(component_id))
                .map(|c| Mutation::UpdateComponent {
                    component_id: c.id,
                    changes: ComponentChanges::reparent(None),
                })
                .collect(),
            _ => vec![],
        }
    }
}

/// Drop custom-layout placements naming a missing component or region
#[derive(Debug)]
pub struct PruneStalePlacements;

impl PostEffect for PruneStalePlacements {
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        if !matches!(
            mutation,
            Mutation::RemoveComponent { .. } | Mutation::UpdateSection { .. }
        ) {
            return vec![];
        }

        page.sections
            .iter()
            .filter_map(|section| {
                let custom = section.settings.custom_layout.as_ref()?;
                let present: HashSet<_> = section.components.iter().map(|c| c.id).collect();
                let mut pruned = custom.clone();
                pruned
                    .placements
                    .retain(|id, region| present.contains(id) && custom.has_region(region));
                if pruned.placements.len() == custom.placements.len() {
                    return None;
                }

                let mut settings = section.settings.clone();
                settings.custom_layout = Some(pruned);
                Some(Mutation::UpdateSection {
                    section_id: section.id,
                    changes: SectionChanges {
                        settings: Some(settings),
                        ..SectionChanges::default()
                    },
                })
            })
            .collect()
    }
}

/// Primary mutation result plus the secondary mutations it caused
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMutation {
    pub outcome: MutationOutcome,
    pub effects: Vec<Mutation>,
}

/// Runs a mutation followed by whatever the registered effects derive from it.
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Orphan detachment and placement pruning.
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(DetachOrphanedChildren), Box::new(PruneStalePlacements)],
        }
    }

    /// Follow-ups for `mutation`, computed against the page it was applied to.
    pub fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, page))
            .collect()
    }

    /// Applies `mutation`, then its follow-ups. Follow-ups do not cascade.
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        page: &mut Page,
    ) -> Result<AppliedMutation, MutationError> {
        let outcome = mutation.apply(page)?;

        let effects = self.analyze(mutation, page);
        for effect in &effects {
            effect.apply(page)?;
        }

        Ok(AppliedMutation { outcome, effects })
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

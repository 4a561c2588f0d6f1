//! # Tree Validation
//!
//! Structural invariant checks for a page aggregate. Used as a guard before
//! every commit and as a test oracle.
//!
//! ## Checked invariants
//!
//! - Section `order` equals its position (dense `0..n-1`, sorted)
//! - Component `order` equals its position within its section
//! - Section and component identifiers are unique across the page
//! - Every section's `page_id` matches the page
//! - Every component's `section_id` matches its containing section
//! - Parent components exist in the same section and form no cycles
//! - Custom-layout placements name a declared region
//! - A published page has a non-empty title and path

use crate::ids::{ComponentId, PageId, SectionId};
use crate::page::Page;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("section orders on page {page_id} are not dense: {found:?}")]
    SectionOrderNotDense { page_id: PageId, found: Vec<u32> },

    #[error("component orders in section {section_id} are not dense: {found:?}")]
    ComponentOrderNotDense { section_id: SectionId, found: Vec<u32> },

    #[error("duplicate section id {0}")]
    DuplicateSectionId(SectionId),

    #[error("duplicate component id {0}")]
    DuplicateComponentId(ComponentId),

    #[error("section {section_id} belongs to page {found}, expected {expected}")]
    SectionPageMismatch {
        section_id: SectionId,
        expected: PageId,
        found: PageId,
    },

    #[error("component {component_id} claims section {found} but lives in {expected}")]
    ComponentSectionMismatch {
        component_id: ComponentId,
        expected: SectionId,
        found: SectionId,
    },

    #[error("component {component_id} references missing parent {parent_id}")]
    MissingParent {
        component_id: ComponentId,
        parent_id: ComponentId,
    },

    #[error("component {component_id} is part of a parent cycle")]
    ParentCycle { component_id: ComponentId },

    #[error("component {component_id} is placed in unknown region {region:?}")]
    UnknownRegion {
        section_id: SectionId,
        component_id: ComponentId,
        region: String,
    },

    #[error("published page {0} has an empty title")]
    PublishedWithoutTitle(PageId),

    #[error("published page {0} has an empty path")]
    PublishedWithoutPath(PageId),
}

/// Non-empty list of violations found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<InvariantViolation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &InvariantViolation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<InvariantViolation> for Violations {
    fn from(violation: InvariantViolation) -> Self {
        Violations(vec![violation])
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// Checks every structural invariant of `page`, collecting all violations.
pub fn validate(page: &Page) -> Result<(), Violations> {
    let mut violations = Vec::new();

    if page.published {
        if page.title.trim().is_empty() {
            violations.push(InvariantViolation::PublishedWithoutTitle(page.id));
        }
        if page.path.trim().is_empty() {
            violations.push(InvariantViolation::PublishedWithoutPath(page.id));
        }
    }

    let section_orders: Vec<u32> = page.sections.iter().map(|s| s.order).collect();
    if !is_dense(&section_orders) {
        violations.push(InvariantViolation::SectionOrderNotDense {
            page_id: page.id,
            found: section_orders,
        });
    }

    let mut section_ids = HashSet::new();
    let mut component_ids = HashSet::new();

    for section in &page.sections {
        if !section_ids.insert(section.id) {
            violations.push(InvariantViolation::DuplicateSectionId(section.id));
        }
        if section.page_id != page.id {
            violations.push(InvariantViolation::SectionPageMismatch {
                section_id: section.id,
                expected: page.id,
                found: section.page_id,
            });
        }

        let orders: Vec<u32> = section.components.iter().map(|c| c.order).collect();
        if !is_dense(&orders) {
            violations.push(InvariantViolation::ComponentOrderNotDense {
                section_id: section.id,
                found: orders,
            });
        }

        let parents: HashMap<ComponentId, Option<ComponentId>> = section
            .components
            .iter()
            .map(|c| (c.id, c.parent_id))
            .collect();

        for component in &section.components {
            if !component_ids.insert(component.id) {
                violations.push(InvariantViolation::DuplicateComponentId(component.id));
            }
            if component.section_id != section.id {
                violations.push(InvariantViolation::ComponentSectionMismatch {
                    component_id: component.id,
                    expected: section.id,
                    found: component.section_id,
                });
            }
            if let Some(parent_id) = component.parent_id {
                if !parents.contains_key(&parent_id) {
                    violations.push(InvariantViolation::MissingParent {
                        component_id: component.id,
                        parent_id,
                    });
                } else if in_cycle(component.id, &parents) {
                    violations.push(InvariantViolation::ParentCycle {
                        component_id: component.id,
                    });
                }
            }
        }

        if let Some(custom) = &section.settings.custom_layout {
            for (component_id, region) in &custom.placements {
                if parents.contains_key(component_id) && !custom.has_region(region) {
                    violations.push(InvariantViolation::UnknownRegion {
                        section_id: section.id,
                        component_id: *component_id,
                        region: region.clone(),
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Violations(violations))
    }
}

/// True when `orders[i] == i` for every position.
fn is_dense(orders: &[u32]) -> bool {
    orders
        .iter()
        .enumerate()
        .all(|(index, order)| *order as usize == index)
}

fn in_cycle(start: ComponentId, parents: &HashMap<ComponentId, Option<ComponentId>>) -> bool {
    let mut current = parents.get(&start).copied().flatten();
    // A chain longer than the map must revisit a node.
    for _ in 0..parents.len() {
        match current {
            Some(id) if id == start => return true,
            Some(id) => current = parents.get(&id).copied().flatten(),
            None => return false,
        }
    }
    current.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::content::ComponentContent;
    use crate::ids::TenantId;
    use crate::section::{CustomLayout, LayoutKind, Section};

    fn page_with_components(count: usize) -> Page {
        let mut page = Page::new(TenantId::new(), "Home", "/");
        let mut section = Section::new(page.id, "Main", LayoutKind::Single);
        for i in 0..count {
            let mut c = Component::new(
                section.id,
                format!("p{i}"),
                ComponentContent::Paragraph {
                    text: format!("{i}"),
                },
            );
            c.order = i as u32;
            section.components.push(c);
        }
        page.sections.push(section);
        page
    }

    #[test]
    fn test_valid_page_passes() {
        assert!(validate(&page_with_components(3)).is_ok());
        assert!(validate(&page_with_components(0)).is_ok());
    }

    #[test]
    fn test_gap_in_component_order() {
        let mut page = page_with_components(3);
        page.sections[0].components[2].order = 5;
        let err = validate(&page).unwrap_err();
        assert!(matches!(
            err.0[0],
            InvariantViolation::ComponentOrderNotDense { .. }
        ));
    }

    #[test]
    fn test_duplicate_order_is_not_dense() {
        let mut page = page_with_components(2);
        page.sections[0].components[1].order = 0;
        assert!(validate(&page).is_err());
    }

    #[test]
    fn test_section_mismatch_detected() {
        let mut page = page_with_components(1);
        page.sections[0].components[0].section_id = SectionId::new();
        let err = validate(&page).unwrap_err();
        assert!(err
            .iter()
            .any(|v| matches!(v, InvariantViolation::ComponentSectionMismatch { .. })));
    }

    #[test]
    fn test_duplicate_component_id_detected() {
        let mut page = page_with_components(2);
        let id = page.sections[0].components[0].id;
        page.sections[0].components[1].id = id;
        let err = validate(&page).unwrap_err();
        assert!(err
            .iter()
            .any(|v| *v == InvariantViolation::DuplicateComponentId(id)));
    }

    #[test]
    fn test_parent_cycle_detected() {
        let mut page = page_with_components(2);
        let a = page.sections[0].components[0].id;
        let b = page.sections[0].components[1].id;
        page.sections[0].components[0].parent_id = Some(b);
        page.sections[0].components[1].parent_id = Some(a);
        let err = validate(&page).unwrap_err();
        assert!(err
            .iter()
            .any(|v| matches!(v, InvariantViolation::ParentCycle { .. })));
    }

    #[test]
    fn test_missing_parent_detected() {
        let mut page = page_with_components(1);
        page.sections[0].components[0].parent_id = Some(ComponentId::new());
        let err = validate(&page).unwrap_err();
        assert!(matches!(err.0[0], InvariantViolation::MissingParent { .. }));
    }

    #[test]
    fn test_published_page_needs_title() {
        let mut page = page_with_components(0);
        page.published = true;
        page.title = "  ".to_string();
        let err = validate(&page).unwrap_err();
        assert_eq!(err.0, vec![InvariantViolation::PublishedWithoutTitle(page.id)]);
    }

    #[test]
    fn test_unknown_custom_region() {
        let mut page = page_with_components(1);
        let id = page.sections[0].components[0].id;
        page.sections[0].layout = LayoutKind::Custom;
        page.sections[0].settings.custom_layout =
            Some(CustomLayout::new(["hero"]).place(id, "footer"));
        let err = validate(&page).unwrap_err();
        assert!(matches!(err.0[0], InvariantViolation::UnknownRegion { .. }));
    }
}

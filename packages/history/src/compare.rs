//! Change classification and structural comparison of page trees.

use crate::snapshot::ChangeType;
use folio_model::{Component, ComponentId, Page, Section, SectionId};
use serde::Serialize;
use std::collections::HashMap;

/// Classifies the change from `previous` to `current`.
///
/// Checked in order: no previous version → `create`; different section id
/// sequence → `layout`; different SEO metadata → `seo`; different section
/// layout kind or settings → `style`; anything else → `update`.
pub fn detect_change_type(previous: Option<&Page>, current: &Page) -> ChangeType {
    let Some(previous) = previous else {
        return ChangeType::Create;
    };

    let ids = |page: &Page| page.sections.iter().map(|s| s.id).collect::<Vec<_>>();
    if ids(previous) != ids(current) {
        return ChangeType::Layout;
    }

    if previous.seo != current.seo {
        return ChangeType::Seo;
    }

    let styled = previous
        .sections
        .iter()
        .zip(&current.sections)
        .any(|(a, b)| a.layout != b.layout || a.settings != b.settings);
    if styled {
        return ChangeType::Style;
    }

    ChangeType::Update
}

/// Fields of a component that differ between two trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentChange {
    pub component_id: ComponentId,
    pub fields: Vec<&'static str>,
}

/// Structural difference between two section trees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TreeDiff {
    pub added_sections: Vec<SectionId>,
    pub removed_sections: Vec<SectionId>,
    /// Sections present on both sides whose name, layout or settings changed
    pub changed_sections: Vec<SectionId>,
    /// Relative order of the common sections differs
    pub section_order_changed: bool,
    pub added_components: Vec<ComponentId>,
    pub removed_components: Vec<ComponentId>,
    pub changed_components: Vec<ComponentChange>,
}

impl TreeDiff {
    pub fn is_empty(&self) -> bool {
        self.added_sections.is_empty()
            && self.removed_sections.is_empty()
            && self.changed_sections.is_empty()
            && !self.section_order_changed
            && self.added_components.is_empty()
            && self.removed_components.is_empty()
            && self.changed_components.is_empty()
    }
}

/// Compares two section trees; `before` is the older side.
pub fn compare(before: &[Section], after: &[Section]) -> TreeDiff {
    let mut diff = TreeDiff::default();

    let old_sections: HashMap<SectionId, &Section> = before.iter().map(|s| (s.id, s)).collect();
    let new_sections: HashMap<SectionId, &Section> = after.iter().map(|s| (s.id, s)).collect();

    for section in after {
        match old_sections.get(&section.id) {
            None => diff.added_sections.push(section.id),
            Some(old) => {
                if old.name != section.name || old.layout != section.layout || old.settings != section.settings {
                    diff.changed_sections.push(section.id);
                }
            }
        }
    }
    diff.removed_sections = before
        .iter()
        .filter(|s| !new_sections.contains_key(&s.id))
        .map(|s| s.id)
        .collect();

    let common_before: Vec<SectionId> = before
        .iter()
        .map(|s| s.id)
        .filter(|id| new_sections.contains_key(id))
        .collect();
    let common_after: Vec<SectionId> = after
        .iter()
        .map(|s| s.id)
        .filter(|id| old_sections.contains_key(id))
        .collect();
    diff.section_order_changed = common_before != common_after;

    let old_components: HashMap<ComponentId, &Component> =
        before.iter().flat_map(|s| s.components.iter()).map(|c| (c.id, c)).collect();
    let new_components: HashMap<ComponentId, &Component> =
        after.iter().flat_map(|s| s.components.iter()).map(|c| (c.id, c)).collect();

    for component in after.iter().flat_map(|s| s.components.iter()) {
        match old_components.get(&component.id) {
            None => diff.added_components.push(component.id),
            Some(old) => {
                let fields = changed_fields(old, component);
                if !fields.is_empty() {
                    diff.changed_components.push(ComponentChange {
                        component_id: component.id,
                        fields,
                    });
                }
            }
        }
    }
    diff.removed_components = before
        .iter()
        .flat_map(|s| s.components.iter())
        .filter(|c| !new_components.contains_key(&c.id))
        .map(|c| c.id)
        .collect();

    diff
}

fn changed_fields(a: &Component, b: &Component) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if a.name != b.name {
        fields.push("name");
    }
    if a.content != b.content {
        fields.push("content");
    }
    if a.section_id != b.section_id {
        fields.push("section");
    }
    if a.order != b.order {
        fields.push("order");
    }
    if a.parent_id != b.parent_id {
        fields.push("parent");
    }
    if a.hidden != b.hidden {
        fields.push("hidden");
    }
    fields
}

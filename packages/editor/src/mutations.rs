//! # Page Mutations
//!
//! Structural operations on a page tree. Every variant leaves section and
//! component orders dense when it succeeds.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation names one editor action
//! 2. **Validated**: preconditions are checked before anything is touched
//! 3. **Whole-sequence reorders**: the caller submits the complete sibling
//!    order; `Move*Up/Down` are thin wrappers that compute it
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Fresh identifier, placed at `at_index` (default: end)
//! - Later siblings shift by one
//!
//! ### Remove
//! - Remaining siblings are renumbered to close the gap
//! - Nested children of a removed component are detached (see post-effects)
//!
//! ### Reorder
//! - Identifier list must match current siblings exactly; otherwise nothing
//!   changes and `SiblingMismatch` is returned
//!
//! ### Duplicate
//! - Deep copy with fresh identifiers, appended at the end of the section
//!   (component) or page (section)

use crate::errors::MutationError;
use chrono::Utc;
use folio_model::{
    normalize_path, Component, ComponentContent, ComponentId, EntityRef, LayoutKind, Page,
    PageId, PageType, Section, SectionId, SectionSettings, SeoMetadata,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Component to be inserted. The identifier is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDraft {
    pub name: String,
    pub content: ComponentContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ComponentId>,
    #[serde(default)]
    pub hidden: bool,
}

impl ComponentDraft {
    pub fn new(name: impl Into<String>, content: ComponentContent) -> Self {
        Self {
            name: name.into(),
            content,
            parent_id: None,
            hidden: false,
        }
    }

    pub fn with_parent(mut self, parent_id: ComponentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Field updates for an existing component. `None` leaves a field as is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Must keep the component's type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ComponentContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// `Some(None)` detaches the component from its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<ComponentId>>,
}

impl ComponentChanges {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn content(content: ComponentContent) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn hidden(hidden: bool) -> Self {
        Self {
            hidden: Some(hidden),
            ..Self::default()
        }
    }

    pub fn reparent(parent_id: Option<ComponentId>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }
}

/// Section to be inserted. The identifier is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub layout: LayoutKind,
    #[serde(default)]
    pub settings: SectionSettings,
}

impl SectionDraft {
    pub fn new(name: impl Into<String>, layout: LayoutKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            layout,
            settings: SectionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SectionSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SectionSettings>,
}

/// Page-level metadata updates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoMetadata>,
}

/// Semantic mutations on a page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    InsertComponent {
        section_id: SectionId,
        component: ComponentDraft,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at_index: Option<usize>,
    },

    RemoveComponent {
        component_id: ComponentId,
    },

    UpdateComponent {
        component_id: ComponentId,
        changes: ComponentChanges,
    },

    /// Complete new order of a section's components
    ReorderComponents {
        section_id: SectionId,
        order: Vec<ComponentId>,
    },

    DuplicateComponent {
        component_id: ComponentId,
    },

    MoveComponentUp {
        component_id: ComponentId,
    },

    MoveComponentDown {
        component_id: ComponentId,
    },

    InsertSection {
        section: SectionDraft,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at_index: Option<usize>,
    },

    RemoveSection {
        section_id: SectionId,
    },

    UpdateSection {
        section_id: SectionId,
        changes: SectionChanges,
    },

    /// Complete new order of the page's sections
    ReorderSections {
        order: Vec<SectionId>,
    },

    DuplicateSection {
        section_id: SectionId,
    },

    MoveSectionUp {
        section_id: SectionId,
    },

    MoveSectionDown {
        section_id: SectionId,
    },

    UpdatePageDetails {
        details: PageDetails,
    },
}

/// What a successfully applied mutation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// A component was created (insert or duplicate)
    Component(ComponentId),
    /// A section was created (insert or duplicate)
    Section(SectionId),
    Updated,
    /// Boundary move; nothing changed
    Unchanged,
}

impl MutationOutcome {
    pub fn component_id(&self) -> Option<ComponentId> {
        match self {
            MutationOutcome::Component(id) => Some(*id),
            _ => None,
        }
    }

    pub fn section_id(&self) -> Option<SectionId> {
        match self {
            MutationOutcome::Section(id) => Some(*id),
            _ => None,
        }
    }
}

impl Mutation {
    /// Short operation name for logs and undo descriptions.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::InsertComponent { .. } => "insert_component",
            Mutation::RemoveComponent { .. } => "remove_component",
            Mutation::UpdateComponent { .. } => "update_component",
            Mutation::ReorderComponents { .. } => "reorder_components",
            Mutation::DuplicateComponent { .. } => "duplicate_component",
            Mutation::MoveComponentUp { .. } => "move_component_up",
            Mutation::MoveComponentDown { .. } => "move_component_down",
            Mutation::InsertSection { .. } => "insert_section",
            Mutation::RemoveSection { .. } => "remove_section",
            Mutation::UpdateSection { .. } => "update_section",
            Mutation::ReorderSections { .. } => "reorder_sections",
            Mutation::DuplicateSection { .. } => "duplicate_section",
            Mutation::MoveSectionUp { .. } => "move_section_up",
            Mutation::MoveSectionDown { .. } => "move_section_down",
            Mutation::UpdatePageDetails { .. } => "update_page_details",
        }
    }

    /// Apply mutation to the page with validation
    pub fn apply(&self, page: &mut Page) -> Result<MutationOutcome, MutationError> {
        self.validate(page)?;

        match self {
            Mutation::InsertComponent {
                section_id,
                component,
                at_index,
            } => Self::apply_insert_component(page, section_id, component, *at_index),

            Mutation::RemoveComponent { component_id } => {
                Self::apply_remove_component(page, component_id)
            }

            Mutation::UpdateComponent {
                component_id,
                changes,
            } => Self::apply_update_component(page, component_id, changes),

            Mutation::ReorderComponents { section_id, order } => {
                Self::apply_reorder_components(page, section_id, order)
            }

            Mutation::DuplicateComponent { component_id } => {
                Self::apply_duplicate_component(page, component_id)
            }

            Mutation::MoveComponentUp { component_id } => {
                Self::apply_move_component(page, component_id, Direction::Up)
            }

            Mutation::MoveComponentDown { component_id } => {
                Self::apply_move_component(page, component_id, Direction::Down)
            }

            Mutation::InsertSection { section, at_index } => {
                Self::apply_insert_section(page, section, *at_index)
            }

            Mutation::RemoveSection { section_id } => {
                let index = section_index(page, section_id)?;
                page.sections.remove(index);
                page.renumber_sections();
                Ok(MutationOutcome::Updated)
            }

            Mutation::UpdateSection {
                section_id,
                changes,
            } => Self::apply_update_section(page, section_id, changes),

            Mutation::ReorderSections { order } => Self::apply_reorder_sections(page, order),

            Mutation::DuplicateSection { section_id } => {
                Self::apply_duplicate_section(page, section_id)
            }

            Mutation::MoveSectionUp { section_id } => {
                Self::apply_move_section(page, section_id, Direction::Up)
            }

            Mutation::MoveSectionDown { section_id } => {
                Self::apply_move_section(page, section_id, Direction::Down)
            }

            Mutation::UpdatePageDetails { details } => Self::apply_page_details(page, details),
        }
    }

    /// Check preconditions without modifying the page
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        match self {
            Mutation::InsertComponent {
                section_id,
                component,
                at_index,
            } => {
                let section = &page.sections[section_index(page, section_id)?];
                if let Some(index) = at_index {
                    check_index(*index, section.components.len())?;
                }
                check_content(&component.content)?;
                if let Some(parent_id) = &component.parent_id {
                    check_parent(section, parent_id)?;
                }
                Ok(())
            }

            Mutation::RemoveComponent { component_id }
            | Mutation::DuplicateComponent { component_id }
            | Mutation::MoveComponentUp { component_id }
            | Mutation::MoveComponentDown { component_id } => {
                locate(page, component_id).map(|_| ())
            }

            Mutation::UpdateComponent {
                component_id,
                changes,
            } => {
                let (s, c) = locate(page, component_id)?;
                let section = &page.sections[s];
                let existing = &section.components[c];

                if let Some(content) = &changes.content {
                    let (from, to) = (existing.component_type(), content.component_type());
                    if from != to {
                        return Err(MutationError::TypeChange {
                            component_id: *component_id,
                            from,
                            to,
                        });
                    }
                    check_content(content)?;
                }

                if let Some(Some(parent_id)) = &changes.parent_id {
                    check_parent(section, parent_id)?;
                    if section.subtree_ids(component_id).contains(parent_id) {
                        return Err(MutationError::CycleDetected {
                            component_id: *component_id,
                            parent_id: *parent_id,
                        });
                    }
                }
                Ok(())
            }

            Mutation::ReorderComponents { section_id, order } => {
                let section = &page.sections[section_index(page, section_id)?];
                let current: Vec<ComponentId> = section.components.iter().map(|c| c.id).collect();
                check_siblings(&current, order, EntityRef::Section(*section_id))
            }

            Mutation::InsertSection { at_index, .. } => match at_index {
                Some(index) => check_index(*index, page.sections.len()),
                None => Ok(()),
            },

            Mutation::RemoveSection { section_id }
            | Mutation::UpdateSection { section_id, .. }
            | Mutation::DuplicateSection { section_id }
            | Mutation::MoveSectionUp { section_id }
            | Mutation::MoveSectionDown { section_id } => {
                section_index(page, section_id).map(|_| ())
            }

            Mutation::ReorderSections { order } => {
                let current: Vec<SectionId> = page.sections.iter().map(|s| s.id).collect();
                check_siblings(&current, order, EntityRef::Page(page.id))
            }

            Mutation::UpdatePageDetails { details } => {
                if details.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
                    return Err(MutationError::InvalidInput("page title must not be empty".to_string()));
                }
                if let Some(path) = &details.path {
                    normalize_path(path).map_err(|e| MutationError::InvalidPath(e.to_string()))?;
                }
                Ok(())
            }
        }
    }

    fn apply_insert_component(
        page: &mut Page,
        section_id: &SectionId,
        draft: &ComponentDraft,
        at_index: Option<usize>,
    ) -> Result<MutationOutcome, MutationError> {
        let s = section_index(page, section_id)?;
        let section = &mut page.sections[s];

        let mut component = Component::new(section.id, draft.name.clone(), draft.content.clone());
        component.parent_id = draft.parent_id;
        component.hidden = draft.hidden;
        let id = component.id;

        let index = at_index.unwrap_or(section.components.len());
        section.components.insert(index, component);
        section.renumber();
        section.updated_at = Utc::now();

        Ok(MutationOutcome::Component(id))
    }

    fn apply_remove_component(
        page: &mut Page,
        component_id: &ComponentId,
    ) -> Result<MutationOutcome, MutationError> {
        let (s, c) = locate(page, component_id)?;
        let section = &mut page.sections[s];
        section.components.remove(c);
        section.renumber();
        section.updated_at = Utc::now();
        Ok(MutationOutcome::Updated)
    }

    fn apply_update_component(
        page: &mut Page,
        component_id: &ComponentId,
        changes: &ComponentChanges,
    ) -> Result<MutationOutcome, MutationError> {
        let (s, c) = locate(page, component_id)?;
        let component = &mut page.sections[s].components[c];

        if let Some(name) = &changes.name {
            component.name = name.clone();
        }
        if let Some(content) = &changes.content {
            component.content = content.clone();
        }
        if let Some(hidden) = changes.hidden {
            component.hidden = hidden;
        }
        if let Some(parent_id) = changes.parent_id {
            component.parent_id = parent_id;
        }
        component.updated_at = Utc::now();

        Ok(MutationOutcome::Updated)
    }

    fn apply_reorder_components(
        page: &mut Page,
        section_id: &SectionId,
        order: &[ComponentId],
    ) -> Result<MutationOutcome, MutationError> {
        let s = section_index(page, section_id)?;
        let section = &mut page.sections[s];
        let rank = ranks(order);
        section
            .components
            .sort_by_key(|c| rank.get(&c.id).copied().unwrap_or(usize::MAX));
        section.renumber();
        section.updated_at = Utc::now();
        Ok(MutationOutcome::Updated)
    }

    fn apply_duplicate_component(
        page: &mut Page,
        component_id: &ComponentId,
    ) -> Result<MutationOutcome, MutationError> {
        let (s, _) = locate(page, component_id)?;
        let section = &mut page.sections[s];

        let subtree = section.subtree_ids(component_id);
        let fresh: HashMap<ComponentId, ComponentId> =
            subtree.iter().map(|id| (*id, ComponentId::new())).collect();
        let now = Utc::now();

        let copies: Vec<Component> = section
            .components
            .iter()
            .filter(|c| fresh.contains_key(&c.id))
            .map(|original| {
                let mut copy = original.clone();
                copy.id = fresh.get(&original.id).copied().unwrap_or_else(ComponentId::new);
                if original.id == *component_id {
                    copy.name = format!("{} (Copy)", original.name);
                } else {
                    copy.parent_id = original.parent_id.map(|p| fresh.get(&p).copied().unwrap_or(p));
                }
                copy.created_at = now;
                copy.updated_at = now;
                copy
            })
            .collect();

        if let Some(custom) = section.settings.custom_layout.as_mut() {
            let copied: Vec<(ComponentId, String)> = custom
                .placements
                .iter()
                .filter_map(|(id, region)| fresh.get(id).map(|new_id| (*new_id, region.clone())))
                .collect();
            custom.placements.extend(copied);
        }

        section.components.extend(copies);
        section.renumber();
        section.updated_at = now;

        fresh
            .get(component_id)
            .map(|id| MutationOutcome::Component(*id))
            .ok_or(MutationError::NotFound(EntityRef::Component(*component_id)))
    }

    /// Swaps with the nearest sibling sharing the same parent, expressed as a
    /// full reorder of the section.
    fn apply_move_component(
        page: &mut Page,
        component_id: &ComponentId,
        direction: Direction,
    ) -> Result<MutationOutcome, MutationError> {
        let (s, c) = locate(page, component_id)?;
        let section = &page.sections[s];
        let parent = section.components[c].parent_id;

        let neighbour = match direction {
            Direction::Up => section.components[..c]
                .iter()
                .rposition(|other| other.parent_id == parent),
            Direction::Down => section.components[c + 1..]
                .iter()
                .position(|other| other.parent_id == parent)
                .map(|offset| c + 1 + offset),
        };

        let Some(neighbour) = neighbour else {
            return Ok(MutationOutcome::Unchanged);
        };

        let mut order: Vec<ComponentId> = section.components.iter().map(|c| c.id).collect();
        order.swap(c, neighbour);
        let section_id = section.id;
        Self::apply_reorder_components(page, &section_id, &order)
    }

    fn apply_insert_section(
        page: &mut Page,
        draft: &SectionDraft,
        at_index: Option<usize>,
    ) -> Result<MutationOutcome, MutationError> {
        let mut section = Section::new(page.id, draft.name.clone(), draft.layout)
            .with_settings(draft.settings.clone());
        section.description = draft.description.clone();
        let id = section.id;

        let index = at_index.unwrap_or(page.sections.len());
        page.sections.insert(index, section);
        page.renumber_sections();

        Ok(MutationOutcome::Section(id))
    }

    fn apply_update_section(
        page: &mut Page,
        section_id: &SectionId,
        changes: &SectionChanges,
    ) -> Result<MutationOutcome, MutationError> {
        let s = section_index(page, section_id)?;
        let section = &mut page.sections[s];

        if let Some(name) = &changes.name {
            section.name = name.clone();
        }
        if let Some(description) = &changes.description {
            section.description = Some(description.clone());
        }
        if let Some(layout) = changes.layout {
            section.layout = layout;
        }
        if let Some(settings) = &changes.settings {
            section.settings = settings.clone();
        }
        section.updated_at = Utc::now();

        Ok(MutationOutcome::Updated)
    }

    fn apply_reorder_sections(
        page: &mut Page,
        order: &[SectionId],
    ) -> Result<MutationOutcome, MutationError> {
        let rank = ranks(order);
        page.sections
            .sort_by_key(|s| rank.get(&s.id).copied().unwrap_or(usize::MAX));
        page.renumber_sections();
        Ok(MutationOutcome::Updated)
    }

    fn apply_duplicate_section(
        page: &mut Page,
        section_id: &SectionId,
    ) -> Result<MutationOutcome, MutationError> {
        let s = section_index(page, section_id)?;
        let copy = copy_section(&page.sections[s], page.id);
        let id = copy.id;

        page.sections.push(copy);
        page.renumber_sections();

        Ok(MutationOutcome::Section(id))
    }

    fn apply_move_section(
        page: &mut Page,
        section_id: &SectionId,
        direction: Direction,
    ) -> Result<MutationOutcome, MutationError> {
        let s = section_index(page, section_id)?;
        let neighbour = match direction {
            Direction::Up if s > 0 => s - 1,
            Direction::Down if s + 1 < page.sections.len() => s + 1,
            _ => return Ok(MutationOutcome::Unchanged),
        };

        let mut order: Vec<SectionId> = page.sections.iter().map(|s| s.id).collect();
        order.swap(s, neighbour);
        Self::apply_reorder_sections(page, &order)
    }

    fn apply_page_details(page: &mut Page, details: &PageDetails) -> Result<MutationOutcome, MutationError> {
        if let Some(title) = &details.title {
            page.title = title.trim().to_string();
        }
        if let Some(path) = &details.path {
            page.path = normalize_path(path).map_err(|e| MutationError::InvalidPath(e.to_string()))?;
        }
        if let Some(description) = &details.description {
            page.description = Some(description.clone());
        }
        if let Some(page_type) = details.page_type {
            page.page_type = page_type;
        }
        if let Some(seo) = &details.seo {
            page.seo = seo.clone();
        }
        Ok(MutationOutcome::Updated)
    }
}

/// Deep copy of `section` for `page_id` with fresh identifiers throughout.
///
/// Parent links and custom-layout placements are remapped onto the new
/// component identifiers.
pub fn copy_section(section: &Section, page_id: PageId) -> Section {
    let mut copy = section.clone();
    copy.id = SectionId::new();
    copy.page_id = page_id;
    if copy.page_id == section.page_id {
        copy.name = format!("{} (Copy)", section.name);
    }
    rekey_components(&mut copy);
    let now = Utc::now();
    copy.created_at = now;
    copy.updated_at = now;
    copy
}

/// Gives every component of `section` a fresh identifier and points it at
/// `section.id`, keeping parent links and placements consistent.
fn rekey_components(section: &mut Section) {
    let fresh: HashMap<ComponentId, ComponentId> = section
        .components
        .iter()
        .map(|c| (c.id, ComponentId::new()))
        .collect();
    let now = Utc::now();

    for component in &mut section.components {
        component.id = fresh.get(&component.id).copied().unwrap_or_else(ComponentId::new);
        component.section_id = section.id;
        component.parent_id = component
            .parent_id
            .map(|p| fresh.get(&p).copied().unwrap_or(p));
        component.created_at = now;
        component.updated_at = now;
    }

    if let Some(custom) = section.settings.custom_layout.as_mut() {
        custom.placements = std::mem::take(&mut custom.placements)
            .into_iter()
            .filter_map(|(id, region)| fresh.get(&id).map(|new_id| (*new_id, region)))
            .collect();
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

fn section_index(page: &Page, id: &SectionId) -> Result<usize, MutationError> {
    page.section_position(id)
        .ok_or(MutationError::NotFound(EntityRef::Section(*id)))
}

fn locate(page: &Page, id: &ComponentId) -> Result<(usize, usize), MutationError> {
    page.locate_component(id)
        .ok_or(MutationError::NotFound(EntityRef::Component(*id)))
}

fn check_index(index: usize, len: usize) -> Result<(), MutationError> {
    if index > len {
        return Err(MutationError::IndexOutOfRange { index, len });
    }
    Ok(())
}

fn check_content(content: &ComponentContent) -> Result<(), MutationError> {
    content.check().map_err(MutationError::InvalidContent)
}

fn check_parent(section: &Section, parent_id: &ComponentId) -> Result<(), MutationError> {
    let parent = section
        .component(parent_id)
        .ok_or(MutationError::NotFound(EntityRef::Component(*parent_id)))?;
    if !parent.component_type().accepts_children() {
        return Err(MutationError::NotAContainer(*parent_id));
    }
    Ok(())
}

/// Exact-match check between the current sibling ids and a proposed order.
fn check_siblings<T: Eq + Hash + Copy>(
    current: &[T],
    proposed: &[T],
    scope: EntityRef,
) -> Result<(), MutationError> {
    let current_set: HashSet<T> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    let duplicated = proposed.iter().filter(|id| !seen.insert(**id)).count();
    let missing = current_set.difference(&seen).count();
    let unexpected = seen.difference(&current_set).count();

    if missing + unexpected + duplicated > 0 {
        return Err(MutationError::SiblingMismatch {
            scope,
            missing,
            unexpected,
            duplicated,
        });
    }
    Ok(())
}

fn ranks<T: Eq + Hash + Copy>(order: &[T]) -> HashMap<T, usize> {
    order.iter().enumerate().map(|(i, id)| (*id, i)).collect()
}

//! # Flat Records
//!
//! Row form of the page aggregate, as handed to and from the persistence
//! collaborator. Sections and components live in flat tables keyed by id
//! with explicit `page_id` / `section_id` / `parent_id` foreign keys; the
//! nested [`Page`] view is assembled from them on load.

use crate::component::Component;
use crate::error::{EntityRef, ModelError};
use crate::ids::{PageId, SectionId, TenantId};
use crate::page::{Page, PageOrigin, PageType, SeoMetadata};
use crate::section::{LayoutKind, Section, SectionSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Page row without its sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: PageId,
    pub tenant_id: TenantId,
    pub title: String,
    pub path: String,
    pub description: Option<String>,
    pub page_type: PageType,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub seo: SeoMetadata,
    pub locked: bool,
    pub origin: PageOrigin,
    pub derived_from: Option<PageId>,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Section row without its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: SectionId,
    pub page_id: PageId,
    pub name: String,
    pub description: Option<String>,
    pub layout: LayoutKind,
    pub order: u32,
    pub settings: SectionSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Components are already flat; the row type is the entity itself.
pub type ComponentRecord = Component;

/// All rows making up one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRows {
    pub page: PageRecord,
    pub sections: Vec<SectionRecord>,
    pub components: Vec<ComponentRecord>,
}

impl Page {
    /// Splits the aggregate into flat rows.
    pub fn into_rows(self) -> PageRows {
        let page = PageRecord {
            id: self.id,
            tenant_id: self.tenant_id,
            title: self.title,
            path: self.path,
            description: self.description,
            page_type: self.page_type,
            published: self.published,
            published_at: self.published_at,
            seo: self.seo,
            locked: self.locked,
            origin: self.origin,
            derived_from: self.derived_from,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        let mut sections = Vec::with_capacity(self.sections.len());
        let mut components = Vec::new();
        for section in self.sections {
            components.extend(section.components);
            sections.push(SectionRecord {
                id: section.id,
                page_id: section.page_id,
                name: section.name,
                description: section.description,
                layout: section.layout,
                order: section.order,
                settings: section.settings,
                created_at: section.created_at,
                updated_at: section.updated_at,
            });
        }

        PageRows {
            page,
            sections,
            components,
        }
    }

    /// Assembles the nested view: sections sorted by order, components
    /// grouped by `section_id` and sorted by order.
    ///
    /// Fails with `NotFound` when a component references a section that is
    /// not among `rows.sections`.
    pub fn from_rows(rows: PageRows) -> Result<Page, ModelError> {
        let PageRows {
            page,
            mut sections,
            components,
        } = rows;

        sections.sort_by_key(|s| s.order);

        let mut grouped: HashMap<SectionId, Vec<Component>> =
            sections.iter().map(|s| (s.id, Vec::new())).collect();
        for component in components {
            grouped
                .get_mut(&component.section_id)
                .ok_or(ModelError::NotFound(EntityRef::Section(component.section_id)))?
                .push(component);
        }

        let sections = sections
            .into_iter()
            .map(|record| {
                let mut components = grouped.remove(&record.id).unwrap_or_default();
                components.sort_by_key(|c| c.order);
                Section {
                    id: record.id,
                    page_id: record.page_id,
                    name: record.name,
                    description: record.description,
                    layout: record.layout,
                    order: record.order,
                    settings: record.settings,
                    components,
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                }
            })
            .collect();

        Ok(Page {
            id: page.id,
            tenant_id: page.tenant_id,
            title: page.title,
            path: page.path,
            description: page.description,
            page_type: page.page_type,
            published: page.published,
            published_at: page.published_at,
            seo: page.seo,
            locked: page.locked,
            origin: page.origin,
            derived_from: page.derived_from,
            revision: page.revision,
            sections,
            created_at: page.created_at,
            updated_at: page.updated_at,
        })
    }
}

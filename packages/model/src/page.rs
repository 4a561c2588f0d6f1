//! # Pages
//!
//! The page aggregate: metadata plus an ordered list of sections, each of
//! which owns its ordered components. Pages are the unit of locking,
//! versioning and cloning.

use crate::component::Component;
use crate::ids::{ComponentId, PageId, SectionId, TenantId};
use crate::section::Section;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    Core,
    #[default]
    Custom,
    Automation,
}

/// Where a page's content came from.
///
/// Locked pages carry `Template` or `Pro`; clones always carry `Derived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageOrigin {
    #[default]
    Builder,
    Template,
    Pro,
    Derived,
}

impl PageOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageOrigin::Builder => "builder",
            PageOrigin::Template => "template",
            PageOrigin::Pro => "pro",
            PageOrigin::Derived => "derived",
        }
    }
}

impl std::fmt::Display for PageOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_image: Option<String>,
}

/// Top-level addressable document within a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub tenant_id: TenantId,
    pub title: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub page_type: PageType,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seo: SeoMetadata,
    pub locked: bool,
    pub origin: PageOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<PageId>,
    /// Incremented on every committed change.
    pub revision: u64,
    #[serde(default)]
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Blank, unlocked, unpublished page.
    pub fn new(tenant_id: TenantId, title: impl Into<String>, path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PageId::new(),
            tenant_id,
            title: title.into(),
            path: path.into(),
            description: None,
            page_type: PageType::default(),
            published: false,
            published_at: None,
            seo: SeoMetadata::default(),
            locked: false,
            origin: PageOrigin::Builder,
            derived_from: None,
            revision: 0,
            sections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == *id)
    }

    pub fn section_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == *id)
    }

    pub fn section_position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == *id)
    }

    /// Finds the section containing `id` and the component's position in it.
    pub fn locate_component(&self, id: &ComponentId) -> Option<(usize, usize)> {
        self.sections.iter().enumerate().find_map(|(section_index, section)| {
            section
                .position_of(id)
                .map(|component_index| (section_index, component_index))
        })
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.locate_component(id)
            .map(|(s, c)| &self.sections[s].components[c])
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.sections.iter().flat_map(|s| s.components.iter())
    }

    pub fn component_count(&self) -> usize {
        self.sections.iter().map(|s| s.components.len()).sum()
    }

    /// Reassigns section orders from vector position.
    pub fn renumber_sections(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.order = index as u32;
        }
    }

    /// Marks the page as changed by a commit.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ComponentContent;
    use crate::section::LayoutKind;

    #[test]
    fn test_new_page_is_unlocked_draft() {
        let page = Page::new(TenantId::new(), "Home", "/");
        assert!(!page.locked);
        assert!(!page.published);
        assert_eq!(page.origin, PageOrigin::Builder);
        assert_eq!(page.revision, 0);
    }

    #[test]
    fn test_locate_component() {
        let mut page = Page::new(TenantId::new(), "Home", "/");
        let mut first = Section::new(page.id, "First", LayoutKind::Single);
        let mut second = Section::new(page.id, "Second", LayoutKind::Single);
        second.order = 1;
        let target = Component::new(
            second.id,
            "title",
            ComponentContent::Heading {
                text: "Hi".to_string(),
                level: 1,
            },
        );
        let target_id = target.id;
        first.components.clear();
        second.components.push(target);
        page.sections = vec![first, second];

        assert_eq!(page.locate_component(&target_id), Some((1, 0)));
        assert_eq!(page.component_count(), 1);
        assert!(page.component(&ComponentId::new()).is_none());
    }

    #[test]
    fn test_touch_bumps_revision() {
        let mut page = Page::new(TenantId::new(), "Home", "/");
        page.touch();
        page.touch();
        assert_eq!(page.revision, 2);
    }
}

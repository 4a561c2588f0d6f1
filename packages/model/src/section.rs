//! # Sections
//!
//! A section is a layout region of a page. It owns an ordered list of
//! components and picks the partition strategy used to spread them across
//! columns.

use crate::component::Component;
use crate::ids::{ComponentId, PageId, SectionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Partition strategy for a section's components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    Single,
    TwoColumn,
    ThreeColumn,
    SidebarLeft,
    SidebarRight,
    Custom,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Single => "single",
            LayoutKind::TwoColumn => "two-column",
            LayoutKind::ThreeColumn => "three-column",
            LayoutKind::SidebarLeft => "sidebar-left",
            LayoutKind::SidebarRight => "sidebar-right",
            LayoutKind::Custom => "custom",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(LayoutKind::Single),
            "two-column" => Ok(LayoutKind::TwoColumn),
            "three-column" => Ok(LayoutKind::ThreeColumn),
            "sidebar-left" => Ok(LayoutKind::SidebarLeft),
            "sidebar-right" => Ok(LayoutKind::SidebarRight),
            "custom" => Ok(LayoutKind::Custom),
            other => Err(format!("unknown layout kind: {other}")),
        }
    }
}

/// Top/right/bottom/left box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub bottom: u32,
    #[serde(default)]
    pub left: u32,
}

impl Spacing {
    pub const fn uniform(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Region set and explicit placements for `LayoutKind::Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomLayout {
    pub regions: Vec<String>,
    #[serde(default)]
    pub placements: BTreeMap<ComponentId, String>,
}

impl CustomLayout {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            placements: BTreeMap::new(),
        }
    }

    pub fn place(mut self, component_id: ComponentId, region: impl Into<String>) -> Self {
        self.placements.insert(component_id, region.into());
        self
    }

    pub fn has_region(&self, name: &str) -> bool {
        self.regions.iter().any(|r| r == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub padding: Spacing,
    #[serde(default)]
    pub margin: Spacing,
    #[serde(default)]
    pub full_width: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_layout: Option<CustomLayout>,
}

/// Layout region of a page holding ordered components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub page_id: PageId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub layout: LayoutKind,
    pub order: u32,
    #[serde(default)]
    pub settings: SectionSettings,
    #[serde(default)]
    pub components: Vec<Component>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Section {
    pub fn new(page_id: PageId, name: impl Into<String>, layout: LayoutKind) -> Self {
        let now = Utc::now();
        Self {
            id: SectionId::new(),
            page_id,
            name: name.into(),
            description: None,
            layout,
            order: 0,
            settings: SectionSettings::default(),
            components: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_settings(mut self, settings: SectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == *id)
    }

    pub fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == *id)
    }

    pub fn position_of(&self, id: &ComponentId) -> Option<usize> {
        self.components.iter().position(|c| c.id == *id)
    }

    /// Reassigns `order` from vector position so orders read 0..n-1.
    pub fn renumber(&mut self) {
        for (index, component) in self.components.iter_mut().enumerate() {
            component.order = index as u32;
        }
    }

    /// Components without a parent, in section order.
    pub fn root_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.parent_id.is_none())
    }

    /// Direct children of `parent`, in section order.
    pub fn children_of<'a>(&'a self, parent: &'a ComponentId) -> impl Iterator<Item = &'a Component> {
        self.components
            .iter()
            .filter(move |c| c.parent_id.as_ref() == Some(parent))
    }

    /// `root` followed by all of its descendants, in section order.
    pub fn subtree_ids(&self, root: &ComponentId) -> Vec<ComponentId> {
        let mut ids = vec![*root];
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor];
            for child in self.children_of(&current) {
                if !ids.contains(&child.id) {
                    ids.push(child.id);
                }
            }
            cursor += 1;
        }
        // Keep section order rather than breadth-first discovery order.
        self.components
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ComponentContent;

    fn paragraph(section: &Section, text: &str) -> Component {
        Component::new(
            section.id,
            text,
            ComponentContent::Paragraph {
                text: text.to_string(),
            },
        )
    }

    #[test]
    fn test_layout_kind_strings() {
        for kind in [
            LayoutKind::Single,
            LayoutKind::TwoColumn,
            LayoutKind::ThreeColumn,
            LayoutKind::SidebarLeft,
            LayoutKind::SidebarRight,
            LayoutKind::Custom,
        ] {
            assert_eq!(kind.as_str().parse::<LayoutKind>(), Ok(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_renumber_follows_position() {
        let mut section = Section::new(PageId::new(), "Hero", LayoutKind::Single);
        let a = paragraph(&section, "a");
        let b = paragraph(&section, "b");
        section.components = vec![b, a];
        section.components[0].order = 7;
        section.renumber();
        let orders: Vec<u32> = section.components.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_subtree_in_section_order() {
        let mut section = Section::new(PageId::new(), "Body", LayoutKind::Single);
        let parent = Component::new(section.id, "box", ComponentContent::Container { gap: None });
        let unrelated = paragraph(&section, "other");
        let child = paragraph(&section, "child").with_parent(parent.id);
        let grandchild = paragraph(&section, "grandchild").with_parent(child.id);
        let ids = vec![parent.id, child.id, grandchild.id];
        section.components = vec![parent, unrelated, child, grandchild];

        assert_eq!(section.subtree_ids(&ids[0]), ids);
        assert_eq!(section.root_components().count(), 2);
    }
}

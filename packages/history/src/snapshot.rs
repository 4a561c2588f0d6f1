//! # Version Snapshots
//!
//! Immutable, timestamped copies of a page's section/component tree.
//!
//! The tree is stored as JSON so a snapshot stays readable even after the
//! in-memory types evolve. Page metadata (title, path, SEO) is not part of
//! the snapshot; restore only ever replaces the tree.

use crate::error::HistoryError;
use chrono::{DateTime, Utc};
use folio_model::{validate, Page, PageId, Section, VersionId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    #[default]
    Page,
}

/// Why a version was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    Create,
    Update,
    Layout,
    Style,
    Seo,
    Publish,
    Restore,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Create => "create",
            ChangeType::Update => "update",
            ChangeType::Layout => "layout",
            ChangeType::Style => "style",
            ChangeType::Seo => "seo",
            ChangeType::Publish => "publish",
            ChangeType::Restore => "restore",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata recorded alongside a captured tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub change_type: ChangeType,
    pub author: String,
    pub description: Option<String>,
    pub restored_from: Option<VersionId>,
}

impl SnapshotMeta {
    pub fn new(change_type: ChangeType, author: impl Into<String>) -> Self {
        Self {
            change_type,
            author: author.into(),
            description: None,
            restored_from: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn restored_from(mut self, version_id: VersionId) -> Self {
        self.restored_from = Some(version_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub id: VersionId,
    pub entity_type: EntityType,
    pub entity_id: PageId,
    /// 1-based, dense per page
    pub version_number: u32,
    /// Serialized `Vec<Section>`
    pub snapshot: serde_json::Value,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_from: Option<VersionId>,
}

impl VersionSnapshot {
    /// Captures the current tree of `page` as version `version_number`.
    pub fn capture(page: &Page, version_number: u32, meta: SnapshotMeta) -> Result<Self, HistoryError> {
        Ok(Self {
            id: VersionId::new(),
            entity_type: EntityType::Page,
            entity_id: page.id,
            version_number,
            snapshot: serde_json::to_value(&page.sections)?,
            change_type: meta.change_type,
            description: meta.description,
            author: meta.author,
            created_at: Utc::now(),
            restored_from: meta.restored_from,
        })
    }

    /// Deserializes the captured tree.
    pub fn sections(&self) -> Result<Vec<Section>, HistoryError> {
        Ok(serde_json::from_value(self.snapshot.clone())?)
    }

    /// Replaces `page`'s live tree with this snapshot's content and validates
    /// the result. `page` is left unchanged on error.
    pub fn restore_into(&self, page: &mut Page) -> Result<(), HistoryError> {
        if self.entity_id != page.id {
            return Err(HistoryError::WrongPage {
                expected: page.id,
                found: self.entity_id,
            });
        }

        let mut restored = page.clone();
        restored.sections = self.sections()?;
        validate(&restored)?;
        *page = restored;
        Ok(())
    }

    pub fn summary(&self) -> VersionSummary {
        let (sections, components) = self
            .snapshot
            .as_array()
            .map(|sections| {
                let components = sections
                    .iter()
                    .filter_map(|s| s.get("components").and_then(|c| c.as_array()))
                    .map(Vec::len)
                    .sum();
                (sections.len(), components)
            })
            .unwrap_or((0, 0));

        VersionSummary {
            id: self.id,
            version_number: self.version_number,
            change_type: self.change_type,
            description: self.description.clone(),
            author: self.author.clone(),
            created_at: self.created_at,
            restored_from: self.restored_from,
            section_count: sections,
            component_count: components,
        }
    }
}

/// Listing entry for a version, without the tree payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub id: VersionId,
    pub version_number: u32,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_from: Option<VersionId>,
    pub section_count: usize,
    pub component_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::{Component, ComponentContent, LayoutKind, TenantId};
    use pretty_assertions::assert_eq;

    fn page() -> Page {
        let mut page = Page::new(TenantId::new(), "Home", "/");
        let mut section = Section::new(page.id, "Body", LayoutKind::TwoColumn);
        section.components.push(Component::new(
            section.id,
            "intro",
            ComponentContent::Paragraph {
                text: "Welcome".to_string(),
            },
        ));
        page.sections.push(section);
        page
    }

    #[test]
    fn test_capture_and_read_back() {
        let page = page();
        let snapshot = VersionSnapshot::capture(&page, 1, SnapshotMeta::new(ChangeType::Create, "ada")).unwrap();

        assert_eq!(snapshot.sections().unwrap(), page.sections);
        let summary = snapshot.summary();
        assert_eq!(summary.section_count, 1);
        assert_eq!(summary.component_count, 1);
        assert_eq!(summary.change_type, ChangeType::Create);
    }

    #[test]
    fn test_restore_replaces_tree_only() {
        let mut page = page();
        let snapshot = VersionSnapshot::capture(&page, 1, SnapshotMeta::new(ChangeType::Create, "ada")).unwrap();

        page.sections.clear();
        page.title = "Renamed".to_string();
        snapshot.restore_into(&mut page).unwrap();

        assert_eq!(page.sections, snapshot.sections().unwrap());
        assert_eq!(page.title, "Renamed");
    }

    #[test]
    fn test_restore_rejects_other_page() {
        let snapshot = VersionSnapshot::capture(&page(), 1, SnapshotMeta::new(ChangeType::Create, "ada")).unwrap();
        let mut other = page();
        assert!(matches!(
            snapshot.restore_into(&mut other),
            Err(HistoryError::WrongPage { .. })
        ));
    }

    #[test]
    fn test_change_type_serializes_kebab() {
        assert_eq!(serde_json::to_string(&ChangeType::Restore).unwrap(), "\"restore\"");
        assert_eq!(ChangeType::Seo.to_string(), "seo");
    }
}

//! # Persistence Port
//!
//! [`PageRepository`] is the collaborator the engine hands whole pages to.
//! The contract mirrors a relational store:
//!
//! - `commit` writes a page's full tree and at most one version snapshot as
//!   a single unit. Either both land or neither does.
//! - Paths are unique per tenant; the check happens inside the commit.
//! - Version lists are append-only.
//!
//! [`MemoryRepository`] keeps flat row tables behind one `RwLock` and is the
//! default backend for tests and embedding.

use folio_history::{HistoryError, VersionLog, VersionSnapshot};
use folio_model::{
    ComponentId, ComponentRecord, ModelError, Page, PageId, PageRecord, PageRows, SectionId,
    SectionRecord, TenantId,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Path {path} is already used by another page")]
    PathTaken { path: String },

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub trait PageRepository: Send + Sync {
    /// Page with all sections and components, sorted by order.
    fn load(&self, page_id: &PageId) -> Result<Option<Page>, RepositoryError>;

    /// Page rows of one tenant, sorted by path.
    fn list(&self, tenant_id: &TenantId) -> Result<Vec<PageRecord>, RepositoryError>;

    /// True when another page of `tenant_id` (other than `except`) uses `path`.
    fn path_taken(
        &self,
        tenant_id: &TenantId,
        path: &str,
        except: Option<PageId>,
    ) -> Result<bool, RepositoryError>;

    /// Replaces the stored tree of `page` and appends `snapshot`, atomically.
    fn commit(&self, page: &Page, snapshot: Option<VersionSnapshot>) -> Result<(), RepositoryError>;

    /// Versions of a page, oldest first.
    fn versions(&self, page_id: &PageId) -> Result<Arc<[VersionSnapshot]>, RepositoryError>;

    /// Removes the page, its tree and its history. Returns false if absent.
    fn delete(&self, page_id: &PageId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Default)]
struct Members {
    sections: Vec<SectionId>,
    components: Vec<ComponentId>,
}

#[derive(Debug, Default)]
struct Tables {
    pages: HashMap<PageId, PageRecord>,
    sections: HashMap<SectionId, SectionRecord>,
    components: HashMap<ComponentId, ComponentRecord>,
    members: HashMap<PageId, Members>,
    versions: HashMap<PageId, VersionLog>,
}

impl Tables {
    fn remove_tree(&mut self, page_id: &PageId) {
        if let Some(members) = self.members.remove(page_id) {
            for id in &members.sections {
                self.sections.remove(id);
            }
            for id in &members.components {
                self.components.remove(id);
            }
        }
    }

    fn path_taken(&self, tenant_id: &TenantId, path: &str, except: Option<PageId>) -> bool {
        self.pages
            .values()
            .any(|p| p.tenant_id == *tenant_id && p.path == path && Some(p.id) != except)
    }
}

/// In-process row store.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.tables.read().pages.len()
    }
}

impl PageRepository for MemoryRepository {
    fn load(&self, page_id: &PageId) -> Result<Option<Page>, RepositoryError> {
        let tables = self.tables.read();
        let Some(page) = tables.pages.get(page_id) else {
            return Ok(None);
        };

        let members = tables.members.get(page_id);
        let sections = members
            .map(|m| m.sections.iter().filter_map(|id| tables.sections.get(id)).cloned().collect())
            .unwrap_or_default();
        let components = members
            .map(|m| {
                m.components
                    .iter()
                    .filter_map(|id| tables.components.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let page = Page::from_rows(PageRows {
            page: page.clone(),
            sections,
            components,
        })?;
        Ok(Some(page))
    }

    fn list(&self, tenant_id: &TenantId) -> Result<Vec<PageRecord>, RepositoryError> {
        let tables = self.tables.read();
        let mut pages: Vec<PageRecord> = tables
            .pages
            .values()
            .filter(|p| p.tenant_id == *tenant_id)
            .cloned()
            .collect();
        pages.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(pages)
    }

    fn path_taken(
        &self,
        tenant_id: &TenantId,
        path: &str,
        except: Option<PageId>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().path_taken(tenant_id, path, except))
    }

    fn commit(&self, page: &Page, snapshot: Option<VersionSnapshot>) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();

        if tables.path_taken(&page.tenant_id, &page.path, Some(page.id)) {
            return Err(RepositoryError::PathTaken {
                path: page.path.clone(),
            });
        }

        // Append on a copy so a rejected snapshot leaves the tables untouched.
        let log = match snapshot {
            Some(snapshot) => {
                let mut log = tables
                    .versions
                    .get(&page.id)
                    .cloned()
                    .unwrap_or_else(|| VersionLog::new(page.id));
                log.append(snapshot)?;
                Some(log)
            }
            None => None,
        };

        let rows = page.clone().into_rows();
        tables.remove_tree(&page.id);

        let members = Members {
            sections: rows.sections.iter().map(|s| s.id).collect(),
            components: rows.components.iter().map(|c| c.id).collect(),
        };
        for section in rows.sections {
            tables.sections.insert(section.id, section);
        }
        for component in rows.components {
            tables.components.insert(component.id, component);
        }
        tables.members.insert(page.id, members);
        tables.pages.insert(page.id, rows.page);
        if let Some(log) = log {
            tables.versions.insert(page.id, log);
        }

        debug!(page_id = %page.id, revision = page.revision, "Committed page");
        Ok(())
    }

    fn versions(&self, page_id: &PageId) -> Result<Arc<[VersionSnapshot]>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .versions
            .get(page_id)
            .map(VersionLog::entries)
            .unwrap_or_else(|| Arc::from(Vec::new())))
    }

    fn delete(&self, page_id: &PageId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write();
        if tables.pages.remove(page_id).is_none() {
            return Ok(false);
        }
        tables.remove_tree(page_id);
        tables.versions.remove(page_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_history::{ChangeType, SnapshotMeta};
    use folio_model::{Component, ComponentContent, LayoutKind, Section};
    use pretty_assertions::assert_eq;

    fn page(tenant: TenantId, path: &str) -> Page {
        let mut page = Page::new(tenant, "Page", path);
        for order in 0..2u32 {
            let mut section = Section::new(page.id, format!("S{order}"), LayoutKind::Single);
            section.order = order;
            section.components.push(Component::new(
                section.id,
                "text",
                ComponentContent::Paragraph {
                    text: format!("{order}"),
                },
            ));
            page.sections.push(section);
        }
        page
    }

    #[test]
    fn test_commit_and_load_round_trip() {
        let repo = MemoryRepository::new();
        let page = page(TenantId::new(), "/about");
        repo.commit(&page, None).unwrap();

        assert_eq!(repo.load(&page.id).unwrap(), Some(page));
    }

    #[test]
    fn test_commit_replaces_tree() {
        let repo = MemoryRepository::new();
        let mut page = page(TenantId::new(), "/about");
        repo.commit(&page, None).unwrap();

        page.sections.pop();
        repo.commit(&page, None).unwrap();

        let loaded = repo.load(&page.id).unwrap().unwrap();
        assert_eq!(loaded.sections.len(), 1);
        assert_eq!(loaded, page);
    }

    #[test]
    fn test_path_unique_per_tenant() {
        let repo = MemoryRepository::new();
        let tenant = TenantId::new();
        repo.commit(&page(tenant, "/about"), None).unwrap();

        assert!(matches!(
            repo.commit(&page(tenant, "/about"), None),
            Err(RepositoryError::PathTaken { .. })
        ));
        repo.commit(&page(TenantId::new(), "/about"), None).unwrap();
        assert_eq!(repo.page_count(), 2);
    }

    #[test]
    fn test_rejected_snapshot_leaves_page_untouched() {
        let repo = MemoryRepository::new();
        let mut page = page(TenantId::new(), "/about");
        repo.commit(&page, None).unwrap();

        let out_of_sequence =
            VersionSnapshot::capture(&page, 5, SnapshotMeta::new(ChangeType::Update, "ada")).unwrap();
        page.title = "Changed".to_string();

        assert!(matches!(
            repo.commit(&page, Some(out_of_sequence)),
            Err(RepositoryError::History(HistoryError::VersionOutOfSequence { .. }))
        ));
        assert_eq!(repo.load(&page.id).unwrap().unwrap().title, "Page");
        assert!(repo.versions(&page.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_everything() {
        let repo = MemoryRepository::new();
        let page = page(TenantId::new(), "/about");
        let snapshot =
            VersionSnapshot::capture(&page, 1, SnapshotMeta::new(ChangeType::Create, "ada")).unwrap();
        repo.commit(&page, Some(snapshot)).unwrap();

        assert!(repo.delete(&page.id).unwrap());
        assert!(!repo.delete(&page.id).unwrap());
        assert_eq!(repo.load(&page.id).unwrap(), None);
        assert!(repo.versions(&page.id).unwrap().is_empty());
        assert!(repo.tables.read().components.is_empty());
    }
}

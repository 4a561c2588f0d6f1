//! # Page Engine
//!
//! Entry point for every read and write on pages. Composes the tree model,
//! mutation engine, history store and renderer behind one API that takes an
//! explicit tenant and page identifier on every call.
//!
//! ## Write path
//!
//! ```text
//! lock(page) → load → lock check → apply on copy → validate → touch
//!            → [capture snapshot] → repository.commit(page, snapshot)
//! ```
//!
//! Writes to one page serialize on its [`PageLocks`] entry; the repository
//! commit stores the tree and the optional snapshot as one unit, so a failed
//! step anywhere leaves the stored page exactly as it was.
//!
//! ## Locked pages
//!
//! Pages with `locked = true` (template or pro content) reject every
//! structural write with [`LockedPageError`]. [`PageEngine::clone_page`]
//! produces an unlocked, derived copy that accepts the same edits.

use crate::clone::derive_page;
use crate::config::EngineConfig;
use crate::error::{EngineError, LockedPageError};
use crate::locks::PageLocks;
use crate::repository::{MemoryRepository, PageRepository, RepositoryError};
use chrono::Utc;
use folio_editor::{apply_all, EditSession, Mutation, MutationOutcome, PageDetails};
use folio_history::{
    compare, detect_change_type, ChangeType, SnapshotMeta, TreeDiff, VersionSnapshot, VersionSummary,
};
use folio_layout::{render_page, ComponentRenderer, DefaultRenderer, RenderOptions, RenderedPage};
use folio_model::{
    copy_path, normalize_path, validate, EntityRef, Page, PageId, PageOrigin, PageRecord, PageType,
    TenantId, VersionId,
};
use parking_lot::Mutex;
use std::slice;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Attribution for a recorded version.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Falls back to the configured system author
    pub author: Option<String>,
    pub description: Option<String>,
}

impl SaveOptions {
    pub fn by(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parameters for a blank page.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub path: String,
    pub description: Option<String>,
    pub page_type: PageType,
    pub save: SaveOptions,
}

impl NewPage {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            description: None,
            page_type: PageType::default(),
            save: SaveOptions::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn by(mut self, author: impl Into<String>) -> Self {
        self.save.author = Some(author.into());
        self
    }
}

/// Result of a committed write.
struct Committed<T> {
    value: T,
    page: Page,
    version: Option<VersionId>,
}

pub struct PageEngine<R: PageRepository = MemoryRepository> {
    repo: R,
    locks: PageLocks,
    config: EngineConfig,
}

impl PageEngine<MemoryRepository> {
    /// Engine over a fresh in-memory repository.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(MemoryRepository::new(), config)
    }
}

impl<R: PageRepository> PageEngine<R> {
    pub fn new(repo: R, config: EngineConfig) -> Self {
        Self {
            repo,
            locks: PageLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Creates a blank, unlocked page. Records version 1 unless disabled.
    #[instrument(skip(self, new), fields(path = %new.path))]
    pub fn create_page(&self, tenant: &TenantId, new: NewPage) -> Result<Page, EngineError> {
        let path = normalize_path(&new.path)?;
        if new.title.trim().is_empty() {
            return Err(EngineError::InvalidInput("page title must not be empty".to_string()));
        }
        if self.repo.path_taken(tenant, &path, None)? {
            return Err(EngineError::PathTaken { path });
        }

        let mut page = Page::new(*tenant, new.title, path);
        page.description = new.description;
        page.page_type = new.page_type;
        page.touch();
        validate(&page)?;

        let snapshot = if self.config.snapshot_on_create {
            let meta = self.meta(ChangeType::Create, new.save);
            Some(VersionSnapshot::capture(&page, 1, meta)?)
        } else {
            None
        };

        self.locks.with_lock(page.id, || self.repo.commit(&page, snapshot))?;
        info!(page_id = %page.id, path = %page.path, "Created page");
        Ok(page)
    }

    /// Fully populated page. Pages of another tenant are reported as missing.
    pub fn load_page(&self, tenant: &TenantId, page_id: PageId) -> Result<Page, EngineError> {
        match self.repo.load(&page_id)? {
            Some(page) if page.tenant_id == *tenant => Ok(page),
            _ => Err(EngineError::NotFound(EntityRef::Page(page_id))),
        }
    }

    pub fn list_pages(&self, tenant: &TenantId) -> Result<Vec<PageRecord>, EngineError> {
        Ok(self.repo.list(tenant)?)
    }

    #[instrument(skip(self, tenant))]
    pub fn delete_page(&self, tenant: &TenantId, page_id: PageId) -> Result<(), EngineError> {
        let lock = self.lock_page(tenant, page_id)?;
        {
            let _guard = lock.lock();
            self.repo.delete(&page_id)?;
        }
        self.locks.remove(&page_id);
        info!(%page_id, "Deleted page");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Applies one mutation and commits it without recording a version.
    pub fn apply(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        mutation: Mutation,
    ) -> Result<MutationOutcome, EngineError> {
        let mut outcomes = self.apply_batch(tenant, page_id, slice::from_ref(&mutation), None)?;
        Ok(outcomes.pop().unwrap_or(MutationOutcome::Unchanged))
    }

    /// Applies `mutations` atomically. With `save`, also records a version
    /// whose change type is derived from the difference to the previous tree.
    #[instrument(skip(self, tenant, mutations, save), fields(ops = mutations.len()))]
    pub fn apply_batch(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        mutations: &[Mutation],
        save: Option<SaveOptions>,
    ) -> Result<Vec<MutationOutcome>, EngineError> {
        let result = self.write(tenant, page_id, |current, next| {
            ensure_unlocked(current)?;
            let (page, outcomes) = apply_all(current, mutations)?;
            *next = page;
            let meta = save.map(|save| self.meta(detect_change_type(Some(current), next), save));
            Ok((outcomes, meta))
        });
        observe("apply", page_id, result).map(|c| c.value)
    }

    /// Title, path, description, type and SEO changes.
    pub fn update_details(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        details: PageDetails,
        save: Option<SaveOptions>,
    ) -> Result<Page, EngineError> {
        self.apply_batch(tenant, page_id, &[Mutation::UpdatePageDetails { details }], save)?;
        self.load_page(tenant, page_id)
    }

    // ------------------------------------------------------------------
    // Edit sessions
    // ------------------------------------------------------------------

    /// Detached working copy for interactive editing with undo/redo.
    pub fn open_session(&self, tenant: &TenantId, page_id: PageId) -> Result<EditSession, EngineError> {
        let page = self.load_page(tenant, page_id)?;
        observe("open_session", page_id, ensure_unlocked(&page).map_err(EngineError::from))?;
        Ok(EditSession::with_max_undo_levels(page, self.config.max_undo_levels))
    }

    /// Commits a session's working copy. Fails with `Conflict` when the page
    /// was committed by someone else after the session was opened.
    #[instrument(skip(self, tenant, session, save), fields(page_id = %session.page_id()))]
    pub fn commit_session(
        &self,
        tenant: &TenantId,
        session: EditSession,
        save: Option<SaveOptions>,
    ) -> Result<Page, EngineError> {
        let page_id = session.page_id();
        let result = self.write(tenant, page_id, |current, next| {
            let base_revision = session.base_revision();
            if current.revision != base_revision {
                return Err(EngineError::Conflict(format!(
                    "page {page_id} is at revision {}, session started at {base_revision}",
                    current.revision
                )));
            }
            ensure_unlocked(current)?;

            let (_, working) = session.into_parts();
            validate(&working)?;
            *next = working;
            let meta = save.map(|save| self.meta(detect_change_type(Some(current), next), save));
            Ok(((), meta))
        });
        observe("commit_session", page_id, result).map(|c| c.page)
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    /// Marks the page published and records a `publish` version. Allowed on
    /// locked pages; publishing is not a structural edit.
    #[instrument(skip(self, tenant, save))]
    pub fn publish(&self, tenant: &TenantId, page_id: PageId, save: SaveOptions) -> Result<Page, EngineError> {
        let result = self.write(tenant, page_id, |_, next| {
            next.published = true;
            next.published_at = Some(Utc::now());
            Ok(((), Some(self.meta(ChangeType::Publish, save))))
        });
        observe("publish", page_id, result).map(|c| c.page)
    }

    #[instrument(skip(self, tenant))]
    pub fn unpublish(&self, tenant: &TenantId, page_id: PageId) -> Result<Page, EngineError> {
        let result = self.write(tenant, page_id, |_, next| {
            next.published = false;
            next.published_at = None;
            Ok(((), None))
        });
        observe("unpublish", page_id, result).map(|c| c.page)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Records the current tree as a new version.
    #[instrument(skip(self, tenant, save))]
    pub fn snapshot(&self, tenant: &TenantId, page_id: PageId, save: SaveOptions) -> Result<VersionId, EngineError> {
        let result = self.lock_page(tenant, page_id).and_then(|lock| {
            let _guard = lock.lock();
            let page = self.reload_locked(tenant, page_id)?;
            validate(&page)?;

            let versions = self.repo.versions(&page_id)?;
            let previous = versions
                .last()
                .map(|latest| {
                    let mut previous = page.clone();
                    previous.sections = latest.sections()?;
                    Ok::<_, EngineError>(previous)
                })
                .transpose()?;
            let change_type = detect_change_type(previous.as_ref(), &page);

            let snapshot = VersionSnapshot::capture(&page, versions.len() as u32 + 1, self.meta(change_type, save))?;
            let id = snapshot.id;
            self.repo.commit(&page, Some(snapshot))?;
            Ok(id)
        });
        observe("snapshot", page_id, result)
    }

    /// Version summaries, newest first.
    pub fn list_versions(&self, tenant: &TenantId, page_id: PageId) -> Result<Vec<VersionSummary>, EngineError> {
        self.load_page(tenant, page_id)?;
        let versions = self.repo.versions(&page_id)?;
        Ok(versions.iter().rev().map(VersionSnapshot::summary).collect())
    }

    pub fn version(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        version_id: VersionId,
    ) -> Result<VersionSnapshot, EngineError> {
        self.load_page(tenant, page_id)?;
        find_version(&self.repo.versions(&page_id)?, version_id).cloned()
    }

    /// Replaces the live tree with `version_id`'s tree and records a
    /// `restore` version pointing back at it. Returns the new version.
    #[instrument(skip(self, tenant, save))]
    pub fn restore(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        version_id: VersionId,
        save: SaveOptions,
    ) -> Result<VersionId, EngineError> {
        let result = self.write(tenant, page_id, |current, next| {
            ensure_unlocked(current)?;
            let versions = self.repo.versions(&page_id)?;
            let source = find_version(&versions, version_id)?;
            source.restore_into(next)?;

            let description = save
                .description
                .clone()
                .unwrap_or_else(|| format!("Restored from version {}", source.version_number));
            let meta = self
                .meta(ChangeType::Restore, save)
                .with_description(description)
                .restored_from(version_id);
            Ok(((), Some(meta)))
        });

        let committed = observe("restore", page_id, result)?;
        info!(%page_id, %version_id, "Restored version");
        committed
            .version
            .ok_or_else(|| EngineError::Repository("restore recorded no version".to_string()))
    }

    /// Structural difference from version `from` to version `to`.
    pub fn compare_versions(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        from: VersionId,
        to: VersionId,
    ) -> Result<TreeDiff, EngineError> {
        self.load_page(tenant, page_id)?;
        let versions = self.repo.versions(&page_id)?;
        let before = find_version(&versions, from)?.sections()?;
        let after = find_version(&versions, to)?.sections()?;
        Ok(compare(&before, &after))
    }

    // ------------------------------------------------------------------
    // Lock & clone
    // ------------------------------------------------------------------

    /// Locks the page as `origin` content. Only template and pro pages lock.
    #[instrument(skip(self, tenant))]
    pub fn lock(&self, tenant: &TenantId, page_id: PageId, origin: PageOrigin) -> Result<Page, EngineError> {
        if !matches!(origin, PageOrigin::Template | PageOrigin::Pro) {
            return Err(EngineError::InvalidInput(format!(
                "only template or pro pages can be locked, not {origin}"
            )));
        }
        let result = self.write(tenant, page_id, |_, next| {
            next.locked = true;
            next.origin = origin;
            Ok(((), None))
        });
        observe("lock", page_id, result).map(|c| c.page)
    }

    #[instrument(skip(self, tenant))]
    pub fn unlock(&self, tenant: &TenantId, page_id: PageId) -> Result<Page, EngineError> {
        let result = self.write(tenant, page_id, |_, next| {
            next.locked = false;
            Ok(((), None))
        });
        observe("unlock", page_id, result).map(|c| c.page)
    }

    /// Deep-copies a page into a new unlocked page with `origin = derived`.
    ///
    /// The copy's path is the source path plus the configured suffix, with a
    /// counter appended until a free path is found.
    #[instrument(skip(self, tenant, save))]
    pub fn clone_page(&self, tenant: &TenantId, page_id: PageId, save: SaveOptions) -> Result<Page, EngineError> {
        let source = self.load_page(tenant, page_id)?;
        let suffix = &self.config.clone_path_suffix;

        for attempt in 1..=self.config.max_path_attempts {
            let path = copy_path(&source.path, suffix, attempt);
            if self.repo.path_taken(tenant, &path, None)? {
                continue;
            }

            let mut page = derive_page(&source, path);
            page.touch();
            validate(&page)?;

            let snapshot = if self.config.snapshot_on_create {
                let meta = self
                    .meta(ChangeType::Create, save.clone())
                    .with_description(format!("Cloned from {}", source.title));
                Some(VersionSnapshot::capture(&page, 1, meta)?)
            } else {
                None
            };

            match self.locks.with_lock(page.id, || self.repo.commit(&page, snapshot)) {
                Ok(()) => {
                    info!(source = %page_id, clone = %page.id, path = %page.path, "Cloned page");
                    return Ok(page);
                }
                // Lost a race for the path; try the next candidate.
                Err(RepositoryError::PathTaken { path }) => {
                    debug!(%path, "Clone path taken concurrently");
                }
                Err(e) => return observe("clone", page_id, Err(e.into())),
            }
        }

        let path = copy_path(&source.path, suffix, self.config.max_path_attempts);
        observe("clone", page_id, Err(EngineError::PathTaken { path }))
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn render_page(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        options: &RenderOptions,
    ) -> Result<RenderedPage, EngineError> {
        self.render_page_with(tenant, page_id, &DefaultRenderer, options)
    }

    pub fn render_page_with(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        renderer: &dyn ComponentRenderer,
        options: &RenderOptions,
    ) -> Result<RenderedPage, EngineError> {
        let page = self.load_page(tenant, page_id)?;
        Ok(render_page(&page, renderer, options))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn meta(&self, change_type: ChangeType, save: SaveOptions) -> SnapshotMeta {
        let author = save.author.unwrap_or_else(|| self.config.system_author.clone());
        let meta = SnapshotMeta::new(change_type, author);
        match save.description {
            Some(description) => meta.with_description(description),
            None => meta,
        }
    }

    /// Lock handle for an existing page of `tenant`. The page is checked
    /// first so requests for unknown pages never create lock entries.
    fn lock_page(&self, tenant: &TenantId, page_id: PageId) -> Result<Arc<Mutex<()>>, EngineError> {
        self.load_page(tenant, page_id)?;
        Ok(self.locks.lock_for(page_id))
    }

    /// Re-reads the page once its lock is held. A page deleted while this
    /// writer waited loses its lock entry again; page ids are never reused.
    fn reload_locked(&self, tenant: &TenantId, page_id: PageId) -> Result<Page, EngineError> {
        let result = self.load_page(tenant, page_id);
        if result.is_err() && self.repo.load(&page_id)?.is_none() {
            self.locks.remove(&page_id);
        }
        result
    }

    /// Runs `edit` on a copy of the page under the page lock and commits the
    /// copy with an optional snapshot. `edit` receives the stored page and the
    /// copy to change. Nothing is written when the copy is unchanged and no
    /// snapshot is requested.
    fn write<T>(
        &self,
        tenant: &TenantId,
        page_id: PageId,
        edit: impl FnOnce(&Page, &mut Page) -> Result<(T, Option<SnapshotMeta>), EngineError>,
    ) -> Result<Committed<T>, EngineError> {
        let lock = self.lock_page(tenant, page_id)?;
        let _guard = lock.lock();
        let current = self.reload_locked(tenant, page_id)?;
        let mut next = current.clone();
        let (value, meta) = edit(&current, &mut next)?;

        if meta.is_none() && next == current {
            return Ok(Committed {
                value,
                page: current,
                version: None,
            });
        }

        validate(&next)?;
        next.touch();

        let snapshot = match meta {
            Some(meta) => {
                let number = self.repo.versions(&page_id)?.len() as u32 + 1;
                Some(VersionSnapshot::capture(&next, number, meta)?)
            }
            None => None,
        };
        let version = snapshot.as_ref().map(|s| s.id);

        self.repo.commit(&next, snapshot)?;
        debug!(%page_id, revision = next.revision, ?version, "Committed write");

        Ok(Committed {
            value,
            page: next,
            version,
        })
    }
}

fn ensure_unlocked(page: &Page) -> Result<(), LockedPageError> {
    if page.locked {
        return Err(LockedPageError {
            page_id: page.id,
            origin: page.origin,
        });
    }
    Ok(())
}

fn find_version(versions: &[VersionSnapshot], version_id: VersionId) -> Result<&VersionSnapshot, EngineError> {
    versions
        .iter()
        .find(|v| v.id == version_id)
        .ok_or(EngineError::NotFound(EntityRef::Version(version_id)))
}

/// Logs a failed operation at the level its error kind calls for.
fn observe<T>(op: &'static str, page_id: PageId, result: Result<T, EngineError>) -> Result<T, EngineError> {
    if let Err(err) = &result {
        match err {
            EngineError::InvariantViolation(violations) => {
                error!(%page_id, op, %violations, "Invariant violation")
            }
            EngineError::Conflict(reason) => warn!(%page_id, op, %reason, "Conflicting write"),
            EngineError::Locked(_) => debug!(%page_id, op, "Rejected write to locked page"),
            other => debug!(%page_id, op, error = %other, "Operation failed"),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::SectionDraft;
    use folio_model::LayoutKind;
    use pretty_assertions::assert_eq;

    fn engine() -> (PageEngine, TenantId) {
        (PageEngine::in_memory(EngineConfig::default()), TenantId::new())
    }

    fn insert_section(name: &str) -> Mutation {
        Mutation::InsertSection {
            section: SectionDraft::new(name, LayoutKind::Single),
            at_index: None,
        }
    }

    #[test]
    fn test_create_records_first_version() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("About", "About/").by("ada")).unwrap();

        assert_eq!(page.path, "/about");
        assert_eq!(page.revision, 1);
        let versions = engine.list_versions(&tenant, page.id).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].change_type, ChangeType::Create);
        assert_eq!(versions[0].author, "ada");
    }

    #[test]
    fn test_create_rejects_duplicate_path_and_blank_title() {
        let (engine, tenant) = engine();
        engine.create_page(&tenant, NewPage::new("About", "/about")).unwrap();

        assert!(matches!(
            engine.create_page(&tenant, NewPage::new("Other", "/about")),
            Err(EngineError::PathTaken { .. })
        ));
        assert!(matches!(
            engine.create_page(&tenant, NewPage::new("  ", "/blank")),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.create_page(&tenant, NewPage::new("Spaces", "/a b")),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_apply_bumps_revision_without_version() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();

        engine.apply(&tenant, page.id, insert_section("Hero")).unwrap();

        let loaded = engine.load_page(&tenant, page.id).unwrap();
        assert_eq!(loaded.revision, 2);
        assert_eq!(loaded.sections.len(), 1);
        assert_eq!(engine.list_versions(&tenant, page.id).unwrap().len(), 1);
    }

    #[test]
    fn test_saved_batch_records_layout_change() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();

        engine
            .apply_batch(
                &tenant,
                page.id,
                &[insert_section("Hero"), insert_section("Body")],
                Some(SaveOptions::by("ada").with_description("Initial layout")),
            )
            .unwrap();

        let versions = engine.list_versions(&tenant, page.id).unwrap();
        assert_eq!(versions[0].version_number, 2);
        assert_eq!(versions[0].change_type, ChangeType::Layout);
        assert_eq!(versions[0].description.as_deref(), Some("Initial layout"));
    }

    #[test]
    fn test_boundary_move_commits_nothing() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();
        let section_id = engine
            .apply(&tenant, page.id, insert_section("Hero"))
            .unwrap()
            .section_id()
            .unwrap();

        let outcome = engine
            .apply(&tenant, page.id, Mutation::MoveSectionUp { section_id })
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Unchanged);
        assert_eq!(engine.load_page(&tenant, page.id).unwrap().revision, 2);
    }

    #[test]
    fn test_lock_requires_template_or_pro() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();

        assert!(matches!(
            engine.lock(&tenant, page.id, PageOrigin::Derived),
            Err(EngineError::InvalidInput(_))
        ));
        let locked = engine.lock(&tenant, page.id, PageOrigin::Template).unwrap();
        assert!(locked.locked);

        let unlocked = engine.unlock(&tenant, page.id).unwrap();
        assert!(!unlocked.locked);
        assert_eq!(unlocked.origin, PageOrigin::Template);
    }

    #[test]
    fn test_publish_allowed_on_locked_page() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();
        engine.lock(&tenant, page.id, PageOrigin::Pro).unwrap();

        let published = engine.publish(&tenant, page.id, SaveOptions::default()).unwrap();
        assert!(published.published);
        assert!(published.published_at.is_some());

        let versions = engine.list_versions(&tenant, page.id).unwrap();
        assert_eq!(versions[0].change_type, ChangeType::Publish);
        assert_eq!(versions[0].author, "system");

        let unpublished = engine.unpublish(&tenant, page.id).unwrap();
        assert!(!unpublished.published);
    }

    #[test]
    fn test_delete_page() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();

        assert!(matches!(
            engine.delete_page(&TenantId::new(), page.id),
            Err(EngineError::NotFound(_))
        ));
        engine.delete_page(&tenant, page.id).unwrap();
        assert!(matches!(
            engine.load_page(&tenant, page.id),
            Err(EngineError::NotFound(EntityRef::Page(_)))
        ));
        assert!(engine.list_pages(&tenant).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_pages_leave_no_lock_entries() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();
        let baseline = engine.locks.len();
        let stranger = TenantId::new();

        for _ in 0..50 {
            let missing = PageId::new();
            let results = [
                engine.apply(&tenant, missing, insert_section("Hero")).map(|_| ()),
                engine.snapshot(&tenant, missing, SaveOptions::default()).map(|_| ()),
                engine.restore(&tenant, missing, VersionId::new(), SaveOptions::default()).map(|_| ()),
                engine.lock(&tenant, missing, PageOrigin::Pro).map(|_| ()),
                engine.publish(&tenant, missing, SaveOptions::default()).map(|_| ()),
                engine.delete_page(&tenant, missing),
                engine.apply(&stranger, page.id, insert_section("Hero")).map(|_| ()),
                engine.delete_page(&stranger, page.id),
            ];
            for result in results {
                assert!(matches!(result, Err(EngineError::NotFound(_))));
            }
        }

        assert_eq!(engine.locks.len(), baseline);
        assert!(engine.load_page(&tenant, page.id).is_ok());
    }

    #[test]
    fn test_update_details_rejects_blank_title() {
        let (engine, tenant) = engine();
        let page = engine.create_page(&tenant, NewPage::new("Home", "/")).unwrap();
        engine.publish(&tenant, page.id, SaveOptions::default()).unwrap();

        let details = PageDetails {
            title: Some("   ".to_string()),
            ..PageDetails::default()
        };
        let err = engine.update_details(&tenant, page.id, details, None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert_eq!(err.user_message(), "page title must not be empty");

        let loaded = engine.load_page(&tenant, page.id).unwrap();
        assert_eq!(loaded.title, "Home");
        assert_eq!(loaded.revision, page.revision + 1);
    }
}

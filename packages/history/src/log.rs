//! # Version Log
//!
//! Append-only list of snapshots for one page.
//!
//! Entries live in an `Arc<[VersionSnapshot]>`. Appending builds a new slice
//! and swaps it in, so a reader holding the previous `Arc` keeps a complete,
//! consistent list and never observes a half-written append.

use crate::error::HistoryError;
use crate::snapshot::{SnapshotMeta, VersionSnapshot, VersionSummary};
use folio_model::{Page, PageId, VersionId};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct VersionLog {
    page_id: PageId,
    entries: Arc<[VersionSnapshot]>,
}

impl VersionLog {
    pub fn new(page_id: PageId) -> Self {
        Self {
            page_id,
            entries: Arc::from(Vec::new()),
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number the next appended snapshot must carry.
    pub fn next_version_number(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    /// Shared handle to the current entries, oldest first.
    pub fn entries(&self) -> Arc<[VersionSnapshot]> {
        Arc::clone(&self.entries)
    }

    pub fn latest(&self) -> Option<&VersionSnapshot> {
        self.entries.last()
    }

    pub fn get(&self, version_id: &VersionId) -> Result<&VersionSnapshot, HistoryError> {
        self.entries
            .iter()
            .find(|v| v.id == *version_id)
            .ok_or(HistoryError::VersionNotFound {
                page_id: self.page_id,
                version_id: *version_id,
            })
    }

    /// Summaries, newest first.
    pub fn summaries(&self) -> Vec<VersionSummary> {
        self.entries.iter().rev().map(VersionSnapshot::summary).collect()
    }

    /// Captures `page` as the next version without appending it.
    ///
    /// Lets a caller build the snapshot outside any lock and append it
    /// together with the page commit.
    pub fn prepare(&self, page: &Page, meta: SnapshotMeta) -> Result<VersionSnapshot, HistoryError> {
        if page.id != self.page_id {
            return Err(HistoryError::WrongPage {
                expected: self.page_id,
                found: page.id,
            });
        }
        VersionSnapshot::capture(page, self.next_version_number(), meta)
    }

    /// Appends a prepared snapshot. Version numbers must stay dense.
    pub fn append(&mut self, snapshot: VersionSnapshot) -> Result<VersionId, HistoryError> {
        if snapshot.entity_id != self.page_id {
            return Err(HistoryError::WrongPage {
                expected: self.page_id,
                found: snapshot.entity_id,
            });
        }
        let expected = self.next_version_number();
        if snapshot.version_number != expected {
            return Err(HistoryError::VersionOutOfSequence {
                expected,
                found: snapshot.version_number,
            });
        }

        let id = snapshot.id;
        debug!(
            page_id = %self.page_id,
            version = snapshot.version_number,
            change_type = %snapshot.change_type,
            "Appending version"
        );

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.extend_from_slice(&self.entries);
        next.push(snapshot);
        self.entries = Arc::from(next);
        Ok(id)
    }

    /// Captures and appends in one step.
    pub fn record(&mut self, page: &Page, meta: SnapshotMeta) -> Result<VersionId, HistoryError> {
        let snapshot = self.prepare(page, meta)?;
        self.append(snapshot)
    }
}

//! # Folio History
//!
//! Non-destructive audit trail for pages.
//!
//! Every explicit save appends an immutable [`VersionSnapshot`] of the page's
//! section/component tree. Restoring a version never rewrites history: the
//! live tree is replaced and a new `restore` snapshot is appended that points
//! back at the source version.
//!
//! ```text
//! v1 create ─ v2 update ─ v3 layout ─ v4 restore (from v2)
//! ```

mod compare;
mod error;
mod log;
mod snapshot;

pub use compare::{compare, detect_change_type, ComponentChange, TreeDiff};
pub use error::HistoryError;
pub use log::VersionLog;
pub use snapshot::{ChangeType, EntityType, SnapshotMeta, VersionSnapshot, VersionSummary};

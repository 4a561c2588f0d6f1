//! # Folio Workspace
//!
//! The page engine: the in-process API the admin UI, renderer and
//! persistence layer talk to.
//!
//! - [`PageEngine`] - tenant-scoped entry points for pages, mutations,
//!   sessions, history, lock & clone and rendering
//! - [`PageRepository`] - persistence port with atomic page + snapshot commit
//! - [`PageLocks`] - single writer per page
//! - [`EngineConfig`] / [`init_tracing`] - configuration and telemetry
//!
//! ## Example
//!
//! ```rust,ignore
//! let engine = PageEngine::in_memory(EngineConfig::default());
//! let page = engine.create_page(&tenant, NewPage::new("About", "/about"))?;
//! engine.apply(&tenant, page.id, Mutation::InsertSection { .. })?;
//! ```

pub mod clone;
pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod repository;
pub mod telemetry;

pub use clone::derive_page;
pub use config::{ConfigError, EngineConfig, TelemetryConfig};
pub use engine::{NewPage, PageEngine, SaveOptions};
pub use error::{EngineError, LockedPageError};
pub use locks::PageLocks;
pub use repository::{MemoryRepository, PageRepository, RepositoryError};
pub use telemetry::init_tracing;

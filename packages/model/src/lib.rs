//! # Folio Model
//!
//! Canonical representation of composed pages.
//!
//! ## Structure
//!
//! ```text
//! Page (tenant-scoped, unique path)
//!  └── Section[]   ordered, dense 0..n-1, layout kind + settings
//!       └── Component[]   ordered, dense 0..n-1, typed content,
//!                         optional parent_id for nesting
//! ```
//!
//! Pages exclusively own their sections and sections exclusively own their
//! components. Nesting between components is expressed with `parent_id`
//! foreign keys inside a section, never with back-pointers, so whole trees
//! can be cloned and re-keyed without ownership cycles.
//!
//! [`validate`] is the single authority on structural correctness and is run
//! before every commit.

mod component;
mod content;
mod error;
mod ids;
mod page;
mod path;
mod records;
mod section;
mod validate;

pub use component::Component;
pub use content::{
    AccordionItem, ComponentContent, ComponentType, FormField, FormFieldKind, GalleryImage,
    PricingPlan, TabItem,
};
pub use error::{EntityRef, ModelError};
pub use ids::{ComponentId, PageId, SectionId, TenantId, VersionId};
pub use page::{Page, PageOrigin, PageType, SeoMetadata};
pub use path::{copy_path, normalize_path};
pub use records::{ComponentRecord, PageRecord, PageRows, SectionRecord};
pub use section::{CustomLayout, LayoutKind, Section, SectionSettings, Spacing};
pub use validate::{validate, InvariantViolation, Violations};

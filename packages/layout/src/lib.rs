//! # Folio Layout
//!
//! Turns a section's ordered components into named regions and renders
//! those regions to a display tree.
//!
//! Distribution is deterministic: the same components and layout always yield
//! the same regions, in the same order. Preview and published rendering go
//! through the same functions so they cannot disagree.

pub mod distribute;
pub mod render;

pub use distribute::{distribute, distribute_section, Region, Regions};
pub use distribute::{COL1, COL2, COL3, LEFT, MAIN, RIGHT, SIDEBAR};
pub use render::{
    render_page, render_regions, render_section, ComponentRenderer, DefaultRenderer, DisplayNode,
    RenderOptions, RenderedPage, RenderedRegion, RenderedSection, RenderedTree,
};

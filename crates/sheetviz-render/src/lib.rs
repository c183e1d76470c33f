//! Composite rendering for the sheetviz pipeline.
//!
//! Consumes a base image's decoded bitmap plus the classified overlay sets
//! and produces flattened JPEG composites: image overlays pasted with alpha,
//! shape overlays rasterized with scale correction (rectangles, ellipses,
//! rounded rectangles, triangles, centered text), everything alpha-composited
//! in z-order onto a copy of the base.

pub mod compose;
pub mod font;

pub use compose::{composite_file_name, render_composite, render_overlay_set};
pub use font::resolve_font;

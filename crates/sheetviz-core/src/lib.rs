//! Core types for the sheetviz pipeline.
//!
//! This crate holds everything the extraction backend and the composite
//! renderer share: unit conversion, per-sheet size tables, cell-anchor
//! resolution, the normalized [`VisualObject`] model, the overlap
//! classifier, and the error taxonomy. No I/O happens here.
//!
//! # Pipeline position
//!
//! ```text
//! sheetviz-backend ──▶ VisualObject ──▶ classify_sheet ──▶ OverlaySet
//!                                                             │
//!                                       sheetviz-render ◀─────┘
//! ```

pub mod anchor;
pub mod error;
pub mod geometry;
pub mod object;
pub mod overlap;
pub mod sheet;
pub mod units;

pub use anchor::{AnchorCell, CellAnchor, Extent, ResolvedAnchor};
pub use error::{Result, SheetVizError};
pub use geometry::{column_letter, BoundingBox, CellRef};
pub use object::{
    Fill, ObjectContent, ObjectKind, Outline, ShapeGeometry, ShapeStyle, VisualObject,
};
pub use overlap::{classify_sheet, OverlaySet};
pub use sheet::SheetGeometry;

//! Workbook access and drawing-object extraction.
//!
//! The high-level workbook model supplies sheet enumeration; drawings,
//! dimension tables and media are not exposed there, so this crate reads the
//! underlying OOXML parts directly from the ZIP container and normalizes
//! everything into [`sheetviz_core::VisualObject`]s:
//!
//! - [`workbook`]: the two-handle workbook reader (model + container)
//! - [`dimensions`]: worksheet column-width / row-height tables
//! - [`drawing`]: picture and shape definitions with anchors and styling
//! - [`extract`]: the per-sheet extraction driver with the log-and-degrade
//!   failure policy

pub mod dimensions;
pub mod drawing;
pub mod extract;
pub mod workbook;

pub use dimensions::parse_sheet_dimensions;
pub use drawing::{parse_drawing, parse_relationships, DrawingContent, PictureDef, ShapeDef};
pub use extract::{extract_sheet, SheetObjects};
pub use workbook::WorkbookReader;

//! Cell anchors and their resolution to absolute pixel boxes.
//!
//! The drawing layer attaches every object to the sheet with one of exactly
//! three anchor kinds; [`CellAnchor::resolve`] is a single exhaustive match
//! over them. Resolution never mutates the sheet tables and is deterministic
//! for a given [`SheetGeometry`].

use crate::error::{Result, SheetVizError};
use crate::geometry::{BoundingBox, CellRef};
use crate::sheet::SheetGeometry;
use crate::units::emu_to_pixels;

/// Largest column index a size walk may reach (the sheet column limit).
const MAX_COLUMNS: u32 = 16_384;

/// Largest row index a size walk may reach (the sheet row limit).
const MAX_ROWS: u32 = 1_048_576;

/// One corner of an anchor: a cell plus sub-cell EMU offsets.
///
/// Row and column are 0-based, exactly as stored in the drawing XML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorCell {
    pub row: u32,
    pub col: u32,
    /// Horizontal offset into the cell, in EMU.
    pub col_off: i64,
    /// Vertical offset into the cell, in EMU.
    pub row_off: i64,
}

/// Physical extent of a one-cell anchor, in EMU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    pub cx: i64,
    pub cy: i64,
}

/// The positioning descriptor attaching a drawn object to sheet cells.
#[derive(Debug, Clone, PartialEq)]
pub enum CellAnchor {
    /// Both corners given as cells with offsets.
    TwoCell { from: AnchorCell, to: AnchorCell },
    /// Top-left corner plus a physical extent.
    OneCell { from: AnchorCell, extent: Extent },
    /// A bare A1 cell reference; no size information is recoverable.
    Legacy(String),
}

/// A resolved anchor: absolute pixel box plus the covered cell range.
///
/// Width and height may be zero (legacy anchors, failed resolution) or
/// negative (malformed two-cell anchors, passed through unclamped);
/// downstream treats non-positive sizes as unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnchor {
    pub bbox: BoundingBox,
    pub top_left: Option<CellRef>,
    pub bottom_right: Option<CellRef>,
    /// Pixel offset of the top-left corner within its cell.
    pub start_offset: (f64, f64),
    /// Pixel offset of the bottom-right corner within its cell.
    pub end_offset: (f64, f64),
}

impl ResolvedAnchor {
    /// Zero-size box at the sheet origin, substituted when resolution fails.
    #[must_use]
    pub fn degenerate() -> Self {
        Self {
            bbox: BoundingBox::degenerate(),
            top_left: None,
            bottom_right: None,
            start_offset: (0.0, 0.0),
            end_offset: (0.0, 0.0),
        }
    }
}

impl CellAnchor {
    /// Resolve this anchor against a sheet's size tables.
    ///
    /// # Errors
    ///
    /// Returns [`SheetVizError::AnchorResolution`] for malformed legacy
    /// references and for extent walks that cannot terminate (non-positive
    /// configured sizes, walks past the sheet limits). Callers log the error
    /// and substitute [`ResolvedAnchor::degenerate`] so one bad anchor never
    /// blocks the rest of the sheet.
    pub fn resolve(&self, sheet: &SheetGeometry) -> Result<ResolvedAnchor> {
        match self {
            Self::TwoCell { from, to } => Ok(resolve_two_cell(from, to, sheet)),
            Self::OneCell { from, extent } => resolve_one_cell(from, extent, sheet),
            Self::Legacy(cell) => resolve_legacy(cell, sheet),
        }
    }
}

/// Absolute pixel position of an anchor corner, with its intra-cell offset.
fn corner_px(cell: &AnchorCell, sheet: &SheetGeometry) -> (f64, f64, f64, f64) {
    let (ox, oy) = sheet.cell_origin_px(cell.row + 1, cell.col + 1);
    let off_x = emu_to_pixels(cell.col_off);
    let off_y = emu_to_pixels(cell.row_off);
    (ox + off_x, oy + off_y, off_x, off_y)
}

fn resolve_two_cell(from: &AnchorCell, to: &AnchorCell, sheet: &SheetGeometry) -> ResolvedAnchor {
    let (x1, y1, sx, sy) = corner_px(from, sheet);
    let (x2, y2, ex, ey) = corner_px(to, sheet);
    ResolvedAnchor {
        // Malformed anchors may yield a negative size here; passed through.
        bbox: BoundingBox::new(x1, y1, x2 - x1, y2 - y1),
        top_left: Some(CellRef::new(from.row + 1, from.col + 1)),
        bottom_right: Some(CellRef::new(to.row + 1, to.col + 1)),
        start_offset: (sx, sy),
        end_offset: (ex, ey),
    }
}

fn resolve_one_cell(
    from: &AnchorCell,
    extent: &Extent,
    sheet: &SheetGeometry,
) -> Result<ResolvedAnchor> {
    let (x, y, off_x, off_y) = corner_px(from, sheet);
    let width = emu_to_pixels(extent.cx);
    let height = emu_to_pixels(extent.cy);

    let (end_col, end_off_x) = consume_sizes(
        from.col + 1,
        off_x + width,
        MAX_COLUMNS,
        |i| sheet.column_width_px(i),
        "column",
    )?;
    let (end_row, end_off_y) = consume_sizes(
        from.row + 1,
        off_y + height,
        MAX_ROWS,
        |i| sheet.row_height_px(i),
        "row",
    )?;

    Ok(ResolvedAnchor {
        bbox: BoundingBox::new(x, y, width, height),
        top_left: Some(CellRef::new(from.row + 1, from.col + 1)),
        bottom_right: Some(CellRef::new(end_row, end_col)),
        start_offset: (off_x, off_y),
        end_offset: (end_off_x, end_off_y),
    })
}

fn resolve_legacy(cell: &str, sheet: &SheetGeometry) -> Result<ResolvedAnchor> {
    let cell_ref = CellRef::parse_a1(cell)?;
    let (x, y) = sheet.cell_origin_px(cell_ref.row, cell_ref.col);
    Ok(ResolvedAnchor {
        bbox: BoundingBox::new(x, y, 0.0, 0.0),
        top_left: Some(cell_ref),
        bottom_right: Some(cell_ref),
        start_offset: (0.0, 0.0),
        end_offset: (0.0, 0.0),
    })
}

/// Grow-and-consume walk along one axis.
///
/// Starting at 1-based index `start`, whole cells are consumed while the
/// remaining distance covers them; the terminal index and the leftover
/// remainder define the bottom-right corner. A distance landing exactly on a
/// cell boundary consumes that cell and stops at the next index with zero
/// remainder.
fn consume_sizes(
    start: u32,
    distance: f64,
    limit: u32,
    size_px: impl Fn(u32) -> f64,
    axis: &str,
) -> Result<(u32, f64)> {
    let mut index = start;
    let mut remaining = distance;
    while remaining > 0.0 {
        if index > limit {
            return Err(SheetVizError::AnchorResolution(format!(
                "{axis} walk ran past the sheet limit (start {start}, distance {distance:.1}px)"
            )));
        }
        let size = size_px(index);
        if size <= 0.0 {
            return Err(SheetVizError::AnchorResolution(format!(
                "non-positive {axis} size at index {index}"
            )));
        }
        if remaining < size {
            break;
        }
        remaining -= size;
        index += 1;
    }
    Ok((index, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{
        pixels_to_emu, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, PIXELS_PER_CHAR, PIXELS_PER_POINT,
    };

    fn anchor_cell(row: u32, col: u32, col_off: i64, row_off: i64) -> AnchorCell {
        AnchorCell {
            row,
            col,
            col_off,
            row_off,
        }
    }

    /// Two-cell anchor across two default columns/rows resolves to the
    /// default-sized box at the origin.
    #[test]
    fn test_two_cell_default_geometry() {
        let sheet = SheetGeometry::new();
        let anchor = CellAnchor::TwoCell {
            from: anchor_cell(0, 0, 0, 0),
            to: anchor_cell(2, 2, 0, 0),
        };
        let resolved = anchor.resolve(&sheet).expect("two-cell resolution");

        assert_eq!(resolved.bbox.x, 0.0);
        assert_eq!(resolved.bbox.y, 0.0);
        assert!((resolved.bbox.width - 2.0 * DEFAULT_COLUMN_WIDTH * PIXELS_PER_CHAR).abs() < 1e-9);
        assert!((resolved.bbox.height - 2.0 * DEFAULT_ROW_HEIGHT * PIXELS_PER_POINT).abs() < 1e-9);
        assert_eq!(resolved.top_left, Some(CellRef::new(1, 1)));
        assert_eq!(resolved.bottom_right, Some(CellRef::new(3, 3)));
    }

    /// Resolution is a pure function of anchor and geometry.
    #[test]
    fn test_two_cell_deterministic() {
        let mut sheet = SheetGeometry::new();
        sheet.set_column_width(2, 12.0);
        sheet.set_row_height(2, 22.0);
        let anchor = CellAnchor::TwoCell {
            from: anchor_cell(1, 1, 9525, 19050),
            to: anchor_cell(4, 3, 0, 0),
        };

        let a = anchor.resolve(&sheet).expect("resolution");
        let b = anchor.resolve(&sheet).expect("resolution");
        assert_eq!(a, b);
    }

    /// A reversed two-cell anchor produces a negative size, unclamped.
    #[test]
    fn test_two_cell_malformed_negative_size() {
        let sheet = SheetGeometry::new();
        let anchor = CellAnchor::TwoCell {
            from: anchor_cell(3, 3, 0, 0),
            to: anchor_cell(1, 1, 0, 0),
        };
        let resolved = anchor.resolve(&sheet).expect("resolution");
        assert!(resolved.bbox.width < 0.0);
        assert!(resolved.bbox.height < 0.0);
        assert!(!resolved.bbox.has_positive_size());
    }

    /// An extent exactly one full column/row wide lands one cell past the
    /// start with zero remainder.
    #[test]
    fn test_one_cell_exact_boundary() {
        let sheet = SheetGeometry::new();
        let col_px = DEFAULT_COLUMN_WIDTH * PIXELS_PER_CHAR;
        let row_px = DEFAULT_ROW_HEIGHT * PIXELS_PER_POINT;
        let anchor = CellAnchor::OneCell {
            from: anchor_cell(1, 1, 0, 0),
            extent: Extent {
                cx: pixels_to_emu(col_px),
                cy: pixels_to_emu(row_px),
            },
        };

        let resolved = anchor.resolve(&sheet).expect("one-cell resolution");
        assert_eq!(resolved.bottom_right, Some(CellRef::new(3, 3)));
        assert!(resolved.end_offset.0.abs() < 1e-6);
        assert!(resolved.end_offset.1.abs() < 1e-6);
    }

    /// An extent that stops partway through a column leaves the remainder as
    /// the bottom-right offset.
    #[test]
    fn test_one_cell_partial_column() {
        let mut sheet = SheetGeometry::new();
        sheet.set_column_width(1, 10.0); // 70px
        sheet.set_column_width(2, 10.0);
        let anchor = CellAnchor::OneCell {
            from: anchor_cell(0, 0, 0, 0),
            extent: Extent {
                cx: pixels_to_emu(100.0),
                cy: pixels_to_emu(5.0),
            },
        };

        let resolved = anchor.resolve(&sheet).expect("one-cell resolution");
        // 70px consumes column 1; 30px remain inside column 2.
        assert_eq!(resolved.bottom_right.map(|c| c.col), Some(2));
        assert!((resolved.end_offset.0 - 30.0).abs() < 1e-6);
        // 5px sit inside the first row.
        assert_eq!(resolved.bottom_right.map(|c| c.row), Some(1));
        assert!((resolved.end_offset.1 - 5.0).abs() < 1e-6);
    }

    /// The start offset participates in the walk distance.
    #[test]
    fn test_one_cell_offset_included_in_walk() {
        let sheet = SheetGeometry::new();
        let col_px = DEFAULT_COLUMN_WIDTH * PIXELS_PER_CHAR;
        let anchor = CellAnchor::OneCell {
            from: anchor_cell(0, 0, pixels_to_emu(col_px / 2.0), 0),
            extent: Extent {
                cx: pixels_to_emu(col_px),
                cy: 0,
            },
        };

        let resolved = anchor.resolve(&sheet).expect("one-cell resolution");
        // Half a column of offset plus a full column of extent ends halfway
        // through the second column.
        assert_eq!(resolved.bottom_right.map(|c| c.col), Some(2));
        assert!((resolved.end_offset.0 - col_px / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_cell_zero_width_column_errors() {
        let mut sheet = SheetGeometry::new();
        sheet.set_column_width(1, 0.0);
        let anchor = CellAnchor::OneCell {
            from: anchor_cell(0, 0, 0, 0),
            extent: Extent {
                cx: pixels_to_emu(10.0),
                cy: 0,
            },
        };

        match anchor.resolve(&sheet) {
            Err(SheetVizError::AnchorResolution(msg)) => {
                assert!(msg.contains("non-positive"), "unexpected message: {msg}");
            }
            other => panic!("Expected AnchorResolution error, got {other:?}"),
        }
    }

    #[test]
    fn test_legacy_reference_is_degenerate_at_cell() {
        let sheet = SheetGeometry::new();
        let anchor = CellAnchor::Legacy("B2".to_string());
        let resolved = anchor.resolve(&sheet).expect("legacy resolution");

        assert!((resolved.bbox.x - DEFAULT_COLUMN_WIDTH * PIXELS_PER_CHAR).abs() < 1e-9);
        assert!((resolved.bbox.y - DEFAULT_ROW_HEIGHT * PIXELS_PER_POINT).abs() < 1e-9);
        assert_eq!(resolved.bbox.width, 0.0);
        assert_eq!(resolved.bbox.height, 0.0);
        assert_eq!(resolved.top_left, resolved.bottom_right);
    }

    #[test]
    fn test_legacy_malformed_reference_errors() {
        let sheet = SheetGeometry::new();
        let anchor = CellAnchor::Legacy("not-a-cell".to_string());
        assert!(anchor.resolve(&sheet).is_err());
    }
}

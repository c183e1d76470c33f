//! Cell references and pixel-space bounding boxes.

use crate::error::{Result, SheetVizError};
use std::fmt;

/// A 1-based worksheet cell reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Row index (1-based).
    pub row: u32,
    /// Column index (1-based).
    pub col: u32,
}

impl CellRef {
    /// Create a cell reference from 1-based row and column indices.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1-style coordinate: row 7, column 2 formats as `B7`.
    #[must_use]
    pub fn a1(&self) -> String {
        format!("{}{}", column_letter(self.col), self.row)
    }

    /// Parse an A1-style coordinate such as `B7` or `AA12`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetVizError::AnchorResolution`] when the reference has no
    /// letter prefix, no row digits, or a row of zero.
    pub fn parse_a1(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| bad_ref(trimmed))?;
        let (letters, digits) = trimmed.split_at(split);
        if letters.is_empty() {
            return Err(bad_ref(trimmed));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            let c = c.to_ascii_uppercase();
            if !c.is_ascii_uppercase() {
                return Err(bad_ref(trimmed));
            }
            col = col * 26 + (c as u32 - 'A' as u32 + 1);
        }

        let row: u32 = digits.parse().map_err(|_| bad_ref(trimmed))?;
        if row == 0 {
            return Err(bad_ref(trimmed));
        }
        Ok(Self { row, col })
    }
}

fn bad_ref(s: &str) -> SheetVizError {
    SheetVizError::AnchorResolution(format!("malformed cell reference: {s:?}"))
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a1())
    }
}

/// Spreadsheet column letters for a 1-based column index (1 → `A`, 27 → `AA`).
#[must_use]
pub fn column_letter(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(u8::try_from(rem).unwrap_or(0) + b'A');
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// An axis-aligned box in absolute sheet pixels.
///
/// This is the "logical box" derived from anchor math, as opposed to the
/// dimensions of a decoded bitmap. Width and height may be zero or negative
/// for degenerate or malformed anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size box at the origin, used for unresolved anchors.
    #[must_use]
    pub const fn degenerate() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Both dimensions strictly positive. Zero-sized boxes cannot
    /// meaningfully overlap and are excluded from classification.
    #[must_use]
    pub fn has_positive_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Separating-axis rectangle test. Boxes that merely touch along an edge
    /// do not count as overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Edge-inclusive containment: every edge of `other` lies within or on
    /// the edges of `self`.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

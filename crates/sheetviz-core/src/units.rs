//! Unit conversion constants and helpers.
//!
//! Drawing-layer lengths are stored in EMU (English Metric Units, 914,400 per
//! inch). Column widths are stored in character units and row heights in
//! points; both convert to pixels through fixed factors at 96 DPI.

/// EMU per inch in OOXML drawing coordinates.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per pixel at 96 DPI (914,400 / 96).
pub const EMU_PER_PIXEL: f64 = 9525.0;

/// EMU per typographic point (914,400 / 72). Outline widths are stored in
/// this unit.
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Column width in character units when the sheet does not configure one.
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Pixels per character-width unit.
pub const PIXELS_PER_CHAR: f64 = 7.0;

/// Row height in points when the sheet does not configure one.
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Pixels per point for row heights.
pub const PIXELS_PER_POINT: f64 = 1.33;

/// Text size in points when a shape's text carries no explicit size.
pub const DEFAULT_FONT_SIZE_PT: f32 = 11.0;

/// Outline width in points when a shape outline carries no explicit width.
pub const DEFAULT_OUTLINE_WIDTH_PT: f64 = 1.0;

/// Convert an EMU length to pixels. Zero maps to zero.
#[inline]
#[must_use]
pub fn emu_to_pixels(emu: i64) -> f64 {
    if emu == 0 {
        0.0
    } else {
        emu as f64 / EMU_PER_PIXEL
    }
}

/// Convert a pixel length back to EMU. Inverse of [`emu_to_pixels`].
#[inline]
#[must_use]
pub fn pixels_to_emu(px: f64) -> i64 {
    (px * EMU_PER_PIXEL).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emu_to_pixels_zero() {
        assert_eq!(emu_to_pixels(0), 0.0);
    }

    #[test]
    fn test_emu_to_pixels_one_inch() {
        // One inch is 96 pixels at the fixed divisor.
        assert!((emu_to_pixels(EMU_PER_INCH) - 96.0).abs() < 1e-9);
    }

    /// Round-trip property: pixels -> EMU -> pixels is the identity within
    /// floating-point tolerance.
    #[test]
    fn test_pixel_emu_round_trip() {
        for px in [1.0, 7.0, 59.01, 96.0, 1234.0] {
            let back = emu_to_pixels(pixels_to_emu(px));
            assert!(
                (back - px).abs() < 1e-3,
                "round trip of {px}px drifted to {back}px"
            );
        }
    }
}

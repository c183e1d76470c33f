//! Font resolution for shape text.
//!
//! An ordered list of font sources is tried in sequence: well-known system
//! faces first, then the embedded DejaVu face as the guaranteed terminal
//! fallback. Text rendering therefore always has a usable font; a missing
//! system font is never user-visible.

use ab_glyph::FontArc;
use sheetviz_core::SheetVizError;

/// Embedded fallback face, always available.
static FALLBACK_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// System font paths tried before the embedded fallback, in order.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Resolve a renderable font.
///
/// Never fails: unreadable or unparsable candidates are skipped (logged at
/// debug level) and the embedded face terminates the chain.
#[must_use]
pub fn resolve_font() -> FontArc {
    for path in FONT_CANDIDATES {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                log::debug!("Using font {path}");
                return font;
            }
            Err(e) => {
                let err = SheetVizError::FontResolution(format!("{path}: {e}"));
                log::debug!("{err}");
            }
        }
    }

    // The embedded face ships with the binary and always parses.
    FontArc::try_from_slice(FALLBACK_FONT).expect("Failed to load embedded font")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font;

    #[test]
    fn test_embedded_fallback_parses() {
        let font = FontArc::try_from_slice(FALLBACK_FONT).expect("embedded font must parse");
        assert!(font.glyph_id('A').0 != 0, "fallback font must cover ASCII");
    }

    #[test]
    fn test_resolve_font_always_succeeds() {
        let font = resolve_font();
        assert!(font.glyph_id('0').0 != 0);
    }
}

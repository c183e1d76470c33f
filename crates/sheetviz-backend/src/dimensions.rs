//! Worksheet column-width and row-height parsing.
//!
//! Dimension records live in the worksheet part, not the drawing part:
//!
//! ```xml
//! <cols>
//!   <col min="2" max="4" width="12.5" customWidth="1"/>
//! </cols>
//! <sheetData>
//!   <row r="3" ht="25" customHeight="1">...</row>
//! </sheetData>
//! ```
//!
//! `<col>` entries cover an inclusive column span; `<row>` entries carry a
//! height only when one was configured.

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use sheetviz_core::{Result, SheetGeometry, SheetVizError};

/// Hard cap on a single `<col>` span, matching the sheet column limit.
const MAX_COL_SPAN: u32 = 16_384;

/// Parse a worksheet part into its size tables.
///
/// # Errors
///
/// Returns [`SheetVizError::Workbook`] when the XML cannot be read. Callers
/// degrade to default tables so one malformed worksheet never aborts the run.
pub fn parse_sheet_dimensions(xml: &str) -> Result<SheetGeometry> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);

    let mut geometry = SheetGeometry::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => match e.local_name().as_ref() {
                b"col" => {
                    let mut min: Option<u32> = None;
                    let mut max: Option<u32> = None;
                    let mut width: Option<f64> = None;
                    for attr in e.attributes().filter_map(std::result::Result::ok) {
                        match attr.key.as_ref() {
                            b"min" => min = parse_attr(&attr.value),
                            b"max" => max = parse_attr(&attr.value),
                            b"width" => width = parse_attr(&attr.value),
                            _ => {}
                        }
                    }
                    if let (Some(min), Some(max), Some(width)) = (min, max, width) {
                        let max = max.min(min.saturating_add(MAX_COL_SPAN));
                        for col in min..=max {
                            geometry.set_column_width(col, width);
                        }
                    }
                }
                b"row" => {
                    let mut row: Option<u32> = None;
                    let mut height: Option<f64> = None;
                    for attr in e.attributes().filter_map(std::result::Result::ok) {
                        match attr.key.as_ref() {
                            b"r" => row = parse_attr(&attr.value),
                            b"ht" => height = parse_attr(&attr.value),
                            _ => {}
                        }
                    }
                    if let (Some(row), Some(height)) = (row, height) {
                        geometry.set_row_height(row, height);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SheetVizError::Workbook(format!(
                    "malformed worksheet XML: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(geometry)
}

fn parse_attr<T: std::str::FromStr>(value: &[u8]) -> Option<T> {
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}

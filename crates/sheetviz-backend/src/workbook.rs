//! Workbook access: sheet enumeration plus direct part reads.
//!
//! The high-level workbook model (calamine) supplies the sheet list in
//! document order, but exposes neither drawings nor column/row dimension
//! records. Those live in the OOXML parts of the ZIP container:
//!
//! - `xl/worksheets/sheetN.xml`: column width / row height tables
//! - `xl/drawings/drawingN.xml`: picture and shape definitions with anchors
//! - `xl/drawings/_rels/drawingN.xml.rels`: relationship id → media path
//! - `xl/media/`: the embedded image files
//!
//! so a second handle on the file reads them directly.

use crate::dimensions::parse_sheet_dimensions;
use crate::drawing::parse_relationships;
use calamine::{open_workbook, Reader, Xlsx};
use sheetviz_core::{Result, SheetGeometry, SheetVizError};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read as IoRead;
use std::path::Path;
use zip::ZipArchive;

/// Open workbook with a parallel handle on its ZIP container.
#[derive(Debug)]
pub struct WorkbookReader {
    sheet_names: Vec<String>,
    archive: ZipArchive<File>,
}

impl WorkbookReader {
    /// Open a workbook file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetVizError::Workbook`] when the file is not a readable
    /// workbook or not a valid ZIP container. This is the fatal entry point:
    /// everything downstream degrades per object instead of failing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| SheetVizError::Workbook(format!("failed to open workbook: {e}")))?;
        let sheet_names = workbook.sheet_names().to_vec();

        let file = File::open(path)?;
        let archive = ZipArchive::new(file)
            .map_err(|e| SheetVizError::Workbook(format!("not a valid OOXML container: {e}")))?;

        Ok(Self {
            sheet_names,
            archive,
        })
    }

    /// Sheet names in document order.
    #[must_use]
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Column/row size tables for a sheet (0-based index).
    ///
    /// A missing worksheet part or a malformed dimension record degrades to
    /// the default tables; the warning identifies the part.
    pub fn sheet_geometry(&mut self, sheet_idx: usize) -> SheetGeometry {
        let path = format!("xl/worksheets/sheet{}.xml", sheet_idx + 1);
        match self.read_part_string(&path) {
            Ok(xml) => match parse_sheet_dimensions(&xml) {
                Ok(geometry) => geometry,
                Err(e) => {
                    log::warn!("Failed to parse dimensions in {path}: {e}");
                    SheetGeometry::new()
                }
            },
            Err(_) => SheetGeometry::new(),
        }
    }

    /// Raw drawing XML for a sheet, if the sheet has a drawing part.
    ///
    /// Sheet N maps to `xl/drawings/drawingN.xml`; sheets without drawings
    /// simply have no such part.
    pub fn drawing_xml(&mut self, sheet_idx: usize) -> Option<String> {
        self.read_part_string(&format!("xl/drawings/drawing{}.xml", sheet_idx + 1))
            .ok()
    }

    /// Relationship id → target map for a sheet's drawing part.
    pub fn drawing_relationships(&mut self, sheet_idx: usize) -> HashMap<String, String> {
        match self.read_part_string(&format!(
            "xl/drawings/_rels/drawing{}.xml.rels",
            sheet_idx + 1
        )) {
            Ok(xml) => parse_relationships(&xml),
            Err(_) => HashMap::new(),
        }
    }

    /// Bytes of an embedded media file referenced from a drawing.
    ///
    /// # Errors
    ///
    /// Returns [`SheetVizError::Workbook`] when the target part does not
    /// exist, or an I/O error while reading it.
    pub fn media_bytes(&mut self, target: &str) -> Result<Vec<u8>> {
        let path = normalize_media_target(target);
        let mut file = self
            .archive
            .by_name(&path)
            .map_err(|e| SheetVizError::Workbook(format!("missing media {path}: {e}")))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn read_part_string(&mut self, path: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|e| SheetVizError::Workbook(format!("part not found: {path}: {e}")))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }
}

/// Convert a drawing-relative media target like `../media/image1.png` to its
/// absolute part path `xl/media/image1.png`.
fn normalize_media_target(target: &str) -> String {
    target.strip_prefix("../media/").map_or_else(
        || format!("xl/{target}"),
        |suffix| format!("xl/media/{suffix}"),
    )
}

//! Per-sheet extraction: drawing objects to normalized [`VisualObject`]s.

use crate::drawing::parse_drawing;
use crate::workbook::WorkbookReader;
use sheetviz_core::{CellAnchor, ResolvedAnchor, SheetGeometry, SheetVizError, VisualObject};

/// All visual objects extracted from one sheet.
#[derive(Debug, Default)]
pub struct SheetObjects {
    pub images: Vec<VisualObject>,
    pub shapes: Vec<VisualObject>,
}

/// Extract and resolve every drawn object on a sheet.
///
/// All failure modes below the workbook level are contained here:
/// - a missing drawing part yields an empty set;
/// - malformed drawing XML yields an empty set (warned);
/// - an unresolvable anchor degrades that object to a zero-size box (warned);
/// - undecodable image bytes keep the raw bytes but drop the bitmap (warned),
///   excluding the object from overlap analysis while it still gets saved.
pub fn extract_sheet(
    reader: &mut WorkbookReader,
    sheet_idx: usize,
    sheet_name: &str,
) -> SheetObjects {
    let geometry = reader.sheet_geometry(sheet_idx);

    let Some(drawing_xml) = reader.drawing_xml(sheet_idx) else {
        return SheetObjects::default();
    };
    let content = match parse_drawing(&drawing_xml) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Sheet {sheet_name:?}: {e}");
            return SheetObjects::default();
        }
    };
    let relationships = reader.drawing_relationships(sheet_idx);

    let mut images = Vec::new();
    for (idx, picture) in content.pictures.into_iter().enumerate() {
        let ordinal = idx + 1;
        let Some(target) = relationships.get(&picture.rel_id) else {
            log::warn!(
                "Sheet {sheet_name:?}: no relationship target for {}",
                picture.rel_id
            );
            continue;
        };
        let bytes = match reader.media_bytes(target) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Sheet {sheet_name:?}: failed to read media {target}: {e}");
                continue;
            }
        };

        let resolved = resolve_or_degrade(&picture.anchor, &geometry, sheet_name);
        let bitmap = match image::load_from_memory(&bytes) {
            Ok(decoded) => Some(decoded.to_rgba8()),
            Err(e) => {
                let err = SheetVizError::ImageDecode(format!(
                    "sheet {sheet_name:?} image {ordinal}: {e}"
                ));
                log::warn!("{err}");
                None
            }
        };

        let name = image_file_name(&resolved, sheet_name, ordinal);
        let mut object = VisualObject::image(name, resolved.bbox, bytes, bitmap);
        apply_anchor(&mut object, &resolved);
        images.push(object);
    }

    let mut shapes = Vec::new();
    for shape in content.shapes {
        let resolved = resolve_or_degrade(&shape.anchor, &geometry, sheet_name);
        let mut object =
            VisualObject::shape(shape.name, resolved.bbox, shape.geometry, shape.style);
        apply_anchor(&mut object, &resolved);
        shapes.push(object);
    }

    SheetObjects { images, shapes }
}

/// Resolve an anchor, degrading to a zero-size box on failure so one bad
/// anchor never blocks the rest of the sheet.
fn resolve_or_degrade(
    anchor: &CellAnchor,
    geometry: &SheetGeometry,
    sheet_name: &str,
) -> ResolvedAnchor {
    match anchor.resolve(geometry) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::warn!("Sheet {sheet_name:?}: {e}");
            ResolvedAnchor::degenerate()
        }
    }
}

fn apply_anchor(object: &mut VisualObject, resolved: &ResolvedAnchor) {
    object.top_left = resolved.top_left;
    object.bottom_right = resolved.bottom_right;
    object.start_offset = resolved.start_offset;
    object.end_offset = resolved.end_offset;
}

/// Output name for an extracted image: the covered cell range when both
/// corners resolved, otherwise a sheet-scoped index (1-based).
fn image_file_name(resolved: &ResolvedAnchor, sheet_name: &str, ordinal: usize) -> String {
    match (resolved.top_left, resolved.bottom_right) {
        (Some(tl), Some(br)) => format!("{}-{}.png", tl.a1(), br.a1()),
        _ => format!("{sheet_name}_image_{ordinal}.png"),
    }
}

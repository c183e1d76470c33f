//! Drawing-part parsing: pictures and shapes with their anchors.
//!
//! A drawing part attaches every object to the sheet through an anchor
//! container:
//!
//! ```xml
//! <xdr:twoCellAnchor>
//!   <xdr:from><xdr:col>1</xdr:col><xdr:colOff>9525</xdr:colOff>
//!             <xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
//!   <xdr:to>...</xdr:to>
//!   <xdr:pic>
//!     <a:blip r:embed="rId1"/>
//!   </xdr:pic>
//! </xdr:twoCellAnchor>
//! <xdr:oneCellAnchor>
//!   <xdr:from>...</xdr:from>
//!   <xdr:ext cx="914400" cy="914400"/>
//!   <xdr:sp>
//!     <xdr:nvSpPr><xdr:cNvPr id="2" name="Oval 1"/></xdr:nvSpPr>
//!     <xdr:spPr>
//!       <a:prstGeom prst="ellipse"/>
//!       <a:solidFill><a:srgbClr val="FF0000"><a:alpha val="50000"/></a:srgbClr></a:solidFill>
//!       <a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>
//!     </xdr:spPr>
//!     <xdr:txBody><a:p><a:r><a:rPr sz="1400"/><a:t>Note</a:t></a:r></a:p></xdr:txBody>
//!   </xdr:sp>
//! </xdr:oneCellAnchor>
//! ```
//!
//! Two namespaces occur (`xdr` for the spreadsheet drawing layer, `a` for
//! the shared drawing layer); elements are matched both qualified and bare.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use sheetviz_core::units::{DEFAULT_FONT_SIZE_PT, DEFAULT_OUTLINE_WIDTH_PT, EMU_PER_POINT};
use sheetviz_core::{
    AnchorCell, CellAnchor, Extent, Fill, Outline, Result, ShapeGeometry, ShapeStyle,
    SheetVizError,
};
use std::collections::HashMap;

/// A picture definition: the relationship id of its media plus its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureDef {
    pub rel_id: String,
    pub anchor: CellAnchor,
}

/// A shape definition: name, geometry, styling and anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDef {
    pub name: String,
    pub anchor: CellAnchor,
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
}

/// Everything extracted from one drawing part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingContent {
    pub pictures: Vec<PictureDef>,
    pub shapes: Vec<ShapeDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    TwoCell,
    OneCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordField {
    Col,
    ColOff,
    Row,
    RowOff,
}

/// Anchor container currently being read.
#[derive(Default)]
struct AnchorState {
    container: Option<Container>,
    from: AnchorCell,
    to: AnchorCell,
    extent: Extent,
    in_from: bool,
    in_to: bool,
    coord: Option<CoordField>,
}

impl AnchorState {
    fn begin(&mut self, container: Container) {
        *self = Self::default();
        self.container = Some(container);
    }

    fn in_corner(&self) -> bool {
        self.in_from || self.in_to
    }

    fn store(&mut self, field: CoordField, value: i64) {
        let corner = if self.in_to {
            &mut self.to
        } else {
            &mut self.from
        };
        match field {
            CoordField::Col => corner.col = u32::try_from(value).unwrap_or(0),
            CoordField::Row => corner.row = u32::try_from(value).unwrap_or(0),
            CoordField::ColOff => corner.col_off = value,
            CoordField::RowOff => corner.row_off = value,
        }
    }

    /// The anchor for an object closing inside this container, if the
    /// container kind is one the pipeline understands.
    fn anchor(&self) -> Option<CellAnchor> {
        match self.container? {
            Container::TwoCell => Some(CellAnchor::TwoCell {
                from: self.from,
                to: self.to,
            }),
            Container::OneCell => Some(CellAnchor::OneCell {
                from: self.from,
                extent: self.extent,
            }),
        }
    }
}

/// Picture element currently being read.
#[derive(Default)]
struct PictureState {
    active: bool,
    rel_id: Option<String>,
}

/// Shape element currently being read.
#[derive(Default)]
struct ShapeState {
    active: bool,
    in_sp_pr: bool,
    in_ln: bool,
    in_tx_body: bool,
    in_p_pr: bool,
    in_text: bool,
    name: Option<String>,
    preset: Option<String>,
    fill_rgb: Option<[u8; 3]>,
    fill_alpha: Option<u8>,
    no_fill: bool,
    outline_rgb: Option<[u8; 3]>,
    outline_w_emu: Option<i64>,
    texts: Vec<String>,
    font_size: Option<f32>,
    para_run_size: Option<f32>,
    para_default_size: Option<f32>,
}

impl ShapeState {
    fn begin(&mut self) {
        *self = Self::default();
        self.active = true;
    }

    /// Font-size search order: within each paragraph the first explicit run
    /// size beats the paragraph default; the first paragraph that resolves a
    /// size wins for the whole text body.
    fn end_paragraph(&mut self) {
        if self.font_size.is_none() {
            self.font_size = self.para_run_size.or(self.para_default_size);
        }
        self.para_run_size = None;
        self.para_default_size = None;
    }

    fn finish(&mut self, ordinal: usize, anchor: CellAnchor) -> ShapeDef {
        let state = std::mem::take(self);

        // Explicit noFill wins over any color seen; no fill element at all
        // also means transparent.
        let fill = if state.no_fill {
            None
        } else {
            state.fill_rgb.map(|rgb| Fill {
                rgb,
                alpha: state.fill_alpha.unwrap_or(255),
            })
        };
        let outline = state.outline_rgb.map(|rgb| Outline {
            rgb,
            width_pt: state
                .outline_w_emu
                .map_or(DEFAULT_OUTLINE_WIDTH_PT, |w| w as f64 / EMU_PER_POINT),
        });
        let text = if state.texts.is_empty() {
            None
        } else {
            Some(state.texts.join(" "))
        };

        ShapeDef {
            name: state.name.unwrap_or_else(|| format!("Shape {ordinal}")),
            anchor,
            geometry: state
                .preset
                .as_deref()
                .map_or(ShapeGeometry::Rect, ShapeGeometry::from_preset),
            style: ShapeStyle {
                fill,
                outline,
                text,
                font_size_pt: state.font_size.unwrap_or(DEFAULT_FONT_SIZE_PT),
            },
        }
    }
}

/// Parse one drawing part.
///
/// # Errors
///
/// Returns [`SheetVizError::DrawingParse`] when the XML itself is malformed.
/// Callers treat that as an empty object set for the affected sheet.
pub fn parse_drawing(xml: &str) -> Result<DrawingContent> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);

    let mut content = DrawingContent::default();
    let mut anchor = AnchorState::default();
    let mut shape = ShapeState::default();
    let mut picture = PictureState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                handle_open(&e, true, &mut anchor, &mut shape, &mut picture);
            }
            Ok(Event::Empty(e)) => {
                // Self-closing elements never produce an End event, so they
                // must not toggle any nesting flag.
                handle_open(&e, false, &mut anchor, &mut shape, &mut picture);
            }
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    if let Some(field) = anchor.coord {
                        anchor.store(field, text.trim().parse().unwrap_or(0));
                    } else if shape.in_text && !text.is_empty() {
                        shape.texts.push(text.to_string());
                    }
                }
            }
            Ok(Event::End(e)) => {
                handle_close(&e.name(), &mut content, &mut anchor, &mut shape, &mut picture);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SheetVizError::DrawingParse(format!(
                    "malformed drawing XML: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(content)
}

#[allow(clippy::too_many_lines)] // One arm per element; splitting obscures the schema
fn handle_open(
    e: &BytesStart<'_>,
    has_children: bool,
    anchor: &mut AnchorState,
    shape: &mut ShapeState,
    picture: &mut PictureState,
) {
    match e.name().as_ref() {
        b"xdr:twoCellAnchor" | b"twoCellAnchor" if has_children => {
            anchor.begin(Container::TwoCell);
        }
        b"xdr:oneCellAnchor" | b"oneCellAnchor" if has_children => {
            anchor.begin(Container::OneCell);
        }
        b"xdr:from" | b"from" if has_children => anchor.in_from = true,
        b"xdr:to" | b"to" if has_children => anchor.in_to = true,
        b"xdr:col" | b"col" if anchor.in_corner() => anchor.coord = Some(CoordField::Col),
        b"xdr:colOff" | b"colOff" if anchor.in_corner() => {
            anchor.coord = Some(CoordField::ColOff);
        }
        b"xdr:row" | b"row" if anchor.in_corner() => anchor.coord = Some(CoordField::Row),
        b"xdr:rowOff" | b"rowOff" if anchor.in_corner() => {
            anchor.coord = Some(CoordField::RowOff);
        }
        // Anchor-level extent; `a:ext` inside a shape's transform is excluded
        // by the guards.
        b"xdr:ext" | b"ext" if !picture.active && !shape.active => {
            anchor.extent = Extent {
                cx: attr_parse(e, b"cx").unwrap_or(0),
                cy: attr_parse(e, b"cy").unwrap_or(0),
            };
        }
        b"xdr:pic" | b"pic" if has_children => {
            picture.active = true;
            picture.rel_id = None;
        }
        b"a:blip" | b"blip" if picture.active => {
            if let Some(id) = attr_string(e, &[b"r:embed", b"embed"]) {
                picture.rel_id = Some(id);
            }
        }
        b"xdr:sp" | b"sp" if has_children => shape.begin(),
        b"xdr:cNvPr" | b"cNvPr" if shape.active && !picture.active => {
            shape.name = attr_string(e, &[b"name"]);
        }
        b"xdr:spPr" | b"spPr" if shape.active && has_children => shape.in_sp_pr = true,
        b"a:prstGeom" | b"prstGeom" if shape.in_sp_pr => {
            shape.preset = attr_string(e, &[b"prst"]);
        }
        b"a:ln" | b"ln" if shape.in_sp_pr => {
            shape.outline_w_emu = attr_parse(e, b"w");
            if has_children {
                shape.in_ln = true;
            }
        }
        b"a:noFill" | b"noFill" if shape.in_sp_pr && !shape.in_ln => shape.no_fill = true,
        b"a:srgbClr" | b"srgbClr" if shape.in_sp_pr => {
            if let Some(rgb) = attr_string(e, &[b"val"]).as_deref().and_then(parse_hex_rgb) {
                if shape.in_ln {
                    shape.outline_rgb = Some(rgb);
                } else {
                    shape.fill_rgb = Some(rgb);
                }
            }
        }
        b"a:alpha" | b"alpha" if shape.in_sp_pr && !shape.in_ln => {
            shape.fill_alpha = attr_parse::<i64>(e, b"val").map(alpha_byte);
        }
        b"xdr:txBody" | b"txBody" if shape.active && has_children => shape.in_tx_body = true,
        b"a:p" | b"p" if shape.in_tx_body && has_children => {
            shape.para_run_size = None;
            shape.para_default_size = None;
        }
        b"a:pPr" | b"pPr" if shape.in_tx_body && has_children => shape.in_p_pr = true,
        b"a:defRPr" | b"defRPr" if shape.in_p_pr => {
            if shape.para_default_size.is_none() {
                shape.para_default_size = size_attr(e);
            }
        }
        b"a:rPr" | b"rPr" if shape.in_tx_body && !shape.in_p_pr => {
            if shape.para_run_size.is_none() {
                shape.para_run_size = size_attr(e);
            }
        }
        b"a:t" | b"t" if shape.in_tx_body && has_children => shape.in_text = true,
        _ => {}
    }
}

fn handle_close(
    name: &quick_xml::name::QName<'_>,
    content: &mut DrawingContent,
    anchor: &mut AnchorState,
    shape: &mut ShapeState,
    picture: &mut PictureState,
) {
    match name.as_ref() {
        b"xdr:twoCellAnchor" | b"twoCellAnchor" | b"xdr:oneCellAnchor" | b"oneCellAnchor" => {
            *anchor = AnchorState::default();
        }
        b"xdr:from" | b"from" => anchor.in_from = false,
        b"xdr:to" | b"to" => anchor.in_to = false,
        b"xdr:col" | b"col" | b"xdr:colOff" | b"colOff" | b"xdr:row" | b"row" | b"xdr:rowOff"
        | b"rowOff" => anchor.coord = None,
        b"xdr:pic" | b"pic" => {
            match (picture.rel_id.take(), anchor.anchor()) {
                (Some(rel_id), Some(a)) => content.pictures.push(PictureDef { rel_id, anchor: a }),
                _ => log::warn!("Skipping picture without relationship id or anchor container"),
            }
            picture.active = false;
        }
        b"xdr:sp" | b"sp" if shape.active => {
            if let Some(a) = anchor.anchor() {
                let ordinal = content.shapes.len() + 1;
                content.shapes.push(shape.finish(ordinal, a));
            } else {
                log::warn!("Skipping shape outside a recognized anchor container");
                *shape = ShapeState::default();
            }
        }
        b"xdr:spPr" | b"spPr" => {
            shape.in_sp_pr = false;
            shape.in_ln = false;
        }
        b"a:ln" | b"ln" => shape.in_ln = false,
        b"xdr:txBody" | b"txBody" => shape.in_tx_body = false,
        b"a:p" | b"p" if shape.in_tx_body => shape.end_paragraph(),
        b"a:pPr" | b"pPr" => shape.in_p_pr = false,
        b"a:t" | b"t" => shape.in_text = false,
        _ => {}
    }
}

/// Parse a relationships part into an id → target map.
#[must_use]
pub fn parse_relationships(xml: &str) -> HashMap<String, String> {
    let mut relationships = HashMap::new();
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr_string(&e, &[b"Id"]);
                    let target = attr_string(&e, &[b"Target"]);
                    if let (Some(id), Some(target)) = (id, target) {
                        relationships.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    relationships
}

/// First attribute matching any of `keys`, as a trimmed string.
fn attr_string(e: &BytesStart<'_>, keys: &[&[u8]]) -> Option<String> {
    for attr in e.attributes().filter_map(std::result::Result::ok) {
        if keys.contains(&attr.key.as_ref()) {
            return std::str::from_utf8(&attr.value)
                .ok()
                .map(|s| s.trim().to_string());
        }
    }
    None
}

fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr_string(e, &[key])?.parse().ok()
}

/// Text size attribute, stored in hundredths of a point.
fn size_attr(e: &BytesStart<'_>) -> Option<f32> {
    attr_parse::<f32>(e, b"sz").map(|sz| sz / 100.0)
}

/// Alpha attribute in thousandths of a percent (100,000 = opaque) to a byte.
fn alpha_byte(val: i64) -> u8 {
    let frac = (val as f64 / 100_000.0).clamp(0.0, 1.0);
    (frac * 255.0).round() as u8
}

fn parse_hex_rgb(s: &str) -> Option<[u8; 3]> {
    if s.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIC_TWO_CELL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing"
          xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <xdr:twoCellAnchor editAs="oneCell">
    <xdr:from>
      <xdr:col>1</xdr:col><xdr:colOff>19050</xdr:colOff>
      <xdr:row>2</xdr:row><xdr:rowOff>9525</xdr:rowOff>
    </xdr:from>
    <xdr:to>
      <xdr:col>4</xdr:col><xdr:colOff>0</xdr:colOff>
      <xdr:row>8</xdr:row><xdr:rowOff>0</xdr:rowOff>
    </xdr:to>
    <xdr:pic>
      <xdr:nvPicPr><xdr:cNvPr id="2" name="Picture 1"/><xdr:cNvPicPr/></xdr:nvPicPr>
      <xdr:blipFill><a:blip r:embed="rId1"/></xdr:blipFill>
      <xdr:spPr><a:prstGeom prst="rect"/></xdr:spPr>
    </xdr:pic>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
</xdr:wsDr>"#;

    #[test]
    fn test_picture_with_two_cell_anchor() {
        let content = parse_drawing(PIC_TWO_CELL).expect("parse");
        assert_eq!(content.pictures.len(), 1);
        assert!(content.shapes.is_empty());

        let pic = &content.pictures[0];
        assert_eq!(pic.rel_id, "rId1");
        match &pic.anchor {
            CellAnchor::TwoCell { from, to } => {
                assert_eq!((from.row, from.col), (2, 1));
                assert_eq!(from.col_off, 19050);
                assert_eq!(from.row_off, 9525);
                assert_eq!((to.row, to.col), (8, 4));
            }
            other => panic!("Expected two-cell anchor, got {other:?}"),
        }
    }

    /// A picture's `prstGeom` must not leak into shape state, and the pic's
    /// `cNvPr` name must not be mistaken for a shape name.
    #[test]
    fn test_picture_does_not_produce_shape_state() {
        let content = parse_drawing(PIC_TWO_CELL).expect("parse");
        assert!(content.shapes.is_empty());
    }

    const SHAPE_ONE_CELL: &str = r#"<?xml version="1.0"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing"
          xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <xdr:oneCellAnchor>
    <xdr:from>
      <xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff>
      <xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff>
    </xdr:from>
    <xdr:ext cx="914400" cy="457200"/>
    <xdr:sp macro="" textlink="">
      <xdr:nvSpPr><xdr:cNvPr id="3" name="Oval 2"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr>
        <a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom>
        <a:solidFill><a:srgbClr val="FF8000"><a:alpha val="50000"/></a:srgbClr></a:solidFill>
        <a:ln w="25400"><a:solidFill><a:srgbClr val="0000FF"/></a:solidFill></a:ln>
      </xdr:spPr>
      <xdr:txBody>
        <a:bodyPr/>
        <a:p>
          <a:pPr algn="ctr"><a:defRPr sz="900"/></a:pPr>
          <a:r><a:rPr lang="en-US" sz="1400"/><a:t>Hello</a:t></a:r>
          <a:r><a:rPr lang="en-US"/><a:t>world</a:t></a:r>
        </a:p>
      </xdr:txBody>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:oneCellAnchor>
</xdr:wsDr>"#;

    #[test]
    fn test_shape_with_one_cell_anchor() {
        let content = parse_drawing(SHAPE_ONE_CELL).expect("parse");
        assert!(content.pictures.is_empty());
        assert_eq!(content.shapes.len(), 1);

        let shape = &content.shapes[0];
        assert_eq!(shape.name, "Oval 2");
        assert_eq!(shape.geometry, ShapeGeometry::Ellipse);
        match &shape.anchor {
            CellAnchor::OneCell { from, extent } => {
                assert_eq!((from.row, from.col), (0, 0));
                assert_eq!(extent.cx, 914_400);
                assert_eq!(extent.cy, 457_200);
            }
            other => panic!("Expected one-cell anchor, got {other:?}"),
        }
    }

    #[test]
    fn test_shape_fill_and_outline() {
        let content = parse_drawing(SHAPE_ONE_CELL).expect("parse");
        let style = &content.shapes[0].style;

        let fill = style.fill.expect("fill present");
        assert_eq!(fill.rgb, [0xFF, 0x80, 0x00]);
        assert_eq!(fill.alpha, 128, "50% alpha rounds to 128");

        let outline = style.outline.expect("outline present");
        assert_eq!(outline.rgb, [0x00, 0x00, 0xFF]);
        assert!((outline.width_pt - 2.0).abs() < 1e-9, "25400 EMU is 2pt");
    }

    /// Run-level size beats the paragraph default even though the default
    /// appears first in the XML; runs are joined with spaces.
    #[test]
    fn test_shape_text_and_font_size() {
        let content = parse_drawing(SHAPE_ONE_CELL).expect("parse");
        let style = &content.shapes[0].style;

        assert_eq!(style.text.as_deref(), Some("Hello world"));
        assert!((style.font_size_pt - 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_paragraph_default_size_used_when_runs_have_none() {
        let xml = r#"<xdr:wsDr xmlns:xdr="x" xmlns:a="y">
  <xdr:oneCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:ext cx="1" cy="1"/>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="1" name="Box"/></xdr:nvSpPr>
      <xdr:spPr><a:prstGeom prst="rect"/></xdr:spPr>
      <xdr:txBody>
        <a:p><a:pPr><a:defRPr sz="900"/></a:pPr><a:r><a:t>tiny</a:t></a:r></a:p>
      </xdr:txBody>
    </xdr:sp>
  </xdr:oneCellAnchor>
</xdr:wsDr>"#;
        let content = parse_drawing(xml).expect("parse");
        assert!((content.shapes[0].style.font_size_pt - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_fill_is_transparent_and_default_size_applies() {
        let xml = r#"<xdr:wsDr xmlns:xdr="x" xmlns:a="y">
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>1</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="1" name="Frame"/></xdr:nvSpPr>
      <xdr:spPr>
        <a:noFill/>
        <a:ln><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></a:ln>
      </xdr:spPr>
    </xdr:sp>
  </xdr:twoCellAnchor>
</xdr:wsDr>"#;
        let content = parse_drawing(xml).expect("parse");
        let style = &content.shapes[0].style;

        assert!(style.fill.is_none(), "explicit noFill must stay transparent");
        let outline = style.outline.expect("outline present");
        assert!(
            (outline.width_pt - DEFAULT_OUTLINE_WIDTH_PT).abs() < 1e-9,
            "missing w attribute defaults to 1pt"
        );
        assert_eq!(style.font_size_pt, DEFAULT_FONT_SIZE_PT);
    }

    #[test]
    fn test_unprefixed_elements_are_accepted() {
        let xml = r#"<wsDr>
  <twoCellAnchor>
    <from><col>1</col><colOff>0</colOff><row>1</row><rowOff>0</rowOff></from>
    <to><col>2</col><colOff>0</colOff><row>2</row><rowOff>0</rowOff></to>
    <pic><blipFill><blip embed="rId7"/></blipFill></pic>
  </twoCellAnchor>
</wsDr>"#;
        let content = parse_drawing(xml).expect("parse");
        assert_eq!(content.pictures.len(), 1);
        assert_eq!(content.pictures[0].rel_id, "rId7");
    }

    #[test]
    fn test_malformed_drawing_errors() {
        match parse_drawing("<xdr:wsDr><xdr:pic></xdr:wsDr></xdr:pic>") {
            Err(SheetVizError::DrawingParse(_)) => {}
            other => panic!("Expected DrawingParse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="t" Target="../media/image1.png"/>
  <Relationship Id="rId2" Type="t" Target="../media/image2.jpeg"/>
</Relationships>"#;
        let rels = parse_relationships(xml);
        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId1"], "../media/image1.png");
        assert_eq!(rels["rId2"], "../media/image2.jpeg");
    }

    #[test]
    fn test_alpha_byte_bounds() {
        assert_eq!(alpha_byte(100_000), 255);
        assert_eq!(alpha_byte(0), 0);
        assert_eq!(alpha_byte(200_000), 255);
        assert_eq!(alpha_byte(-5), 0);
    }

    #[test]
    fn test_parse_hex_rgb() {
        assert_eq!(parse_hex_rgb("FF0080"), Some([255, 0, 128]));
        assert_eq!(parse_hex_rgb("nope"), None);
        assert_eq!(parse_hex_rgb("FFF"), None);
    }
}

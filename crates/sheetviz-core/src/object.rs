//! The normalized visual-object model shared by the classifier and renderer.

use crate::geometry::{BoundingBox, CellRef};
use crate::units::DEFAULT_FONT_SIZE_PT;
use image::RgbaImage;

/// Discriminates the two families of drawn objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Image,
    Shape,
}

/// Preset geometry of a drawn shape.
///
/// Unrecognized presets normalize to rectangles; the drawing layer defines
/// far more presets than the renderer distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShapeGeometry {
    #[default]
    Rect,
    Ellipse,
    RoundRect,
    Triangle,
}

impl ShapeGeometry {
    /// Map a preset name from the drawing XML to a renderable geometry.
    #[must_use]
    pub fn from_preset(preset: &str) -> Self {
        match preset {
            "ellipse" => Self::Ellipse,
            "roundRect" => Self::RoundRect,
            "triangle" | "rtTriangle" => Self::Triangle,
            _ => Self::Rect,
        }
    }
}

/// Solid fill: RGB plus alpha (255 = fully opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub rgb: [u8; 3],
    pub alpha: u8,
}

/// Outline stroke: RGB plus width in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub rgb: [u8; 3],
    pub width_pt: f64,
}

/// Styling of a drawn shape.
///
/// Every part is optional; a shape with neither fill nor outline renders
/// fully transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Fill>,
    pub outline: Option<Outline>,
    /// All text runs of the shape, space-joined.
    pub text: Option<String>,
    /// Effective text size in points.
    pub font_size_pt: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            outline: None,
            text: None,
            font_size_pt: DEFAULT_FONT_SIZE_PT,
        }
    }
}

/// Content payload of a [`VisualObject`].
#[derive(Debug, Clone)]
pub enum ObjectContent {
    /// An embedded image: raw bytes, plus the decoded bitmap when decoding
    /// succeeded. Undecodable images keep their bytes (they are still saved
    /// to disk) but are excluded from overlap and composite analysis.
    Image {
        bytes: Vec<u8>,
        bitmap: Option<RgbaImage>,
    },
    /// A drawn shape with preset geometry and styling.
    Shape {
        geometry: ShapeGeometry,
        style: ShapeStyle,
    },
}

/// A drawn object normalized to absolute sheet pixels.
///
/// Created once during extraction and resolution for a sheet, read-only
/// afterward, discarded at end of sheet processing.
#[derive(Debug, Clone)]
pub struct VisualObject {
    /// Output file name for images; drawing-layer name for shapes.
    pub name: String,
    /// Logical box derived from anchor math.
    pub bbox: BoundingBox,
    pub top_left: Option<CellRef>,
    pub bottom_right: Option<CellRef>,
    /// Pixel offset of the top-left corner within its cell, for reporting.
    pub start_offset: (f64, f64),
    /// Pixel offset of the bottom-right corner within its cell, for reporting.
    pub end_offset: (f64, f64),
    pub content: ObjectContent,
}

impl VisualObject {
    /// Image object with no resolved cell range and zero corner offsets.
    /// Extraction fills the range in from the resolved anchor.
    #[must_use]
    pub fn image(name: impl Into<String>, bbox: BoundingBox, bytes: Vec<u8>, bitmap: Option<RgbaImage>) -> Self {
        Self {
            name: name.into(),
            bbox,
            top_left: None,
            bottom_right: None,
            start_offset: (0.0, 0.0),
            end_offset: (0.0, 0.0),
            content: ObjectContent::Image { bytes, bitmap },
        }
    }

    /// Shape object with no resolved cell range and zero corner offsets.
    #[must_use]
    pub fn shape(
        name: impl Into<String>,
        bbox: BoundingBox,
        geometry: ShapeGeometry,
        style: ShapeStyle,
    ) -> Self {
        Self {
            name: name.into(),
            bbox,
            top_left: None,
            bottom_right: None,
            start_offset: (0.0, 0.0),
            end_offset: (0.0, 0.0),
            content: ObjectContent::Shape { geometry, style },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self.content {
            ObjectContent::Image { .. } => ObjectKind::Image,
            ObjectContent::Shape { .. } => ObjectKind::Shape,
        }
    }

    /// The decoded bitmap, when this is an image that decoded successfully.
    #[must_use]
    pub fn bitmap(&self) -> Option<&RgbaImage> {
        match &self.content {
            ObjectContent::Image { bitmap, .. } => bitmap.as_ref(),
            ObjectContent::Shape { .. } => None,
        }
    }

    /// An image that can participate in overlap analysis and compositing:
    /// decoded successfully and with a positive-size logical box.
    #[must_use]
    pub fn is_renderable_image(&self) -> bool {
        self.bitmap().is_some() && self.bbox.has_positive_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_mapping() {
        assert_eq!(ShapeGeometry::from_preset("rect"), ShapeGeometry::Rect);
        assert_eq!(ShapeGeometry::from_preset("ellipse"), ShapeGeometry::Ellipse);
        assert_eq!(
            ShapeGeometry::from_preset("roundRect"),
            ShapeGeometry::RoundRect
        );
        assert_eq!(
            ShapeGeometry::from_preset("triangle"),
            ShapeGeometry::Triangle
        );
        assert_eq!(
            ShapeGeometry::from_preset("rtTriangle"),
            ShapeGeometry::Triangle
        );
        // Anything else falls back to a rectangle.
        assert_eq!(ShapeGeometry::from_preset("heptagram"), ShapeGeometry::Rect);
    }

    #[test]
    fn test_default_style_is_transparent() {
        let style = ShapeStyle::default();
        assert!(style.fill.is_none());
        assert!(style.outline.is_none());
        assert!(style.text.is_none());
        assert_eq!(style.font_size_pt, DEFAULT_FONT_SIZE_PT);
    }

    #[test]
    fn test_renderable_image_requires_bitmap_and_size() {
        let bitmap = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let mut obj = VisualObject::image(
            "img",
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            vec![1, 2, 3],
            Some(bitmap),
        );
        assert!(obj.is_renderable_image());
        assert_eq!(obj.kind(), ObjectKind::Image);

        obj.bbox = BoundingBox::degenerate();
        assert!(!obj.is_renderable_image());

        obj.bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        obj.content = ObjectContent::Image {
            bytes: vec![1, 2, 3],
            bitmap: None,
        };
        assert!(!obj.is_renderable_image());
    }

    #[test]
    fn test_shape_has_no_bitmap() {
        let obj = VisualObject::shape(
            "callout",
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            ShapeGeometry::Ellipse,
            ShapeStyle::default(),
        );
        assert_eq!(obj.kind(), ObjectKind::Shape);
        assert!(obj.bitmap().is_none());
        assert!(!obj.is_renderable_image());
    }
}

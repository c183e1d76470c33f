//! Composite rendering: overlays flattened onto a base image.
//!
//! The base bitmap is copied, image overlays are pasted at their raw
//! relative-pixel offsets with alpha compositing, and each shape overlay is
//! rasterized into a transparent layer the size of the base bitmap before
//! being alpha-composited on top. Shape positions and sizes are corrected by
//! the scale factors between the base's logical box and its actual bitmap
//! dimensions. The result is flattened to opaque RGB and encoded as JPEG.

use ab_glyph::{FontArc, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_ellipse_mut, draw_filled_rect_mut, draw_hollow_ellipse_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, draw_polygon_mut, draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use sheetviz_core::{
    BoundingBox, ObjectContent, OverlaySet, Result, ShapeGeometry, ShapeStyle, SheetVizError,
    VisualObject,
};

/// Quality of the flattened composite output.
const JPEG_QUALITY: u8 = 95;

/// Corner radius of rounded rectangles before horizontal scaling, in pixels.
const ROUND_RECT_RADIUS: f64 = 10.0;

/// Output name for a composite: the base image's stem plus a fixed suffix.
#[must_use]
pub fn composite_file_name(base_name: &str) -> String {
    let stem = base_name
        .rsplit_once('.')
        .map_or(base_name, |(stem, _)| stem);
    format!("{stem}_with_overlays.jpg")
}

/// Render one classified overlay set into encoded JPEG bytes.
///
/// Convenience wrapper mapping the set's indices back into the sheet's
/// object slices.
///
/// # Errors
///
/// See [`render_composite`].
pub fn render_overlay_set(
    images: &[VisualObject],
    shapes: &[VisualObject],
    set: &OverlaySet,
    font: &FontArc,
) -> Result<Vec<u8>> {
    let base = images.get(set.base).ok_or_else(|| {
        SheetVizError::ImageDecode(format!("overlay set references missing base {}", set.base))
    })?;
    let image_overlays: Vec<&VisualObject> = set
        .image_overlays
        .iter()
        .filter_map(|&i| images.get(i))
        .collect();
    let shape_overlays: Vec<&VisualObject> = set
        .shape_overlays
        .iter()
        .filter_map(|&i| shapes.get(i))
        .collect();
    render_composite(base, &image_overlays, &shape_overlays, font)
}

/// Rasterize all overlays onto a copy of the base image and encode it.
///
/// A single overlay's rendering failure is logged and that overlay skipped;
/// the composite is still produced from the remaining overlays.
///
/// # Errors
///
/// Returns [`SheetVizError::ImageDecode`] when the base has no decoded
/// bitmap, or [`SheetVizError::ImageEncode`] when JPEG encoding fails.
pub fn render_composite(
    base: &VisualObject,
    image_overlays: &[&VisualObject],
    shape_overlays: &[&VisualObject],
    font: &FontArc,
) -> Result<Vec<u8>> {
    let Some(bitmap) = base.bitmap() else {
        return Err(SheetVizError::ImageDecode(format!(
            "base image {} has no decoded bitmap",
            base.name
        )));
    };
    let mut canvas = bitmap.clone();

    // Correction for drift between the anchor-derived logical size and the
    // true bitmap resolution.
    let scale_x = if base.bbox.width > 0.0 {
        f64::from(canvas.width()) / base.bbox.width
    } else {
        1.0
    };
    let scale_y = if base.bbox.height > 0.0 {
        f64::from(canvas.height()) / base.bbox.height
    } else {
        1.0
    };

    // Image overlays paste at their raw relative offset, unscaled, with the
    // overlay's own alpha channel respected.
    for overlay in image_overlays {
        let Some(overlay_bitmap) = overlay.bitmap() else {
            continue;
        };
        let dx = (overlay.bbox.x - base.bbox.x).round() as i64;
        let dy = (overlay.bbox.y - base.bbox.y).round() as i64;
        imageops::overlay(&mut canvas, overlay_bitmap, dx, dy);
    }

    for overlay in shape_overlays {
        let ObjectContent::Shape { geometry, style } = &overlay.content else {
            continue;
        };
        match render_shape_layer(
            *geometry,
            style,
            &overlay.bbox,
            &base.bbox,
            scale_x,
            scale_y,
            font,
            canvas.dimensions(),
        ) {
            Ok(layer) => imageops::overlay(&mut canvas, &layer, 0, 0),
            Err(e) => {
                log::warn!("Skipping overlay {:?} on {}: {e}", overlay.name, base.name);
            }
        }
    }

    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| SheetVizError::ImageEncode(format!("composite for {}: {e}", base.name)))?;
    Ok(buf)
}

/// Rasterize one shape into a transparent layer sized like the base bitmap.
#[allow(clippy::too_many_arguments)] // Geometry plus both scale axes; grouping adds nothing
fn render_shape_layer(
    geometry: ShapeGeometry,
    style: &ShapeStyle,
    shape_box: &BoundingBox,
    base_box: &BoundingBox,
    scale_x: f64,
    scale_y: f64,
    font: &FontArc,
    (canvas_w, canvas_h): (u32, u32),
) -> Result<RgbaImage> {
    let mut layer = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([0, 0, 0, 0]));

    // Position relative to the base origin, scaled into bitmap space.
    let x = (shape_box.x - base_box.x) * scale_x;
    let y = (shape_box.y - base_box.y) * scale_y;
    let w = (shape_box.width * scale_x).max(1.0);
    let h = (shape_box.height * scale_y).max(1.0);

    let xi = x.round() as i32;
    let yi = y.round() as i32;
    let wi = (w.round() as i32).max(1);
    let hi = (h.round() as i32).max(1);

    let fill = style
        .fill
        .map(|f| Rgba([f.rgb[0], f.rgb[1], f.rgb[2], f.alpha]));
    let outline = style.outline.map(|o| {
        let stroke = (o.width_pt * scale_x).round().max(1.0) as i32;
        (Rgba([o.rgb[0], o.rgb[1], o.rgb[2], 255]), stroke)
    });

    match geometry {
        ShapeGeometry::Ellipse => draw_ellipse(&mut layer, xi, yi, wi, hi, fill, outline),
        ShapeGeometry::RoundRect => {
            let radius = (ROUND_RECT_RADIUS * scale_x).min(w / 2.0).min(h / 2.0);
            draw_round_rect(&mut layer, x, y, w, h, radius, fill, outline);
        }
        ShapeGeometry::Triangle => draw_triangle(&mut layer, xi, yi, wi, hi, fill, outline),
        ShapeGeometry::Rect => draw_rect(&mut layer, xi, yi, wi, hi, fill, outline),
    }

    if let Some(text) = style.text.as_deref() {
        if !text.is_empty() {
            draw_centered_text(&mut layer, text, style, xi, yi, wi, hi, scale_x, scale_y, font);
        }
    }

    Ok(layer)
}

fn draw_rect(
    layer: &mut RgbaImage,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    fill: Option<Rgba<u8>>,
    outline: Option<(Rgba<u8>, i32)>,
) {
    if let Some(color) = fill {
        draw_filled_rect_mut(layer, Rect::at(x, y).of_size(w as u32, h as u32), color);
    }
    if let Some((color, stroke)) = outline {
        for t in 0..stroke {
            let inner_w = w - 2 * t;
            let inner_h = h - 2 * t;
            if inner_w <= 0 || inner_h <= 0 {
                break;
            }
            let rect = Rect::at(x + t, y + t).of_size(inner_w as u32, inner_h as u32);
            draw_hollow_rect_mut(layer, rect, color);
        }
    }
}

fn draw_ellipse(
    layer: &mut RgbaImage,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    fill: Option<Rgba<u8>>,
    outline: Option<(Rgba<u8>, i32)>,
) {
    let center = (x + w / 2, y + h / 2);
    let rx = (w / 2).max(1);
    let ry = (h / 2).max(1);
    if let Some(color) = fill {
        draw_filled_ellipse_mut(layer, center, rx, ry, color);
    }
    if let Some((color, stroke)) = outline {
        for t in 0..stroke {
            let inner_rx = rx - t;
            let inner_ry = ry - t;
            if inner_rx <= 0 || inner_ry <= 0 {
                break;
            }
            draw_hollow_ellipse_mut(layer, center, inner_rx, inner_ry, color);
        }
    }
}

/// Point-in-rounded-rect membership against a box at `(bx, by)`.
fn round_rect_contains(px: f64, py: f64, bx: f64, by: f64, w: f64, h: f64, radius: f64) -> bool {
    if w <= 0.0 || h <= 0.0 {
        return false;
    }
    if px < bx || py < by || px > bx + w || py > by + h {
        return false;
    }
    if radius <= 0.0 {
        return true;
    }
    // Inside the box: only the four corner squares need the circle test.
    let cx = px.clamp(bx + radius, bx + w - radius);
    let cy = py.clamp(by + radius, by + h - radius);
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= radius * radius
}

/// Rounded rectangles have no imageproc primitive; fill and stroke are
/// painted from a per-pixel membership test over the shape's span.
#[allow(clippy::too_many_arguments)]
fn draw_round_rect(
    layer: &mut RgbaImage,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    radius: f64,
    fill: Option<Rgba<u8>>,
    outline: Option<(Rgba<u8>, i32)>,
) {
    if fill.is_none() && outline.is_none() {
        return;
    }
    let stroke = outline.map_or(0.0, |(_, s)| f64::from(s));

    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil().max(0.0) as u32).min(layer.width());
    let y1 = ((y + h).ceil().max(0.0) as u32).min(layer.height());

    for py in y0..y1 {
        for px in x0..x1 {
            // Sample at the pixel center.
            let sx = f64::from(px) + 0.5;
            let sy = f64::from(py) + 0.5;
            if !round_rect_contains(sx, sy, x, y, w, h, radius) {
                continue;
            }
            let in_inner = round_rect_contains(
                sx,
                sy,
                x + stroke,
                y + stroke,
                w - 2.0 * stroke,
                h - 2.0 * stroke,
                (radius - stroke).max(0.0),
            );
            if let Some((color, _)) = outline {
                if !in_inner {
                    layer.put_pixel(px, py, color);
                    continue;
                }
            }
            if let Some(color) = fill {
                layer.put_pixel(px, py, color);
            }
        }
    }
}

/// Apex at the horizontal box center on the top edge, base corners at the
/// two bottom corners.
fn draw_triangle(
    layer: &mut RgbaImage,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    fill: Option<Rgba<u8>>,
    outline: Option<(Rgba<u8>, i32)>,
) {
    let apex = Point::new(x + w / 2, y);
    let bottom_right = Point::new(x + w, y + h);
    let bottom_left = Point::new(x, y + h);

    if let Some(color) = fill {
        draw_polygon_mut(layer, &[apex, bottom_right, bottom_left], color);
    }
    if let Some((color, stroke)) = outline {
        let vertices = [
            (f64::from(apex.x), f64::from(apex.y)),
            (f64::from(bottom_right.x), f64::from(bottom_right.y)),
            (f64::from(bottom_left.x), f64::from(bottom_left.y)),
        ];
        let centroid = (
            (vertices[0].0 + vertices[1].0 + vertices[2].0) / 3.0,
            (vertices[0].1 + vertices[1].1 + vertices[2].1) / 3.0,
        );
        // Nested strokes shrink each vertex one pixel toward the centroid.
        for t in 0..stroke {
            let shifted: Vec<(f32, f32)> = vertices
                .iter()
                .map(|&(vx, vy)| {
                    let dx = centroid.0 - vx;
                    let dy = centroid.1 - vy;
                    let len = (dx * dx + dy * dy).sqrt().max(1.0);
                    let f = f64::from(t) / len;
                    ((vx + dx * f) as f32, (vy + dy * f) as f32)
                })
                .collect();
            for i in 0..3 {
                draw_line_segment_mut(layer, shifted[i], shifted[(i + 1) % 3], color);
            }
        }
    }
}

/// Measure and draw the shape's text centered in its scaled box, solid black.
///
/// A text failure (degenerate computed size) skips only the text, never the
/// shape.
#[allow(clippy::too_many_arguments)]
fn draw_centered_text(
    layer: &mut RgbaImage,
    text: &str,
    style: &ShapeStyle,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    scale_x: f64,
    scale_y: f64,
    font: &FontArc,
) {
    let px_size = f64::from(style.font_size_pt) * (scale_x + scale_y) / 2.0;
    if !px_size.is_finite() || px_size < 1.0 {
        let err = SheetVizError::TextRender(format!(
            "unusable text size {px_size:.2}px for {text:?}"
        ));
        log::warn!("{err}");
        return;
    }

    let scale = PxScale::from(px_size as f32);
    let (text_w, text_h) = text_size(scale, font, text);
    let tx = x + (w - text_w as i32) / 2;
    let ty = y + (h - text_h as i32) / 2;
    draw_text_mut(layer, Rgba([0, 0, 0, 255]), tx, ty, scale, font, text);
}

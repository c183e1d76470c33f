//! Pairwise overlap classification across a sheet's visual objects.
//!
//! The classifier is a pure in-memory pass over the sheet's full object set:
//! every object must already carry its resolved bounding box. Composites are
//! never fed back in; relations are computed once against the original set.

use crate::object::VisualObject;

/// Overlay indices detected for one base image.
///
/// Indices refer into the slices passed to [`classify_sheet`]. The sets are
/// transient: produced per base, consumed immediately by the renderer, never
/// retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySet {
    /// Index of the base image.
    pub base: usize,
    /// Overlaying images, in insertion order.
    pub image_overlays: Vec<usize>,
    /// Overlaying shapes, in insertion order.
    pub shape_overlays: Vec<usize>,
}

/// Classify which objects overlay which base images.
///
/// Image-on-image policy: an image fully contained in the base overlays it;
/// a base fully contained in the other image is deferred to the pass where
/// the other image is the base; on partial overlap the strictly smaller box
/// overlays the larger, and equal areas are ambiguous and produce no
/// relation. Shapes overlay every image they overlap, with no containment or
/// area test — shapes are small annotations by convention.
///
/// Images without a decoded bitmap or without positive size are skipped both
/// as bases and as overlay candidates; zero-size shapes are skipped. Bases
/// with no overlays are omitted from the result.
#[must_use]
pub fn classify_sheet(images: &[VisualObject], shapes: &[VisualObject]) -> Vec<OverlaySet> {
    let mut sets = Vec::new();

    for (i, base) in images.iter().enumerate() {
        if !base.is_renderable_image() {
            continue;
        }

        let mut image_overlays = Vec::new();
        for (j, other) in images.iter().enumerate() {
            if j == i || !other.is_renderable_image() {
                continue;
            }
            if !base.bbox.overlaps(&other.bbox) {
                continue;
            }
            if base.bbox.contains(&other.bbox) {
                image_overlays.push(j);
            } else if other.bbox.contains(&base.bbox) {
                // Deferred: handled when `other` is evaluated as the base.
            } else if other.bbox.area() < base.bbox.area() {
                image_overlays.push(j);
            }
            // Partial overlap with equal areas: ambiguous, no relation.
        }

        let shape_overlays: Vec<usize> = shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| {
                shape.bbox.has_positive_size() && shape.bbox.overlaps(&base.bbox)
            })
            .map(|(k, _)| k)
            .collect();

        if image_overlays.is_empty() && shape_overlays.is_empty() {
            continue;
        }
        sets.push(OverlaySet {
            base: i,
            image_overlays,
            shape_overlays,
        });
    }

    sets
}

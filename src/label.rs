//! Cookie labeling strategies.
//!
//! Two interchangeable strategies behind [`LabelStrategy`], so the tiling
//! scanner never knows which one is in play:
//!
//! - [`BoundsHeuristic`]: containment against each polygon's bounding box
//!   with tiered offset tolerance. No pixel-level geometry; trades exactness
//!   near polygon edges for speed.
//! - [`MaskThreshold`]: counts occupied cells of a precomputed
//!   [`OccupancyMask`] under the cookie window and compares against a
//!   threshold, with early exit once the threshold is reached.

use crate::geometry::Polygon;
use crate::mask::OccupancyMask;

/// Binary cookie label: 1 = parking, 0 = background.
pub type Label = u8;

/// Assign a label to the cookie whose top-left corner sits at
/// `(line_start, pixel_start)`.
pub trait LabelStrategy {
    fn label(&self, line_start: usize, pixel_start: usize) -> Label;
}

/// Per-polygon pixel-space bounding box used by the heuristic strategy.
///
/// Field order mirrors the bounds tuple convention: line extent first,
/// then pixel extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonBounds {
    pub line_min: f64,
    pub line_max: f64,
    pub pixel_min: f64,
    pub pixel_max: f64,
}

impl PolygonBounds {
    /// Derive the heuristic bounds from a pixel-space polygon
    /// (`x = line, y = pixel`).
    #[must_use]
    pub fn of(polygon: &Polygon) -> Self {
        let (max_x, max_y, min_x, min_y) = polygon.bounds();
        Self { line_min: min_x, line_max: max_x, pixel_min: min_y, pixel_max: max_y }
    }
}

/// Offset tolerances tried in order: exact containment first, then a looser
/// overlap test with the box shrunk by 100 pixels.
const OFFSETS: [f64; 2] = [0.0, 100.0];

/// Bounding-box heuristic labeling.
///
/// At offset 0 a cookie is positive only when both its start and end line
/// fall strictly inside the polygon's shrunk line range AND both pixel
/// columns fall inside the pixel range. At offset 100 one endpoint per axis
/// suffices. First satisfied polygon/offset combination wins.
#[derive(Debug, Clone)]
pub struct BoundsHeuristic {
    bounds: Vec<PolygonBounds>,
    cookie_size: f64,
}

impl BoundsHeuristic {
    #[must_use]
    pub fn new(bounds: Vec<PolygonBounds>, cookie_size: usize) -> Self {
        Self { bounds, cookie_size: cookie_size as f64 }
    }

    /// Build directly from pixel-space polygons.
    #[must_use]
    pub fn from_polygons(polygons: &[Polygon], cookie_size: usize) -> Self {
        Self::new(polygons.iter().map(PolygonBounds::of).collect(), cookie_size)
    }
}

impl LabelStrategy for BoundsHeuristic {
    fn label(&self, line_start: usize, pixel_start: usize) -> Label {
        let line_start = line_start as f64;
        let pixel_start = pixel_start as f64;
        let line_end = line_start + self.cookie_size;
        let pixel_end = pixel_start + self.cookie_size;

        for b in &self.bounds {
            for (i, offset) in OFFSETS.iter().copied().enumerate() {
                let strict = i == 0;

                let line_start_in = line_start > b.line_min + offset && line_start < b.line_max - offset;
                let line_end_in = line_end > b.line_min + offset && line_end < b.line_max - offset;
                let lines_ok = if strict {
                    line_start_in && line_end_in
                } else {
                    line_start_in || line_end_in
                };
                if !lines_ok {
                    continue;
                }

                let pixel_start_in =
                    pixel_start > b.pixel_min + offset && pixel_start < b.pixel_max - offset;
                let pixel_end_in = pixel_end > b.pixel_min + offset && pixel_end < b.pixel_max - offset;
                let pixels_ok = if strict {
                    pixel_start_in && pixel_end_in
                } else {
                    pixel_start_in || pixel_end_in
                };
                if pixels_ok {
                    return 1;
                }
            }
        }
        0
    }
}

/// Exact-mask labeling: a cookie is positive once `threshold` occupied
/// cells are found under its window.
///
/// The scan covers `cookie_size - 1` rows and columns from the origin, one
/// short of the full window. The undercount is inherited behavior the rest
/// of the pipeline (and existing datasets) were produced with, so it is
/// kept rather than corrected.
#[derive(Debug, Clone)]
pub struct MaskThreshold<'a> {
    mask: &'a OccupancyMask,
    cookie_size: usize,
    threshold: usize,
}

impl<'a> MaskThreshold<'a> {
    #[must_use]
    pub fn new(mask: &'a OccupancyMask, cookie_size: usize, threshold: usize) -> Self {
        Self { mask, cookie_size, threshold }
    }
}

impl LabelStrategy for MaskThreshold<'_> {
    fn label(&self, line_start: usize, pixel_start: usize) -> Label {
        let mut count = 0_usize;
        let span = self.cookie_size.saturating_sub(1);

        for line in line_start..line_start + span {
            for pixel in pixel_start..pixel_start + span {
                if self.mask.is_occupied(line, pixel) {
                    count += 1;
                    if count == self.threshold {
                        return 1;
                    }
                }
            }
        }
        0
    }
}

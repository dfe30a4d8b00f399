//! Polygon geometry in pixel space: points, closed rings, and the
//! ray-casting containment test.
//!
//! Pixel-space polygons follow the pipeline's axis convention:
//! `x` is the line (row) index and `y` is the pixel (column) index.
//!
//! Containment uses the classic horizontal-ray parity test. Behavior at
//! exact vertices and on edges is approximate: query points aligned with a
//! vertex y are nudged by a small epsilon instead of being resolved
//! exactly. This is acceptable for labeling raster cells; it is not a
//! general computational-geometry primitive.

pub mod projection;

/// Small nudge applied to a query point whose y coincides with a vertex y,
/// avoiding degenerate ray intersections.
const EPS: f64 = 1e-5;

/// Sentinel slope standing in for division by zero on vertical edges.
const HUGE: f64 = f64::MAX;

/// A 2D point. The coordinate space (geographic, projected, or pixel) is
/// the caller's convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds of a polygon, ordered `(max_x, max_y, min_x, min_y)`.
///
/// The field order is part of the contract: downstream consumers destructure
/// this exact tuple shape.
pub type Bounds = (f64, f64, f64, f64);

/// An ordered, closed ring of at least three points; the edge from the last
/// point back to the first is implicit.
///
/// The ring is assumed simple (non-self-intersecting). No validation is
/// performed; a malformed ring yields undefined containment results.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Wrap an ordered ring of points.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The ring's points in order.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Lazy sequence of edges `(p[i], p[i+1 mod n])`, including the closing
    /// edge. Finite and restartable: each call re-derives the sequence from
    /// the (immutable) points.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        self.points
            .iter()
            .enumerate()
            .map(move |(i, &p)| (p, self.points[(i + 1) % n]))
    }

    /// Axis-aligned bounds as `(max_x, max_y, min_x, min_y)`.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        for p in &self.points {
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
        }
        (max_x, max_y, min_x, min_y)
    }

    /// Horizontal-ray-casting parity test.
    ///
    /// The query point is copied before any epsilon nudge; the caller's
    /// point is never mutated. The nudge persists across edges within one
    /// call, which keeps the parity count consistent for rings sharing a
    /// vertex y.
    ///
    /// Points exactly on an edge or vertex may be classified either way.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        // copy-on-nudge: mutate only a local copy
        let mut p = *point;
        let mut inside = false;

        for (ea, eb) in self.edges() {
            // Canonicalize so `a` is the lower endpoint.
            let (a, b) = if ea.y > eb.y { (eb, ea) } else { (ea, eb) };

            if p.y == a.y || p.y == b.y {
                p.y += EPS;
            }

            if p.y > b.y || p.y < a.y || p.x > a.x.max(b.x) {
                // Ray cannot intersect this edge.
                continue;
            }

            if p.x < a.x.min(b.x) {
                // Ray is entirely left of the edge: definite crossing.
                inside = !inside;
                continue;
            }

            let m_edge = if b.x == a.x { HUGE } else { (b.y - a.y) / (b.x - a.x) };
            let m_point = if p.x == a.x { HUGE } else { (p.y - a.y) / (p.x - a.x) };

            if m_point >= m_edge {
                inside = !inside;
            }
        }

        inside
    }
}

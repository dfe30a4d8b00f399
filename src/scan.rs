//! Tiling scanner: slides a fixed-size window over the raster and produces
//! one labeled cookie per position.
//!
//! Positions form a lazy, finite, restartable sequence; nothing is cached,
//! so the same scanner can be iterated any number of times with identical
//! results. The scan is a pure function of position, raster and strategy,
//! which is what makes [`TileScanner::split`] safe: disjoint line ranges can
//! be labeled by independent workers and reduced back in order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::label::{Label, LabelStrategy};
use crate::raster::{CookieImage, RgbRaster};

/// How the scan range ends.
///
/// The heuristic pipeline stops `border_margin` short of the far edge, so
/// when the margin is smaller than the cookie its last windows cross the
/// raster edge and come back truncated. The mask pipeline stops
/// `cookie_size` short so every window fits entirely inside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// Scan up to `extent - border_margin` (exclusive).
    Margin,
    /// Scan up to `extent - cookie_size` (exclusive).
    Cookie,
}

/// One labeled cookie produced by the scan.
#[derive(Debug, Clone)]
pub struct Tile {
    pub line_start: usize,
    pub pixel_start: usize,
    pub label: Label,
    /// Deterministic output name encoding label and position.
    pub name: String,
    /// Independent copy of the raster window.
    pub image: CookieImage,
}

/// Deterministic cookie file name: `label_{l}_cookie_{line}_{pixel}_.png`.
///
/// The trailing underscore before the extension is part of the naming
/// contract consumed by downstream tooling; do not "fix" it.
#[must_use]
pub fn cookie_name(label: Label, line_start: usize, pixel_start: usize) -> String {
    format!("label_{label}_cookie_{line_start}_{pixel_start}_.png")
}

/// Sliding-window scanner over `(line_start, pixel_start)` positions.
#[derive(Debug, Clone)]
pub struct TileScanner {
    line_range: (usize, usize),
    pixel_range: (usize, usize),
    stride: usize,
    cookie_size: usize,
}

impl TileScanner {
    /// Scanner over a full raster extent.
    ///
    /// Lines run from `border_margin` to the end selected by `scan_end`,
    /// stepping `stride`; columns analogously.
    #[must_use]
    pub fn new(
        height: usize,
        width: usize,
        cookie_size: usize,
        stride: usize,
        border_margin: usize,
        scan_end: ScanEnd,
    ) -> Self {
        let trim = match scan_end {
            ScanEnd::Margin => border_margin,
            ScanEnd::Cookie => cookie_size,
        };
        Self {
            line_range: (border_margin, height.saturating_sub(trim)),
            pixel_range: (border_margin, width.saturating_sub(trim)),
            stride: stride.max(1),
            cookie_size,
        }
    }

    /// Number of positions along one axis of `(start, end)` with this stride.
    fn axis_count(&self, range: (usize, usize)) -> usize {
        let (start, end) = range;
        if end <= start {
            0
        } else {
            (end - start).div_ceil(self.stride)
        }
    }

    /// Total number of positions the scan will visit.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.axis_count(self.line_range) * self.axis_count(self.pixel_range)
    }

    /// Lazy, restartable sequence of `(line_start, pixel_start)` positions
    /// in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (p_start, p_end) = self.pixel_range;
        let (l_start, l_end) = self.line_range;
        (l_start..l_end).step_by(self.stride).flat_map(move |line| {
            (p_start..p_end)
                .step_by(self.stride)
                .map(move |pixel| (line, pixel))
        })
    }

    /// Split into up to `parts` scanners over disjoint, contiguous line
    /// ranges covering the same positions in the same per-part order.
    ///
    /// Workers can label the parts independently (no shared mutable state)
    /// and the caller concatenates results part-by-part to recover the
    /// exact single-scanner ordering.
    #[must_use]
    pub fn split(&self, parts: usize) -> Vec<TileScanner> {
        let line_positions: Vec<usize> = {
            let (start, end) = self.line_range;
            (start..end).step_by(self.stride).collect()
        };
        if line_positions.is_empty() || parts <= 1 {
            return vec![self.clone()];
        }

        let parts = parts.min(line_positions.len());
        let per_part = line_positions.len().div_ceil(parts);

        line_positions
            .chunks(per_part)
            .map(|chunk| {
                // end exclusive just past the chunk's last line position
                let first = chunk[0];
                let last = *chunk.last().unwrap_or(&first);
                TileScanner {
                    line_range: (first, last + 1),
                    pixel_range: self.pixel_range,
                    stride: self.stride,
                    cookie_size: self.cookie_size,
                }
            })
            .collect()
    }

    /// Run the scan: extract a defensive cookie copy at each position,
    /// label it through the strategy, and name it deterministically.
    ///
    /// `cancel` is checked between positions; when it flips, the tiles
    /// produced so far are returned. Pass a fresh flag for an
    /// uninterruptible run.
    ///
    /// Windows crossing the raster edge (possible with [`ScanEnd::Margin`]
    /// when `border_margin < cookie_size`) yield truncated images rather
    /// than failing the scan.
    ///
    /// # Errors
    /// Fails if a window origin lies outside the raster, which the
    /// position ranges of a scanner built via [`TileScanner::new`] rule
    /// out.
    pub fn scan<S: LabelStrategy>(
        &self,
        raster: &RgbRaster,
        strategy: &S,
        cancel: &Arc<AtomicBool>,
    ) -> Result<Vec<Tile>> {
        let mut tiles = Vec::with_capacity(self.position_count());

        for (line_start, pixel_start) in self.positions() {
            if cancel.load(Ordering::Relaxed) {
                debug!(produced = tiles.len(), "scan cancelled");
                break;
            }

            let image = raster.cookie(line_start, pixel_start, self.cookie_size)?;
            let label = strategy.label(line_start, pixel_start);
            tiles.push(Tile {
                line_start,
                pixel_start,
                label,
                name: cookie_name(label, line_start, pixel_start),
                image,
            });

            if tiles.len() % 1000 == 0 {
                debug!(cookies = tiles.len(), "extracting cookies");
            }
        }

        Ok(tiles)
    }
}

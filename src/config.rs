//! Run configuration for the cookie-cutting pipeline.
//!
//! The original workflow relied on module-level globals (hardcoded paths,
//! sizes, thresholds). Here every knob lives in one explicit [`Config`]
//! passed to each component at construction; there is no process-wide state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default cookie edge length in pixels.
pub const DEFAULT_COOKIE_SIZE: usize = 256;

/// Default border margin: the first and last rows/columns of the source
/// imagery are black padding and must not produce cookies.
pub const DEFAULT_BORDER_MARGIN: usize = 200;

/// Default minimum number of occupied mask pixels for a cookie to be
/// labeled positive under the mask strategy.
pub const DEFAULT_PIXEL_THRESHOLD: usize = 100;

/// Fixed seed for the negative-cookie shuffle, for reproducible runs.
pub const DEFAULT_RANDOM_SEED: u64 = 12347;

/// Which labeling strategy a segmentation run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Approximate containment against per-polygon bounding boxes with
    /// tiered offset tolerance. Fast, no pixel-level geometry.
    #[default]
    BoundsHeuristic,
    /// Exact per-pixel occupancy mask, thresholded per cookie. Requires a
    /// mask built by a prior mask pass.
    MaskThreshold,
}

/// Configuration for one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Edge length of square cookies, in pixels.
    pub cookie_size: usize,
    /// Rows/columns of border to exclude from scanning.
    pub border_margin: usize,
    /// Occupied-pixel count at which a cookie becomes positive
    /// (mask strategy only).
    pub pixel_threshold: usize,
    /// Seed for the deterministic negative shuffle.
    pub random_seed: u64,
    /// Labeling strategy for the segmentation pass.
    pub strategy: Strategy,
    /// Directory receiving cookie PNGs and the manifest.
    pub output_dir: PathBuf,
    /// Path of the persisted occupancy mask (written by the mask pass,
    /// read by a mask-strategy segmentation pass).
    pub mask_path: PathBuf,
}

impl Config {
    /// Configuration with the conventional sizes and a given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let mask_path = output_dir.join("parking_mask.bin");
        Self {
            cookie_size: DEFAULT_COOKIE_SIZE,
            border_margin: DEFAULT_BORDER_MARGIN,
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            random_seed: DEFAULT_RANDOM_SEED,
            strategy: Strategy::default(),
            output_dir,
            mask_path,
        }
    }

    /// Stride between consecutive cookie origins: a quarter of the cookie
    /// size, giving fixed 25% spacing between adjacent windows.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        (self.cookie_size / 4).max(1)
    }

    /// Set the cookie size.
    #[must_use]
    pub fn with_cookie_size(mut self, size: usize) -> Self {
        self.cookie_size = size;
        self
    }

    /// Set the labeling strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_quarter_cookie() {
        let cfg = Config::new("/tmp/out");
        assert_eq!(cfg.stride(), 64);

        let cfg = cfg.with_cookie_size(100);
        assert_eq!(cfg.stride(), 25);
    }

    #[test]
    fn test_stride_never_zero() {
        let cfg = Config::new("/tmp/out").with_cookie_size(2);
        assert_eq!(cfg.stride(), 1);
    }

    #[test]
    fn test_builder_chain() {
        let cfg = Config::new("/tmp/out")
            .with_strategy(Strategy::MaskThreshold)
            .with_seed(42);
        assert_eq!(cfg.strategy, Strategy::MaskThreshold);
        assert_eq!(cfg.random_seed, 42);
        assert_eq!(cfg.cookie_size, DEFAULT_COOKIE_SIZE);
    }
}

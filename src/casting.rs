//! Safe numeric casting utilities for raster indexing.
//!
//! This module documents our assumptions about numeric ranges when moving
//! between world-coordinate math (`f64`) and pixel indexing (`i64`/`usize`).
//!
//! # Design Decisions
//!
//! ## World offsets (`f64` → `i64`)
//! Converting a world-coordinate offset divided by pixel resolution to an
//! index truncates toward zero (like an integer cast), not toward negative
//! infinity. Points west/north of the origin therefore round toward the
//! origin; downstream code relies on this exact behavior.
//!
//! ## Raster dimensions (`usize` ↔ `f64`)
//! Image dimensions stay far below 2^53, so `usize` to `f64` is exact for
//! any raster this crate will ever see.
//!
//! ## Signed indices (`i64` → `usize`)
//! Pixel-space polygon vertices may land outside the raster (negative or
//! past the far edge) after coordinate transformation; iteration ranges are
//! clamped rather than rejected.

/// Truncate a floating world-offset quotient toward zero.
///
/// Matches integer-cast semantics: `-0.7` becomes `0`, not `-1`.
#[inline]
#[must_use]
pub fn trunc_toward_zero(value: f64) -> i64 {
    // Safety: callers divide finite world offsets by a validated nonzero
    // resolution, so the quotient is finite and fits i64.
    #[allow(clippy::cast_possible_truncation)]
    let index = value as i64;
    index
}

/// Clamp a signed pixel index to `0..limit`.
///
/// Used when iterating polygon bounding boxes that may extend past the
/// raster edge.
#[inline]
#[must_use]
pub fn clamp_index(value: i64, limit: usize) -> usize {
    if value < 0 {
        return 0;
    }
    // Safety: value >= 0 checked above
    #[allow(clippy::cast_sign_loss)]
    let index = value as usize;
    index.min(limit)
}

/// Convert a signed index pair to a clamped half-open range `start..end`
/// within `0..limit`. An inverted or fully-outside pair yields an empty
/// range.
#[inline]
#[must_use]
pub fn clamp_range(start: i64, end: i64, limit: usize) -> std::ops::Range<usize> {
    let s = clamp_index(start, limit);
    let e = clamp_index(end, limit);
    s..e.max(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trunc_toward_zero() {
        assert_eq!(trunc_toward_zero(0.0), 0);
        assert_eq!(trunc_toward_zero(2.9), 2);
        assert_eq!(trunc_toward_zero(-0.7), 0);
        assert_eq!(trunc_toward_zero(-2.9), -2);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-5, 100), 0);
        assert_eq!(clamp_index(50, 100), 50);
        assert_eq!(clamp_index(150, 100), 100);
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(-10, 5, 100), 0..5);
        assert_eq!(clamp_range(90, 150, 100), 90..100);
        assert_eq!(clamp_range(50, 20, 100), 50..50); // inverted -> empty
        assert_eq!(clamp_range(-20, -5, 100), 0..0); // fully outside -> empty
    }
}

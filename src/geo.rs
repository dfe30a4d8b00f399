//! Affine geo-transform and world-to-pixel conversion.
//!
//! A [`GeoTransform`] holds the six GDAL-style affine coefficients mapping
//! projected world coordinates to pixel/line indices. Only north-up rasters
//! are supported: the rotation coefficients are carried but never applied.
//!
//! # Example
//!
//! ```rust
//! use lotcutter::GeoTransform;
//!
//! // origin at (330000, 7390000), 0.5 m pixels, north-up
//! let gt = GeoTransform::new([330_000.0, 0.5, 0.0, 7_390_000.0, 0.0, -0.5]).unwrap();
//! let (pixel, line) = gt.to_pixel(330_128.0, 7_389_872.0);
//! assert_eq!((pixel, line), (256, 256));
//! ```

use tracing::warn;

use crate::casting::trunc_toward_zero;
use crate::error::{Error, Result};

/// Affine coefficients mapping projected coordinates to pixel/line indices,
/// in GDAL ordering:
///
/// ```text
/// [0] origin_x      top-left x
/// [1] pixel_width   west-east pixel resolution
/// [2] rot_x         row rotation, 0 for north-up
/// [3] origin_y      top-left y
/// [4] rot_y         column rotation, 0 for north-up
/// [5] pixel_height  north-south pixel resolution, negative for north-up
/// ```
///
/// Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    coefficients: [f64; 6],
}

impl GeoTransform {
    /// Build a transform from raw GDAL coefficients.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGeoTransform`] when either pixel resolution
    /// is zero, which would make [`to_pixel`](Self::to_pixel) divide by zero.
    pub fn new(coefficients: [f64; 6]) -> Result<Self> {
        if coefficients[1] == 0.0 || coefficients[5] == 0.0 {
            return Err(Error::InvalidGeoTransform(format!(
                "pixel resolution must be nonzero (got width={}, height={})",
                coefficients[1], coefficients[5]
            )));
        }
        if coefficients[2] != 0.0 || coefficients[4] != 0.0 {
            // Rotated rasters are unsupported; to_pixel ignores these terms.
            warn!(
                rot_x = coefficients[2],
                rot_y = coefficients[4],
                "geo-transform carries rotation; results assume north-up"
            );
        }
        Ok(Self { coefficients })
    }

    /// Top-left x in world coordinates.
    #[inline]
    #[must_use]
    pub fn origin_x(&self) -> f64 {
        self.coefficients[0]
    }

    /// Top-left y in world coordinates.
    #[inline]
    #[must_use]
    pub fn origin_y(&self) -> f64 {
        self.coefficients[3]
    }

    /// West-east pixel resolution.
    #[inline]
    #[must_use]
    pub fn pixel_width(&self) -> f64 {
        self.coefficients[1]
    }

    /// North-south pixel resolution (negative for north-up rasters).
    #[inline]
    #[must_use]
    pub fn pixel_height(&self) -> f64 {
        self.coefficients[5]
    }

    /// The raw coefficient array.
    #[inline]
    #[must_use]
    pub fn coefficients(&self) -> [f64; 6] {
        self.coefficients
    }

    /// Convert a projected world coordinate to `(pixel, line)` indices.
    ///
    /// `pixel` truncates `(x - origin_x) / pixel_width` toward zero;
    /// `line` is the absolute value of the truncated
    /// `(origin_y - y) / pixel_height`.
    ///
    /// The absolute value silently folds points above the raster origin onto
    /// the same line index as points an equal distance below it. This
    /// matches the behavior the rest of the pipeline was built against and
    /// is kept as-is; callers must not feed coordinates north of the origin
    /// and expect to distinguish them from southern ones.
    ///
    /// Pure: same inputs always yield the same indices.
    #[inline]
    #[must_use]
    pub fn to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let pixel = trunc_toward_zero((x - self.origin_x()) / self.pixel_width());
        let line = trunc_toward_zero((self.origin_y() - y) / self.pixel_height()).abs();
        (pixel, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_up() -> GeoTransform {
        GeoTransform::new([1000.0, 2.0, 0.0, 5000.0, 0.0, -2.0]).unwrap()
    }

    #[test]
    fn test_zero_resolution_rejected() {
        assert!(GeoTransform::new([0.0, 0.0, 0.0, 0.0, 0.0, -1.0]).is_err());
        assert!(GeoTransform::new([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let gt = north_up();
        assert_eq!(gt.to_pixel(1000.0, 5000.0), (0, 0));
    }

    #[test]
    fn test_interior_point() {
        let gt = north_up();
        // 100m east = 50 pixels; 50m south = 25 lines
        assert_eq!(gt.to_pixel(1100.0, 4950.0), (50, 25));
    }

    #[test]
    fn test_truncation_toward_zero() {
        let gt = north_up();
        // 1.5 pixels east truncates to 1; half a pixel west truncates to 0
        assert_eq!(gt.to_pixel(1003.0, 5000.0).0, 1);
        assert_eq!(gt.to_pixel(999.0, 5000.0).0, 0);
    }

    #[test]
    fn test_line_abs_fold() {
        let gt = north_up();
        // A point 50m ABOVE the origin folds onto the same line as one
        // 50m below it. Known ambiguity, preserved deliberately.
        let below = gt.to_pixel(1000.0, 4950.0).1;
        let above = gt.to_pixel(1000.0, 5050.0).1;
        assert_eq!(below, above);
        assert_eq!(below, 25);
    }

    #[test]
    fn test_deterministic() {
        let gt = north_up();
        for _ in 0..3 {
            assert_eq!(gt.to_pixel(1234.5, 4321.0), gt.to_pixel(1234.5, 4321.0));
        }
    }
}

//! Raster abstraction: band access, RGB stacking, and cookie extraction.
//!
//! Decoding band data out of a geospatial image format is a collaborator's
//! job; the pipeline only needs [`BandSource`]. [`RgbRaster`] stacks three
//! bands into interleaved f32 pixels (R,G,B,R,G,B,...) and hands out
//! independent cookie copies — a cookie never aliases raster memory, since
//! the dataset assembler rescales cookie pixels in place later.

use crate::error::{Error, Result};
use crate::geo::GeoTransform;

/// One decoded raster band: row-major `height x width` values.
#[derive(Debug, Clone)]
pub struct Band {
    pub values: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Band {
    /// Wrap a row-major value buffer.
    ///
    /// # Errors
    /// Returns [`Error::RasterShape`] if the buffer length is not
    /// `width * height`.
    pub fn new(values: Vec<f32>, width: usize, height: usize) -> Result<Self> {
        if values.len() != width * height {
            return Err(Error::RasterShape(format!(
                "band buffer holds {} values, expected {}x{} = {}",
                values.len(),
                height,
                width,
                width * height
            )));
        }
        Ok(Self { values, width, height })
    }
}

/// Source of decoded raster bands plus the paired geo-transform.
///
/// Band indices are 1-based like the underlying formats; the imagery this
/// pipeline targets stores blue in band 1, green in band 2, red in band 3.
pub trait BandSource {
    /// Read one band as a row-major array.
    ///
    /// # Errors
    /// Fails when the band does not exist or cannot be decoded.
    fn read_band(&self, index: usize) -> Result<Band>;

    /// The affine geo-transform paired with the raster.
    ///
    /// # Errors
    /// Fails when the source carries no (or an invalid) geo-transform.
    fn geo_transform(&self) -> Result<GeoTransform>;
}

/// Band index holding the red channel.
pub const RED_BAND: usize = 3;
/// Band index holding the green channel.
pub const GREEN_BAND: usize = 2;
/// Band index holding the blue channel.
pub const BLUE_BAND: usize = 1;

/// A three-band raster with interleaved RGB pixels and its geo-transform.
///
/// Conceptually read-only once assembled: the pipeline never writes into
/// it, only copies windows out.
#[derive(Debug, Clone)]
pub struct RgbRaster {
    /// Interleaved pixel values: R,G,B per pixel, row-major.
    pixels: Vec<f32>,
    width: usize,
    height: usize,
    geo_transform: GeoTransform,
}

impl RgbRaster {
    /// Number of interleaved channels.
    pub const CHANNELS: usize = 3;

    /// Assemble an RGB raster from a band source, reading red from band 3,
    /// green from band 2 and blue from band 1.
    ///
    /// # Errors
    /// Fails if any band read fails or the bands disagree on dimensions.
    pub fn from_source<S: BandSource>(source: &S) -> Result<Self> {
        let red = source.read_band(RED_BAND)?;
        let green = source.read_band(GREEN_BAND)?;
        let blue = source.read_band(BLUE_BAND)?;
        let geo_transform = source.geo_transform()?;
        Self::from_bands(red, green, blue, geo_transform)
    }

    /// Stack three equally-sized bands into interleaved RGB.
    ///
    /// # Errors
    /// Returns [`Error::RasterShape`] when band dimensions disagree.
    pub fn from_bands(red: Band, green: Band, blue: Band, geo_transform: GeoTransform) -> Result<Self> {
        let (width, height) = (red.width, red.height);
        for (name, band) in [("green", &green), ("blue", &blue)] {
            if band.width != width || band.height != height {
                return Err(Error::RasterShape(format!(
                    "{name} band is {}x{}, red band is {}x{}",
                    band.height, band.width, height, width
                )));
            }
        }

        let mut pixels = vec![0.0_f32; width * height * Self::CHANNELS];
        for (i, chunk) in pixels.chunks_exact_mut(Self::CHANNELS).enumerate() {
            chunk[0] = red.values[i];
            chunk[1] = green.values[i];
            chunk[2] = blue.values[i];
        }

        Ok(Self { pixels, width, height, geo_transform })
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn geo_transform(&self) -> &GeoTransform {
        &self.geo_transform
    }

    /// Extract an independent cookie whose top-left corner is at
    /// `(line_start, pixel_start)`, clamped to the raster extent.
    ///
    /// Interior windows come back `size x size`. A window crossing the
    /// bottom or right raster edge comes back truncated, matching the
    /// array-slicing behavior existing training sets were produced with;
    /// scans that reach past the last full window therefore still complete.
    ///
    /// The returned image owns a defensive copy of the window; mutating it
    /// never touches the raster.
    ///
    /// # Errors
    /// Returns [`Error::RasterShape`] when the window origin itself lies
    /// outside the raster (the clamped window would be empty).
    pub fn cookie(&self, line_start: usize, pixel_start: usize, size: usize) -> Result<CookieImage> {
        if line_start >= self.height || pixel_start >= self.width {
            return Err(Error::RasterShape(format!(
                "cookie origin ({line_start}, {pixel_start}) lies outside raster {}x{}",
                self.height, self.width
            )));
        }

        let line_end = (line_start + size).min(self.height);
        let pixel_end = (pixel_start + size).min(self.width);
        let height = line_end - line_start;
        let width = pixel_end - pixel_start;

        let mut pixels = Vec::with_capacity(height * width * Self::CHANNELS);
        for line in line_start..line_end {
            let row_start = (line * self.width + pixel_start) * Self::CHANNELS;
            let row_end = row_start + width * Self::CHANNELS;
            pixels.extend_from_slice(&self.pixels[row_start..row_end]);
        }

        Ok(CookieImage { pixels, width, height })
    }
}

/// An independent RGB sub-image copied out of the raster.
///
/// Shaped `height x width x 3`, row-major, interleaved. Interior cookies
/// are square; cookies clipped at the raster edge are smaller.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieImage {
    pub pixels: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl CookieImage {
    /// Largest pixel value across all channels.
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.pixels.iter().copied().fold(0.0_f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn gradient_raster(width: usize, height: usize) -> RgbRaster {
        let n = width * height;
        let red = Band::new((0..n).map(|i| i as f32).collect(), width, height).unwrap();
        let green = Band::new(vec![0.5; n], width, height).unwrap();
        let blue = Band::new(vec![1.0; n], width, height).unwrap();
        let gt = GeoTransform::new([0.0, 1.0, 0.0, 0.0, 0.0, -1.0]).unwrap();
        RgbRaster::from_bands(red, green, blue, gt).unwrap()
    }

    #[test]
    fn test_band_shape_validation() {
        assert!(Band::new(vec![0.0; 12], 4, 3).is_ok());
        assert!(Band::new(vec![0.0; 11], 4, 3).is_err());
    }

    #[test]
    fn test_mismatched_band_dimensions() {
        let red = Band::new(vec![0.0; 12], 4, 3).unwrap();
        let green = Band::new(vec![0.0; 12], 4, 3).unwrap();
        let blue = Band::new(vec![0.0; 6], 2, 3).unwrap();
        let gt = GeoTransform::new([0.0, 1.0, 0.0, 0.0, 0.0, -1.0]).unwrap();
        assert!(RgbRaster::from_bands(red, green, blue, gt).is_err());
    }

    #[test]
    fn test_interleaving_order() {
        let raster = gradient_raster(4, 3);
        // pixel index 5: red = 5.0, green = 0.5, blue = 1.0
        let cookie = raster.cookie(1, 1, 1).unwrap();
        assert_eq!((cookie.height, cookie.width), (1, 1));
        assert_eq!(cookie.pixels, vec![5.0, 0.5, 1.0]);
    }

    #[test]
    fn test_cookie_is_defensive_copy() {
        let raster = gradient_raster(8, 8);
        let mut cookie = raster.cookie(2, 2, 4).unwrap();
        let before = raster.cookie(2, 2, 4).unwrap();
        for v in &mut cookie.pixels {
            *v = -1.0;
        }
        // re-extracting yields the untouched window
        assert_eq!(raster.cookie(2, 2, 4).unwrap(), before);
    }

    #[test]
    fn test_cookie_truncates_at_edge() {
        let raster = gradient_raster(8, 8);

        let full = raster.cookie(0, 0, 8).unwrap();
        assert_eq!((full.height, full.width), (8, 8));

        // window reaching past the bottom loses rows, not the whole scan
        let bottom = raster.cookie(6, 0, 4).unwrap();
        assert_eq!((bottom.height, bottom.width), (2, 4));
        assert_eq!(bottom.pixels.len(), 2 * 4 * 3);
        // first truncated row is raster row 6
        assert_eq!(bottom.pixels[0], 48.0);

        // window reaching past the right edge loses columns
        let right = raster.cookie(0, 5, 4).unwrap();
        assert_eq!((right.height, right.width), (4, 3));

        // corner window truncates on both axes
        let corner = raster.cookie(7, 7, 4).unwrap();
        assert_eq!((corner.height, corner.width), (1, 1));
        assert_eq!(corner.pixels, vec![63.0, 0.5, 1.0]);
    }

    #[test]
    fn test_cookie_origin_outside_raster() {
        let raster = gradient_raster(8, 8);
        assert!(raster.cookie(8, 0, 4).is_err());
        assert!(raster.cookie(0, 8, 4).is_err());
    }

    #[test]
    fn test_cookie_max_value() {
        let raster = gradient_raster(4, 4);
        let cookie = raster.cookie(0, 0, 4).unwrap();
        assert_eq!(cookie.max_value(), 15.0);
    }
}

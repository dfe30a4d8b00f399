//! Per-pixel polygon occupancy mask.
//!
//! The mask marks every raster cell that falls inside at least one parking
//! polygon. Building it is the dominant cost of the exact pipeline
//! (O(total polygon bounding-box area)), so it is computed once, persisted,
//! and consumed by a later segmentation run.
//!
//! # File format
//!
//! A flat little-endian binary layout that round-trips bit-identically:
//!
//! ```text
//! 4 bytes  magic "LMSK"
//! 8 bytes  height (u64 LE)
//! 8 bytes  width  (u64 LE)
//! H*W bytes  cell values, row-major, 0 or 1
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::casting::clamp_range;
use crate::error::{Error, Result};
use crate::geometry::{Point, Polygon};

const MAGIC: &[u8; 4] = b"LMSK";

/// Binary occupancy matrix with the raster's pixel dimensions.
///
/// Cells are addressed `(line, pixel)`; value 1 means "inside at least one
/// polygon".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMask {
    cells: Vec<u8>,
    width: usize,
    height: usize,
}

impl OccupancyMask {
    /// An all-zero mask.
    #[must_use]
    pub fn zeroed(height: usize, width: usize) -> Self {
        Self { cells: vec![0; height * width], width, height }
    }

    /// Build the mask by testing, for each polygon, every integer coordinate
    /// inside its bounding box against exact ray-casting containment.
    ///
    /// Polygon points use the pixel-space convention `x = line, y = pixel`.
    /// Bounding boxes reaching past the raster are clamped.
    #[must_use]
    pub fn from_polygons(height: usize, width: usize, polygons: &[Polygon]) -> Self {
        let mut mask = Self::zeroed(height, width);

        for (poly_no, poly) in polygons.iter().enumerate() {
            let (max_x, max_y, min_x, min_y) = poly.bounds();
            let lines = clamp_range(min_x as i64, max_x as i64, height);
            let pixels = clamp_range(min_y as i64, max_y as i64, width);

            let mut marked = 0_usize;
            for line in lines.clone() {
                for pixel in pixels.clone() {
                    if poly.contains(&Point::new(line as f64, pixel as f64)) {
                        mask.cells[line * width + pixel] = 1;
                        marked += 1;
                    }
                }
            }
            debug!(polygon = poly_no, marked, "rasterized polygon");
        }

        info!(
            occupied = mask.occupied_total(),
            height, width, "occupancy mask built"
        );
        mask
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

    /// Whether the cell at `(line, pixel)` lies inside a polygon.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, line: usize, pixel: usize) -> bool {
        self.cells[line * self.width + pixel] != 0
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn occupied_total(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Persist as a flat binary file (see the module docs for the layout).
    ///
    /// # Errors
    /// Propagates I/O failures.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(MAGIC)?;
        writer.write_all(&(self.height as u64).to_le_bytes())?;
        writer.write_all(&(self.width as u64).to_le_bytes())?;
        writer.write_all(&self.cells)?;
        writer.flush()?;
        debug!(path = %path.as_ref().display(), "occupancy mask saved");
        Ok(())
    }

    /// Load a mask previously written by [`save`](Self::save).
    ///
    /// # Errors
    /// Returns [`Error::MaskFormat`] on a bad magic, an impossible shape, or
    /// a truncated payload; I/O failures propagate as [`Error::Io`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::MissingInput(path.as_ref().to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let mut reader = BufReader::new(file);

        let mut magic = [0_u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::MaskFormat(format!("bad magic {magic:?}")));
        }

        let mut dim = [0_u8; 8];
        reader.read_exact(&mut dim)?;
        let height = u64::from_le_bytes(dim) as usize;
        reader.read_exact(&mut dim)?;
        let width = u64::from_le_bytes(dim) as usize;

        let expected = height
            .checked_mul(width)
            .ok_or_else(|| Error::MaskFormat(format!("impossible shape {height}x{width}")))?;

        let mut cells = Vec::with_capacity(expected);
        reader.read_to_end(&mut cells)?;
        if cells.len() != expected {
            return Err(Error::MaskFormat(format!(
                "payload holds {} cells, header says {height}x{width} = {expected}",
                cells.len()
            )));
        }

        Ok(Self { cells, width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_polygon(line0: f64, pixel0: f64, side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(line0, pixel0),
            Point::new(line0, pixel0 + side),
            Point::new(line0 + side, pixel0 + side),
            Point::new(line0 + side, pixel0),
        ])
    }

    #[test]
    fn test_zeroed_mask() {
        let mask = OccupancyMask::zeroed(10, 20);
        assert_eq!(mask.height(), 10);
        assert_eq!(mask.width(), 20);
        assert_eq!(mask.occupied_total(), 0);
    }

    #[test]
    fn test_from_polygons_marks_interior() {
        let mask = OccupancyMask::from_polygons(40, 40, &[square_polygon(10.0, 10.0, 10.0)]);
        assert!(mask.is_occupied(15, 15));
        assert!(!mask.is_occupied(5, 5));
        assert!(!mask.is_occupied(30, 30));
        // roughly the square's area, boundary cells may go either way
        let total = mask.occupied_total();
        assert!(total > 60 && total < 130, "occupied: {total}");
    }

    #[test]
    fn test_out_of_raster_polygon_is_clamped() {
        let mask = OccupancyMask::from_polygons(20, 20, &[square_polygon(-5.0, 15.0, 10.0)]);
        // only the in-raster corner can be marked; no panic
        assert!(mask.occupied_total() < 60);
    }

    #[test]
    fn test_overlapping_polygons_stay_binary() {
        let polys = [square_polygon(5.0, 5.0, 10.0), square_polygon(8.0, 8.0, 10.0)];
        let mask = OccupancyMask::from_polygons(30, 30, &polys);
        assert!(mask.is_occupied(10, 10));
        // cells are 0/1, never additive
        assert!(mask.cells.iter().all(|&c| c <= 1));
    }

    #[test]
    fn test_save_load_roundtrip_bit_identical() {
        let mask = OccupancyMask::from_polygons(32, 48, &[square_polygon(4.0, 6.0, 20.0)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.bin");

        mask.save(&path).unwrap();
        let loaded = OccupancyMask::load(&path).unwrap();
        assert_eq!(mask, loaded);
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.bin");
        std::fs::write(&path, b"XXXX\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0").unwrap();
        assert!(matches!(OccupancyMask::load(&path), Err(Error::MaskFormat(_))));
    }

    #[test]
    fn test_load_rejects_truncated_payload() {
        let mask = OccupancyMask::zeroed(8, 8);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        mask.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
        assert!(matches!(OccupancyMask::load(&path), Err(Error::MaskFormat(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            OccupancyMask::load("/nonexistent/mask.bin"),
            Err(Error::MissingInput(_))
        ));
    }
}

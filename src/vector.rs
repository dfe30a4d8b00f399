//! Vector input: polygon rings in geographic coordinates and their
//! conversion into pixel-space polygons.
//!
//! Rings arrive as `(lon, lat)` vertex lists, are projected into the UTM
//! zone of each vertex, then mapped through the raster's geo-transform.
//! Pixel-space polygons use the `x = line, y = pixel` convention shared
//! with [`crate::mask`] and [`crate::label`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geo::GeoTransform;
use crate::geometry::projection;
use crate::geometry::{Point, Polygon};

/// One closed ring of `(lon, lat)` vertices.
pub type LonLatRing = Vec<(f64, f64)>;

/// Supplier of polygon rings in geographic coordinates.
pub trait PolygonSource {
    /// Read all rings from the source.
    ///
    /// # Errors
    /// Source-specific; malformed input surfaces as
    /// [`Error::VectorFormat`].
    fn read_rings(&self) -> Result<Vec<LonLatRing>>;
}

/// JSON file holding an array of rings, each an array of `[lon, lat]`
/// pairs.
///
/// Stands in for the full vector-layer reader; any source that can produce
/// rings plugs in through [`PolygonSource`].
#[derive(Debug, Clone)]
pub struct JsonRingFile {
    path: PathBuf,
}

impl JsonRingFile {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PolygonSource for JsonRingFile {
    fn read_rings(&self) -> Result<Vec<LonLatRing>> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::MissingInput(self.path.clone())
            } else {
                Error::Io(e)
            }
        })?;
        let raw: Vec<Vec<[f64; 2]>> = serde_json::from_reader(BufReader::new(file))?;

        let mut rings = Vec::with_capacity(raw.len());
        for (index, ring) in raw.into_iter().enumerate() {
            if ring.len() < 3 {
                return Err(Error::VectorFormat(format!(
                    "ring {index} has {} vertices, need at least 3",
                    ring.len()
                )));
            }
            rings.push(ring.into_iter().map(|[lon, lat]| (lon, lat)).collect());
        }
        info!(rings = rings.len(), path = %self.path.display(), "rings loaded");
        Ok(rings)
    }
}

/// Project a `(lon, lat)` ring into UTM `(easting, northing)` pairs.
///
/// The zone is chosen per vertex from its own coordinate; a ring that
/// straddles a zone boundary mixes frames, which is logged but not
/// rejected (the source data never crosses zones in practice).
///
/// # Errors
/// [`Error::Projection`] when a vertex cannot be projected.
pub fn utm_ring(ring: &[(f64, f64)]) -> Result<Vec<(f64, f64)>> {
    let mut projected = Vec::with_capacity(ring.len());
    let mut first_zone = None;
    for &(lon, lat) in ring {
        let (easting, northing, zone) =
            projection::lat_lon_to_utm(lon, lat).map_err(Error::Projection)?;
        match first_zone {
            None => first_zone = Some(zone),
            Some(z) if z != zone => {
                warn!(expected = z, found = zone, "ring crosses UTM zone boundary");
            }
            Some(_) => {}
        }
        projected.push((easting, northing));
    }
    Ok(projected)
}

/// Map a projected `(easting, northing)` ring into a pixel-space polygon
/// (`Point { x: line, y: pixel }`).
#[must_use]
pub fn pixel_polygon(ring: &[(f64, f64)], geo_transform: &GeoTransform) -> Polygon {
    let points = ring
        .iter()
        .map(|&(x, y)| {
            let (pixel, line) = geo_transform.to_pixel(x, y);
            Point::new(line as f64, pixel as f64)
        })
        .collect();
    Polygon::new(points)
}

/// Load every ring from `source` and convert it all the way to pixel
/// space.
///
/// # Errors
/// Propagates source, projection and format failures.
pub fn load_pixel_polygons<S: PolygonSource>(
    source: &S,
    geo_transform: &GeoTransform,
) -> Result<Vec<Polygon>> {
    let rings = source.read_rings()?;
    let mut polygons = Vec::with_capacity(rings.len());
    for ring in &rings {
        let projected = utm_ring(ring)?;
        polygons.push(pixel_polygon(&projected, geo_transform));
    }
    Ok(polygons)
}

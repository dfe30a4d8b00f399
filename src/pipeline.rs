//! The two runnable passes over a raster.
//!
//! Pass one ([`run_mask_pass`]) rasterizes the parking polygons into an
//! [`OccupancyMask`] and persists it next to the output. Pass two comes in
//! two flavors matching the labeling strategies: [`run_heuristic_pass`]
//! labels straight from polygon bounding boxes, [`run_mask_segment_pass`]
//! reloads the saved mask and labels by occupied-cell count. Both flavors
//! scan, label, assemble and emit through the same machinery.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::dataset::{Assembler, DatasetSummary};
use crate::error::Result;
use crate::label::{BoundsHeuristic, LabelStrategy, MaskThreshold};
use crate::mask::OccupancyMask;
use crate::raster::RgbRaster;
use crate::scan::{ScanEnd, TileScanner};
use crate::sink::CookieSink;
use crate::vector::{self, PolygonSource};

/// Build the occupancy mask from the polygon source and save it to
/// `config.mask_path`.
///
/// The raster contributes only its extent and geo-transform; pixel data is
/// untouched.
///
/// # Errors
/// Vector loading, projection and mask I/O failures propagate.
pub fn run_mask_pass<P: PolygonSource>(
    config: &Config,
    polygons: &P,
    raster: &RgbRaster,
) -> Result<OccupancyMask> {
    let pixel_polygons = vector::load_pixel_polygons(polygons, raster.geo_transform())?;
    info!(polygons = pixel_polygons.len(), "building occupancy mask");

    let mask = OccupancyMask::from_polygons(raster.height(), raster.width(), &pixel_polygons);
    mask.save(&config.mask_path)?;
    info!(
        occupied = mask.occupied_total(),
        path = %config.mask_path.display(),
        "occupancy mask saved"
    );
    Ok(mask)
}

/// Scan, label, assemble and emit with the given strategy and scan end.
///
/// # Errors
/// Scan, normalization and sink failures propagate;
/// [`crate::error::Error::DatasetImbalance`] when positives outnumber
/// negatives.
pub fn segment_with<L: LabelStrategy, S: CookieSink>(
    config: &Config,
    raster: &RgbRaster,
    strategy: &L,
    scan_end: ScanEnd,
    sink: &mut S,
) -> Result<DatasetSummary> {
    let scanner = TileScanner::new(
        raster.height(),
        raster.width(),
        config.cookie_size,
        config.stride(),
        config.border_margin,
        scan_end,
    );
    info!(positions = scanner.position_count(), "scanning raster");

    let cancel = Arc::new(AtomicBool::new(false));
    let tiles = scanner.scan(raster, strategy, &cancel)?;
    Assembler::new(config.random_seed).assemble(tiles, sink)
}

/// Segment pass with the bounding-box heuristic, scanning up to
/// `extent - border_margin`.
///
/// # Errors
/// See [`segment_with`]; polygon loading failures propagate.
pub fn run_heuristic_pass<P: PolygonSource, S: CookieSink>(
    config: &Config,
    polygons: &P,
    raster: &RgbRaster,
    sink: &mut S,
) -> Result<DatasetSummary> {
    let pixel_polygons = vector::load_pixel_polygons(polygons, raster.geo_transform())?;
    let strategy = BoundsHeuristic::from_polygons(&pixel_polygons, config.cookie_size);
    segment_with(config, raster, &strategy, ScanEnd::Margin, sink)
}

/// Segment pass with the mask-threshold strategy, reloading the mask saved
/// by [`run_mask_pass`] and scanning up to `extent - cookie_size`.
///
/// # Errors
/// See [`segment_with`]; [`crate::error::Error::MissingInput`] when the
/// mask file does not exist.
pub fn run_mask_segment_pass<S: CookieSink>(
    config: &Config,
    raster: &RgbRaster,
    sink: &mut S,
) -> Result<DatasetSummary> {
    let mask = OccupancyMask::load(&config.mask_path)?;
    let strategy = MaskThreshold::new(&mask, config.cookie_size, config.pixel_threshold);
    segment_with(config, raster, &strategy, ScanEnd::Cookie, sink)
}

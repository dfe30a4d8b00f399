#![doc = include_str!("../README.md")]
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geo`]: Affine geo-transform and world-to-pixel conversion
//! - [`geometry`]: [`Point`], [`Polygon`], ray-casting containment, UTM projection
//! - [`raster`]: [`BandSource`] trait, RGB raster assembly, cookie extraction
//! - [`vector`]: [`PolygonSource`] trait and geographic-to-pixel ring conversion
//! - [`mask`]: Occupancy mask build, persistence, and reload
//! - [`label`]: [`LabelStrategy`] trait with bounds-heuristic and mask-threshold impls
//! - [`scan`]: Overlapping-window [`TileScanner`]
//! - [`dataset`]: Balanced pairing, seeded shuffle, normalization, manifest
//! - [`sink`]: [`CookieSink`] trait and the PNG/manifest writer
//! - [`pipeline`]: The two runnable passes (mask pass, segmentation pass)

// ============================================================================
// Public modules
// ============================================================================

pub mod casting;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod label;
pub mod mask;
pub mod pipeline;
pub mod raster;
pub mod scan;
pub mod sink;
pub mod vector;

// ============================================================================
// Errors & Configuration
// ============================================================================

pub use error::{Error, Result};

pub use config::{
    Config,
    Strategy,
    DEFAULT_BORDER_MARGIN,
    DEFAULT_COOKIE_SIZE,
    DEFAULT_PIXEL_THRESHOLD,
    DEFAULT_RANDOM_SEED,
};

// ============================================================================
// Coordinates & Geometry
// ============================================================================

pub use geo::GeoTransform;
pub use geometry::{Point, Polygon};
pub use geometry::projection::{
    lat_lon_to_utm,
    project_point,
    utm_epsg_for,
};

// ============================================================================
// Raster & Vector Inputs
// ============================================================================

pub use raster::{
    Band,
    BandSource,
    CookieImage,
    RgbRaster,
    BLUE_BAND,
    GREEN_BAND,
    RED_BAND,
};

pub use vector::{JsonRingFile, LonLatRing, PolygonSource};

// ============================================================================
// Labeling
// ============================================================================

pub use mask::OccupancyMask;
pub use label::{
    BoundsHeuristic,
    Label,
    LabelStrategy,
    MaskThreshold,
    PolygonBounds,
};

// ============================================================================
// Scanning & Assembly
// ============================================================================
// Primary API: pipeline::run_mask_pass then pipeline::run_mask_segment_pass

pub use scan::{cookie_name, ScanEnd, Tile, TileScanner};
pub use dataset::{Assembler, DatasetSummary};
pub use sink::{CookieSink, PngCookieSink, MANIFEST_NAME};

pub use pipeline::{
    run_heuristic_pass,
    run_mask_pass,
    run_mask_segment_pass,
    segment_with,
};

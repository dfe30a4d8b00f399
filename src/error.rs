//! Error type for the cookie-cutting pipeline.
//!
//! Everything here is fatal: the pipeline is a single-pass batch job with no
//! retries, so any failure aborts the run. Geometric approximations (ray
//! casting near vertices, the bounding-box heuristic) are documented behavior
//! and never surface as errors.

use std::path::PathBuf;

/// Errors produced by the cookie-cutting pipeline.
#[derive(Debug)]
pub enum Error {
    /// Geo-transform has a zero pixel resolution (would divide by zero).
    InvalidGeoTransform(String),
    /// Band dimensions disagree or a window falls outside the raster.
    RasterShape(String),
    /// Fewer negative cookies than positive cookies during pairing.
    DatasetImbalance { positives: usize, negatives: usize },
    /// A cookie whose pixels are all zero cannot be normalized.
    DegenerateTile { line: usize, pixel: usize },
    /// Coordinate projection failure (unsupported CRS, transform error).
    Projection(String),
    /// Occupancy-mask file is truncated or carries a bad header.
    MaskFormat(String),
    /// Polygon ring file could not be parsed.
    VectorFormat(String),
    /// PNG encoding failure in the cookie sink.
    Encode(String),
    /// I/O error during file operations.
    Io(std::io::Error),
    /// A path that should exist does not.
    MissingInput(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGeoTransform(msg) => write!(f, "invalid geo-transform: {msg}"),
            Self::RasterShape(msg) => write!(f, "raster shape error: {msg}"),
            Self::DatasetImbalance { positives, negatives } => write!(
                f,
                "dataset imbalance: {positives} positive cookies but only {negatives} negatives to pair them with"
            ),
            Self::DegenerateTile { line, pixel } => write!(
                f,
                "degenerate cookie at line {line}, pixel {pixel}: all pixels are zero"
            ),
            Self::Projection(msg) => write!(f, "projection error: {msg}"),
            Self::MaskFormat(msg) => write!(f, "occupancy mask format error: {msg}"),
            Self::VectorFormat(msg) => write!(f, "vector input error: {msg}"),
            Self::Encode(msg) => write!(f, "PNG encoding error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingInput(path) => write!(f, "missing input: {}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::VectorFormat(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Encode(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Output sinks for assembled cookies.
//!
//! The assembler only talks to the [`CookieSink`] trait; [`PngCookieSink`]
//! is the on-disk implementation, writing 8-bit RGB PNGs plus the
//! `training_labels.csv` manifest consumed by the training step.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::Result;
use crate::raster::CookieImage;

/// Manifest file name expected by the downstream training tooling.
pub const MANIFEST_NAME: &str = "training_labels.csv";

/// Destination for assembled cookies and their manifest.
pub trait CookieSink {
    /// Persist one normalized cookie under `name` and return the path it
    /// landed at, which is what the manifest records.
    ///
    /// # Errors
    /// Implementation-specific; encoding and I/O failures are fatal.
    fn write_cookie(&mut self, name: &str, image: &CookieImage) -> Result<PathBuf>;

    /// Persist the complete manifest text.
    ///
    /// # Errors
    /// Implementation-specific; I/O failures are fatal.
    fn write_manifest(&mut self, manifest: &str) -> Result<()>;
}

/// Writes cookies as PNG files into a single output directory.
#[derive(Debug)]
pub struct PngCookieSink {
    output_dir: PathBuf,
}

impl PngCookieSink {
    /// Create the sink, creating `output_dir` if necessary.
    ///
    /// The directory is canonicalized so cookie paths (and therefore the
    /// manifest lines built from them) are absolute regardless of how the
    /// output directory was given.
    ///
    /// # Errors
    /// [`crate::error::Error::Io`] if the directory cannot be created or
    /// resolved.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(output_dir.as_ref())?;
        let output_dir = output_dir.as_ref().canonicalize()?;
        Ok(Self { output_dir })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl CookieSink for PngCookieSink {
    fn write_cookie(&mut self, name: &str, image: &CookieImage) -> Result<PathBuf> {
        let mut png = RgbImage::new(image.width as u32, image.height as u32);
        for line in 0..image.height {
            for pixel in 0..image.width {
                let base = (line * image.width + pixel) * 3;
                // normalized values sit in 0..=255; the float cast saturates
                png.put_pixel(
                    pixel as u32,
                    line as u32,
                    Rgb([
                        image.pixels[base] as u8,
                        image.pixels[base + 1] as u8,
                        image.pixels[base + 2] as u8,
                    ]),
                );
            }
        }
        let path = self.output_dir.join(name);
        png.save(&path)?;
        debug!(path = %path.display(), "cookie written");
        Ok(path)
    }

    fn write_manifest(&mut self, manifest: &str) -> Result<()> {
        let path = self.output_dir.join(MANIFEST_NAME);
        fs::write(&path, manifest)?;
        debug!(path = %path.display(), "manifest written");
        Ok(())
    }
}

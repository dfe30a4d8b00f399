//! Balanced dataset assembly: pairs every positive cookie with one
//! negative, normalizes both, and emits them with a plain-text manifest.
//!
//! Positives are scarce relative to negatives, so the full negative pool is
//! shuffled with a fixed seed and consumed one per positive. Determinism is
//! contractual (same seed, same tiles, same dataset); the shuffle algorithm
//! itself is not.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::error::{Error, Result};
use crate::raster::CookieImage;
use crate::scan::Tile;
use crate::sink::CookieSink;

/// Counts reported after a successful assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub positives: usize,
    pub negatives: usize,
    /// Cookie pairs emitted; the manifest holds `2 * pairs` lines.
    pub pairs: usize,
}

/// Split tile indices into positives and negatives, each preserving the
/// original scan order.
#[must_use]
pub fn partition(tiles: &[Tile]) -> (Vec<usize>, Vec<usize>) {
    let mut positives = Vec::new();
    let mut negatives = Vec::new();
    for (index, tile) in tiles.iter().enumerate() {
        if tile.label == 1 {
            positives.push(index);
        } else {
            negatives.push(index);
        }
    }
    (positives, negatives)
}

/// Scale a cookie in place so its largest value maps to 255.
///
/// `line_start` / `pixel_start` only identify the tile in the error.
///
/// # Errors
/// [`Error::DegenerateTile`] if every value is zero; such a cookie carries
/// no usable signal and normalizing it would divide by zero.
pub fn normalize(image: &mut CookieImage, line_start: usize, pixel_start: usize) -> Result<()> {
    let max = image.max_value();
    if max == 0.0 {
        return Err(Error::DegenerateTile {
            line: line_start,
            pixel: pixel_start,
        });
    }
    let scale = 255.0 / max;
    for value in &mut image.pixels {
        *value *= scale;
    }
    Ok(())
}

/// Assembles a balanced dataset from labeled tiles.
#[derive(Debug, Clone, Copy)]
pub struct Assembler {
    seed: u64,
}

impl Assembler {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Pair each positive with one seeded-shuffled negative, normalize and
    /// emit both through the sink, and write the manifest.
    ///
    /// Manifest lines are `"{path} {label}\n"` with the path reported by
    /// the sink, negative first within each pair, so the file alternates
    /// labels 0/1 and is exactly `2 * positives` lines long.
    ///
    /// # Errors
    /// [`Error::DatasetImbalance`] when there are fewer negatives than
    /// positives; sink and normalization failures propagate.
    pub fn assemble<S: CookieSink>(&self, mut tiles: Vec<Tile>, sink: &mut S) -> Result<DatasetSummary> {
        let (positives, mut negatives) = partition(&tiles);
        if negatives.len() < positives.len() {
            return Err(Error::DatasetImbalance {
                positives: positives.len(),
                negatives: negatives.len(),
            });
        }

        let summary = DatasetSummary {
            positives: positives.len(),
            negatives: negatives.len(),
            pairs: positives.len(),
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        negatives.shuffle(&mut rng);

        let mut manifest = String::new();
        for pair in 0..positives.len() {
            for index in [negatives[pair], positives[pair]] {
                let tile = &mut tiles[index];
                normalize(&mut tile.image, tile.line_start, tile.pixel_start)?;
                let path = sink.write_cookie(&tile.name, &tile.image)?;
                manifest.push_str(&path.to_string_lossy());
                manifest.push(' ');
                manifest.push_str(&tile.label.to_string());
                manifest.push('\n');
            }
        }
        sink.write_manifest(&manifest)?;

        info!(
            positives = summary.positives,
            negatives = summary.negatives,
            pairs = summary.pairs,
            "dataset assembled"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::cookie_name;

    /// Sink that records names and the manifest without touching disk.
    #[derive(Default)]
    struct MemorySink {
        cookies: Vec<(String, Vec<f32>)>,
        manifest: Option<String>,
    }

    impl CookieSink for MemorySink {
        fn write_cookie(&mut self, name: &str, image: &CookieImage) -> Result<std::path::PathBuf> {
            self.cookies.push((name.to_string(), image.pixels.clone()));
            Ok(std::path::PathBuf::from(name))
        }

        fn write_manifest(&mut self, manifest: &str) -> Result<()> {
            self.manifest = Some(manifest.to_string());
            Ok(())
        }
    }

    fn tile(label: u8, line: usize, pixel: usize, fill: f32) -> Tile {
        let size = 2;
        Tile {
            line_start: line,
            pixel_start: pixel,
            label,
            name: cookie_name(label, line, pixel),
            image: CookieImage {
                pixels: vec![fill; size * size * 3],
                width: size,
                height: size,
            },
        }
    }

    #[test]
    fn test_partition_preserves_order() {
        let tiles = vec![
            tile(0, 0, 0, 1.0),
            tile(1, 0, 64, 1.0),
            tile(0, 0, 128, 1.0),
            tile(1, 64, 0, 1.0),
        ];
        let (positives, negatives) = partition(&tiles);
        assert_eq!(positives, vec![1, 3]);
        assert_eq!(negatives, vec![0, 2]);
    }

    #[test]
    fn test_normalize_scales_to_255() {
        let mut image = CookieImage {
            pixels: vec![0.0, 25.5, 51.0],
            width: 1,
            height: 1,
        };
        normalize(&mut image, 0, 0).unwrap();
        assert_eq!(image.pixels, vec![0.0, 127.5, 255.0]);
    }

    #[test]
    fn test_normalize_rejects_all_zero() {
        let mut image = CookieImage {
            pixels: vec![0.0; 12],
            width: 2,
            height: 2,
        };
        match normalize(&mut image, 200, 264) {
            Err(Error::DegenerateTile { line, pixel }) => {
                assert_eq!((line, pixel), (200, 264));
            }
            other => panic!("expected DegenerateTile, got {other:?}"),
        }
    }

    #[test]
    fn test_manifest_alternates_and_counts() {
        let tiles = vec![
            tile(0, 0, 0, 10.0),
            tile(0, 0, 64, 10.0),
            tile(1, 0, 128, 10.0),
            tile(0, 64, 0, 10.0),
            tile(1, 64, 64, 10.0),
        ];
        let mut sink = MemorySink::default();
        let summary = Assembler::new(12347).assemble(tiles, &mut sink).unwrap();
        assert_eq!(summary.pairs, 2);
        assert_eq!(sink.cookies.len(), 4);

        let manifest = sink.manifest.expect("manifest written");
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), 2 * summary.positives);
        for pair in lines.chunks(2) {
            assert!(pair[0].ends_with(" 0"));
            assert!(pair[1].ends_with(" 1"));
        }
    }

    #[test]
    fn test_imbalance_is_typed() {
        let tiles = vec![tile(1, 0, 0, 10.0), tile(1, 0, 64, 10.0), tile(0, 64, 0, 10.0)];
        let mut sink = MemorySink::default();
        match Assembler::new(12347).assemble(tiles, &mut sink) {
            Err(Error::DatasetImbalance { positives, negatives }) => {
                assert_eq!((positives, negatives), (2, 1));
            }
            other => panic!("expected DatasetImbalance, got {other:?}"),
        }
        assert!(sink.cookies.is_empty());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let build = || -> Vec<Tile> {
            (0..20)
                .map(|i| tile(u8::from(i % 5 == 0), i, i * 64, 1.0 + i as f32))
                .collect()
        };
        let mut first = MemorySink::default();
        let mut second = MemorySink::default();
        Assembler::new(12347).assemble(build(), &mut first).unwrap();
        Assembler::new(12347).assemble(build(), &mut second).unwrap();
        assert_eq!(first.manifest, second.manifest);
        let names = |s: &MemorySink| s.cookies.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
        assert_eq!(names(&first), names(&second));
    }
}

//! Benchmarks for lotcutter labeling performance.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the critical hot paths:
//! - Ray-casting containment (single point and dense grids)
//! - Occupancy-mask construction from polygon sets
//! - Mask-threshold labeling over a scan window

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use lotcutter::{
    BoundsHeuristic, LabelStrategy, MaskThreshold, OccupancyMask, Point, Polygon,
};

/// A convex ring with `vertices` points around the given center.
fn ring(center: (f64, f64), radius: f64, vertices: usize) -> Polygon {
    let points = (0..vertices)
        .map(|i| {
            let angle = (i as f64) * std::f64::consts::TAU / (vertices as f64);
            Point::new(center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect();
    Polygon::new(points)
}

/// Polygons scattered over a square extent.
fn polygon_field(extent: f64, count: usize) -> Vec<Polygon> {
    (0..count)
        .map(|i| {
            let offset = (i as f64 + 0.5) * extent / (count as f64);
            ring((offset, extent - offset), 40.0, 8)
        })
        .collect()
}

/// Benchmark single-point containment against rings of varying complexity
fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");

    for vertices in [4, 16, 64, 256] {
        let polygon = ring((500.0, 500.0), 400.0, vertices);
        let inside = Point::new(500.0, 500.0);
        let outside = Point::new(999.0, 999.0);

        group.bench_with_input(
            BenchmarkId::new("inside", vertices),
            &polygon,
            |b, polygon| {
                b.iter(|| polygon.contains(black_box(&inside)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("outside", vertices),
            &polygon,
            |b, polygon| {
                b.iter(|| polygon.contains(black_box(&outside)));
            },
        );
    }

    group.finish();
}

/// Benchmark a dense containment grid, the inner loop of mask construction
fn bench_contains_grid(c: &mut Criterion) {
    let polygon = ring((128.0, 128.0), 100.0, 12);

    c.bench_function("contains_grid_256x256", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for line in 0..256 {
                for pixel in 0..256 {
                    if polygon.contains(black_box(&Point::new(line as f64, pixel as f64))) {
                        hits += 1;
                    }
                }
            }
            hits
        });
    });
}

/// Benchmark full occupancy-mask construction at increasing polygon counts
fn bench_mask_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_construction");
    group.sample_size(10);

    for count in [1, 8, 32] {
        let polygons = polygon_field(1024.0, count);
        group.bench_with_input(
            BenchmarkId::new("polygons", count),
            &polygons,
            |b, polygons| {
                b.iter(|| OccupancyMask::from_polygons(1024, 1024, black_box(polygons)));
            },
        );
    }

    group.finish();
}

/// Benchmark both labeling strategies over one scan row of positions
fn bench_labeling(c: &mut Criterion) {
    let mut group = c.benchmark_group("labeling");

    let polygons = polygon_field(2048.0, 16);
    let heuristic = BoundsHeuristic::from_polygons(&polygons, 256);
    let mask = OccupancyMask::from_polygons(2048, 2048, &polygons);
    let threshold = MaskThreshold::new(&mask, 256, 100);

    group.bench_function("heuristic_row", |b| {
        b.iter(|| {
            let mut positives = 0u32;
            for pixel_start in (200..1792).step_by(64) {
                positives += u32::from(heuristic.label(black_box(1000), pixel_start));
            }
            positives
        });
    });

    group.bench_function("mask_threshold_row", |b| {
        b.iter(|| {
            let mut positives = 0u32;
            for pixel_start in (200..1792).step_by(64) {
                positives += u32::from(threshold.label(black_box(1000), pixel_start));
            }
            positives
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_contains,
    bench_contains_grid,
    bench_mask_construction,
    bench_labeling,
);

criterion_main!(benches);

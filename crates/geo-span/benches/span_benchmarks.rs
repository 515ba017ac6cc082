//! Benchmarks for span detection and polar refinement.
//!
//! Run with: cargo bench --package geo-span --bench span_benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo_common::RasterSize;
use geo_span::{GeoSpan, PolarCoords};
use projection::EquirectangularGeoCoding;

fn global_scene(size: usize) -> (EquirectangularGeoCoding, RasterSize) {
    let step = 120.0 / size as f64;
    let gc = EquirectangularGeoCoding::new(size, size, 60.0, -60.0, -step, step).unwrap();
    (gc, RasterSize::new(size, size))
}

fn bench_compute_span(c: &mut Criterion) {
    let (gc, raster) = global_scene(1024);
    c.bench_function("compute_span_1024", |b| {
        b.iter(|| GeoSpan::compute(black_box(&gc), black_box(raster)))
    });
}

fn bench_polar_refine(c: &mut Criterion) {
    let (gc, raster) = global_scene(512);
    c.bench_function("polar_refine_512", |b| {
        b.iter(|| PolarCoords::refine(black_box(&gc), black_box(raster)))
    });
}

criterion_group!(benches, bench_compute_span, bench_polar_refine);
criterion_main!(benches);

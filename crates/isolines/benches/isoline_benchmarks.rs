//! Benchmarks for isoline tracing and labelling.
//!
//! Run with: cargo bench --package isolines --bench isoline_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use isolines::{
    auto_levels, Annotator, GridField, IsolineBuilder, IsolineConfig, Rect, ScalarField, ValueRange,
};
use rand::Rng;
use test_utils::{create_linear_ramp_grid, create_sine_hills_grid};

/// Sine hills with random noise on top (many short lines and saddles).
fn generate_noisy_field(width: usize, height: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    create_sine_hills_grid(width, height)
        .into_iter()
        .map(|v| v + rng.gen_range(-5.0..5.0))
        .collect()
}

fn field(width: usize, height: usize, data: Vec<f64>) -> GridField {
    GridField::new(width, height, data).unwrap()
}

// =============================================================================
// LEVEL GENERATION BENCHMARKS
// =============================================================================

fn bench_auto_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_levels");

    for density in [5usize, 12, 50, 200] {
        group.bench_with_input(BenchmarkId::new("density", density), &density, |b, &density| {
            b.iter(|| auto_levels(black_box(ValueRange::new(-40.0, 60.0)), density, 0.05));
        });
    }

    group.finish();
}

// =============================================================================
// SINGLE LEVEL BENCHMARKS
// =============================================================================

fn bench_single_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_level");

    let sizes = [(64, 64), (128, 128), (256, 256), (512, 512)];

    for (width, height) in sizes {
        let smooth = field(width, height, create_sine_hills_grid(width, height));
        let noisy = field(width, height, generate_noisy_field(width, height));
        let linear = field(width, height, create_linear_ramp_grid(width, height));

        group.throughput(Throughput::Elements((width * height) as u64));

        for (name, source) in [("smooth", &smooth), ("noisy", &noisy)] {
            let builder = IsolineBuilder::new().with_data_source(source);
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}x{}", width, height)),
                &builder,
                |b, builder| {
                    b.iter(|| builder.build_isoline_for_level(black_box(50.0)).unwrap());
                },
            );
        }

        let builder = IsolineBuilder::new().with_data_source(&linear);
        let level = width as f64 / 2.0 + 0.5;
        group.bench_with_input(
            BenchmarkId::new("linear", format!("{}x{}", width, height)),
            &builder,
            |b, builder| {
                b.iter(|| builder.build_isoline_for_level(black_box(level)).unwrap());
            },
        );
    }

    group.finish();
}

// =============================================================================
// FULL BUILD BENCHMARKS
// =============================================================================

fn bench_build_isoline(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_isoline");
    group.sample_size(20);

    let sizes = [(128, 128), (256, 256), (512, 512)];

    for (width, height) in sizes {
        let source = field(width, height, generate_noisy_field(width, height));
        group.throughput(Throughput::Elements((width * height) as u64));

        for parallel in [false, true] {
            let builder = IsolineBuilder::new()
                .with_data_source(&source)
                .with_config(IsolineConfig {
                    parallel,
                    ..IsolineConfig::default()
                });
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}x{}", width, height)),
                &builder,
                |b, builder| {
                    b.iter(|| builder.build_isoline().unwrap());
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// ANNOTATION BENCHMARKS
// =============================================================================

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");

    for (width, height) in [(128, 128), (512, 512)] {
        let source = field(width, height, create_sine_hills_grid(width, height));
        let collection = IsolineBuilder::new()
            .with_data_source(&source)
            .build_isoline()
            .unwrap();
        let visible = Rect::new(0.0, 0.0, source.width() as f64, source.height() as f64);

        for spacing in [10.0, 50.0] {
            let annotator = Annotator::with_spacing(spacing);
            group.bench_with_input(
                BenchmarkId::new(format!("spacing_{}", spacing), format!("{}x{}", width, height)),
                &collection,
                |b, collection| {
                    b.iter(|| annotator.annotate(black_box(collection), visible));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_auto_levels,
    bench_single_level,
    bench_build_isoline,
    bench_annotate,
);
criterion_main!(benches);

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use scintweight::{ApertureFilter, SpectralFilter, WeightFunction1D};

fn weight_function_precompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("scintweight");
    group.sample_size(25);
    group.measurement_time(Duration::from_secs(30));
    group.bench_function("WeightFunction1D::new circular 200 knots", |b| {
        b.iter(|| {
            WeightFunction1D::new(
                &SpectralFilter::Mono,
                &ApertureFilter::Circular,
                140.0,
                550.0,
                200,
            )
            .unwrap()
        })
    });
    group.finish();
}

fn weight_function_evaluate(c: &mut Criterion) {
    let wf = WeightFunction1D::new(
        &SpectralFilter::Mono,
        &ApertureFilter::Circular,
        140.0,
        550.0,
        200,
    )
    .unwrap();
    let mut group = c.benchmark_group("scintweight");
    group.bench_function("WeightFunction1D::evaluate", |b| b.iter(|| wf.evaluate(8.0)));
    group.finish();
}

criterion_group!(benches, weight_function_precompute, weight_function_evaluate);
criterion_main!(benches);

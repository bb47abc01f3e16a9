//! Benchmarks for contour level selection and figure rasterization.
//!
//! Run with: cargo bench --bench render

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array2;

use onsetplot::contour::{cinterval, clevels};
use onsetplot::figure::FigGroup;
use onsetplot::plots::{contourf_latday, LatDayOptions};
use onsetplot::render::{encode_png, render_figure, RenderOptions};
use onsetplot::Field;

/// A smooth signed (dayrel, lat) composite
fn generate_latday_field(ndays: usize, nlat: usize) -> Field {
    let days: Vec<f64> = (0..ndays)
        .map(|i| -120.0 + 320.0 * i as f64 / (ndays - 1) as f64)
        .collect();
    let lats: Vec<f64> = (0..nlat)
        .map(|j| -90.0 + 180.0 * j as f64 / (nlat - 1) as f64)
        .collect();
    let values = Array2::from_shape_fn((ndays, nlat), |(i, j)| {
        let d = days[i] / 60.0;
        let l = lats[j].to_radians();
        (10.0 * d.tanh() * l.sin() + 2.0 * (3.0 * l).cos()) as f32
    });
    Field::from_grid("U200", ("dayrel", days), ("lat", lats), values).unwrap()
}

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("levels");
    let field = generate_latday_field(321, 181);
    let values: Vec<f32> = field.values.iter().copied().collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("cinterval_clevels", |b| {
        b.iter(|| {
            let cint = cinterval(black_box(&values), 40, true).unwrap();
            black_box(clevels(&values, cint, true).unwrap())
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let field = generate_latday_field(321, 181);

    let mut grp = FigGroup::new(1, 1).unwrap();
    grp.next().unwrap();
    contourf_latday(&mut grp, &field, &LatDayOptions::default()).unwrap();

    for method in ["nearest", "bilinear"] {
        let opts = RenderOptions {
            interpolation: method.to_string(),
            ..Default::default()
        };
        group.throughput(Throughput::Elements((grp.width * grp.height) as u64));
        group.bench_with_input(BenchmarkId::new("latday", method), &opts, |b, opts| {
            b.iter(|| black_box(render_figure(&grp, opts).unwrap()));
        });
    }

    let img = render_figure(&grp, &RenderOptions::default()).unwrap();
    group.bench_function("encode_png", |b| {
        b.iter(|| black_box(encode_png(&img).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_levels, bench_render);
criterion_main!(benches);

//! Performance benchmarks for the checkbox detection hot path
//!
//! Run with: `cargo bench`
//! No PDFium library is needed; the benchmarks work on synthetic rasters.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use formcheck::detect::{classify, sample_region, Region};
use formcheck::template::FormTemplate;
use image::{DynamicImage, GrayImage, Luma};

const DARKNESS_CUTOFF: u8 = 200;
const FILL_THRESHOLD: f32 = 0.12;

/// Checkbox-sized raster (150x110, the default band at 10x) with roughly
/// one in `sparsity` pixels dark
fn checkbox_raster(sparsity: u32) -> DynamicImage {
    let img = GrayImage::from_fn(150, 110, |x, y| {
        if (y * 150 + x) % sparsity == 0 {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });
    DynamicImage::ImageLuma8(img)
}

/// Benchmark the density classifier on a single checkbox region
fn bench_classify(c: &mut Criterion) {
    let empty = checkbox_raster(u32::MAX);
    let sparse = checkbox_raster(20);
    let filled = checkbox_raster(1);

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(150 * 110));

    group.bench_function("empty_box", |b| {
        b.iter(|| classify(black_box(&empty), DARKNESS_CUTOFF, FILL_THRESHOLD));
    });

    group.bench_function("sparse_marks", |b| {
        b.iter(|| classify(black_box(&sparse), DARKNESS_CUTOFF, FILL_THRESHOLD));
    });

    group.bench_function("filled_box", |b| {
        b.iter(|| classify(black_box(&filled), DARKNESS_CUTOFF, FILL_THRESHOLD));
    });

    group.finish();
}

/// Benchmark cropping a checkbox band out of a full page raster and
/// classifying it (the per-checkbox work of one extraction run)
fn bench_sample_and_classify(c: &mut Criterion) {
    // US Letter at 10x
    let page = DynamicImage::ImageLuma8(GrayImage::from_pixel(6120, 7920, Luma([255u8])));
    let template = FormTemplate::default();
    let region = Region::around_anchor(
        100.0,
        &template.yes_column,
        template.band_above,
        template.band_below,
    );

    c.bench_function("sample_and_classify", |b| {
        b.iter(|| {
            let sample = sample_region(black_box(&page), 10.0, &region).unwrap();
            classify(&sample, DARKNESS_CUTOFF, FILL_THRESHOLD)
        });
    });
}

criterion_group!(benches, bench_classify, bench_sample_and_classify);
criterion_main!(benches);

//! Performance benchmarks for sampling.
//!
//! Measures the hot paths:
//! - Point placement on a full-size display
//! - Single-pixel sampling through display geometry
//! - Gradient evaluation

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use huepick::geometry::{DisplayPoint, DisplayRect};
use huepick::gradient::{Gradient, GradientDirection};
use huepick::pixel_buffer::PixelBuffer;
use huepick::placement::{PlacementConfig, place_points};
use image::{DynamicImage, Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn test_buffer() -> PixelBuffer {
    let img = RgbImage::from_fn(1600, 1200, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    PixelBuffer::from_image(&DynamicImage::ImageRgb8(img))
}

/// Benchmark placing the default five points and a crowded set of twenty.
fn bench_place_points(c: &mut Criterion) {
    let buffer = test_buffer();
    let rect = DisplayRect::new(800.0, 600.0);
    let config = PlacementConfig::default();

    for count in [5, 20] {
        c.bench_function(&format!("place_points_{count}"), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                place_points(
                    black_box(count),
                    rect,
                    &buffer,
                    &[],
                    &config,
                    &mut rng,
                )
            })
        });
    }
}

/// Benchmark 1000 display-space samples across the image.
fn bench_sample_display(c: &mut Criterion) {
    let buffer = test_buffer();
    let rect = DisplayRect::new(800.0, 600.0);
    let points: Vec<DisplayPoint> = (0..1000)
        .map(|i| DisplayPoint::new((i * 37 % 800) as f32, (i * 53 % 600) as f32))
        .collect();

    c.bench_function("sample_display_1000", |b| {
        b.iter(|| {
            for p in &points {
                let _ = black_box(buffer.sample_display(*p, rect));
            }
        })
    });
}

/// Benchmark gradient evaluation at 101 positions.
fn bench_gradient_color_at(c: &mut Criterion) {
    let colors: Vec<String> = ["#ff5e3a", "#ff9500", "#34c759", "#5856d6", "#af52de"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let gradient = Gradient::from_colors(&colors, GradientDirection::ToRight).unwrap();

    c.bench_function("gradient_color_at_101", |b| {
        b.iter(|| {
            for pos in 0..=100 {
                black_box(gradient.color_at(pos as f32));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_place_points,
    bench_sample_display,
    bench_gradient_color_at
);
criterion_main!(benches);

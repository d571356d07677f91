use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};
use vein_detect::utils::enhance::clahe;
use vein_detect::utils::filter::gaussian_blur;
use vein_detect::utils::grayscale::rgb_to_grayscale;

mod common;

fn textured(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 13) % 97 + 100) as u8]))
}

fn bench_rgb_to_grayscale_medium(c: &mut Criterion) {
    let image = common::synthetic_hand(640, 480);
    c.bench_function("rgb_to_grayscale_640x480", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image)))
    });
}

fn bench_clahe_medium(c: &mut Criterion) {
    let gray = textured(640, 480);
    c.bench_function("clahe_640x480", |b| {
        b.iter(|| clahe(black_box(&gray), black_box(2.0), black_box([8, 8])))
    });
}

fn bench_clahe_large(c: &mut Criterion) {
    let gray = textured(1920, 1080);
    c.bench_function("clahe_1920x1080", |b| {
        b.iter(|| clahe(black_box(&gray), black_box(2.0), black_box([8, 8])))
    });
}

fn bench_gaussian_blur_medium(c: &mut Criterion) {
    let gray = textured(640, 480);
    c.bench_function("gaussian_blur_5_640x480", |b| {
        b.iter(|| gaussian_blur(black_box(&gray), black_box(5)))
    });
}

criterion_group!(
    benches,
    bench_rgb_to_grayscale_medium,
    bench_clahe_medium,
    bench_clahe_large,
    bench_gaussian_blur_medium
);
criterion_main!(benches);

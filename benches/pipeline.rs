use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vein_detect::hand::extract_hand_mask;
use vein_detect::render::render_overlay;
use vein_detect::segment::segment_veins;
use vein_detect::stats::VeinStatistics;
use vein_detect::tools::load_rgb;
use vein_detect::{VeinConfig, detect_veins};

mod common;

fn bench_detect_veins_medium(c: &mut Criterion) {
    let image = common::synthetic_hand(640, 480);
    let config = VeinConfig::default();
    c.bench_function("detect_veins_640x480", |b| {
        b.iter(|| detect_veins(black_box(&image), black_box(&config)))
    });
}

fn bench_stages_medium(c: &mut Criterion) {
    let image = common::synthetic_hand(640, 480);
    let config = VeinConfig::default();
    let hand = extract_hand_mask(&image, &config.hand);
    let hand_mask = hand.mask().clone();
    let veins = match segment_veins(&image, &hand_mask, &config.enhance, &config.threshold) {
        Ok(veins) => veins,
        Err(e) => panic!("segmentation failed: {}", e),
    };

    c.bench_function("extract_hand_mask_640x480", |b| {
        b.iter(|| extract_hand_mask(black_box(&image), black_box(&config.hand)))
    });
    c.bench_function("segment_veins_640x480", |b| {
        b.iter(|| {
            segment_veins(
                black_box(&image),
                black_box(&hand_mask),
                black_box(&config.enhance),
                black_box(&config.threshold),
            )
        })
    });
    c.bench_function("render_overlay_640x480", |b| {
        b.iter(|| {
            render_overlay(
                black_box(&image),
                black_box(&veins.vein_mask),
                black_box(&hand_mask),
                black_box(&config.render),
            )
        })
    });
    c.bench_function("vein_statistics_640x480", |b| {
        b.iter(|| VeinStatistics::from_masks(black_box(&veins.vein_mask), black_box(&hand_mask)))
    });
}

fn bench_dataset_images(c: &mut Criterion) {
    let (root, images) = common::collect_dataset_images();
    if images.is_empty() {
        eprintln!("No dataset images under {}, skipping", root.display());
        return;
    }

    let config = VeinConfig::default();
    let mut group = c.benchmark_group("dataset");
    group.sample_size(10);
    for path in images {
        let Ok(image) = load_rgb(&path) else {
            continue;
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        group.bench_function(name, |b| {
            b.iter(|| detect_veins(black_box(&image), black_box(&config)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_detect_veins_medium,
    bench_stages_medium,
    bench_dataset_images
);
criterion_main!(benches);

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::path::PathBuf;
use vein_detect::tools::{dataset_iter, dataset_root_from_env, smoke_from_env};

/// Skin-toned frame with a few darker diagonal strands
pub fn synthetic_hand(width: u32, height: u32) -> RgbImage {
    let backdrop = Rgb([20, 40, 160]);
    let skin = Rgb([200, 150, 120]);
    let vein = Rgb([120, 90, 72]);
    let (mx, my) = (width / 8, height / 8);

    RgbImage::from_fn(width, height, |x, y| {
        if x < mx || y < my || x >= width - mx || y >= height - my {
            return backdrop;
        }
        let (xi, yi) = (x as i64, y as i64);
        let on_strand = [0i64, 90, 180]
            .iter()
            .any(|&offset| (xi - yi - offset).abs() <= 4 && x % 97 > 10);
        if on_strand { vein } else { skin }
    })
}

pub fn collect_dataset_images() -> (PathBuf, Vec<PathBuf>) {
    let root = dataset_root_from_env();
    let limit = std::env::var("VEIN_BENCH_LIMIT")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0);
    let smoke = smoke_from_env();

    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    (root, images)
}

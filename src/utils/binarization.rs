//! Adaptive mean binarization

use super::replicate;
use image::GrayImage;

/// Local mean over a `block x block` window with a replicated border, rounded
pub fn box_mean(gray: &GrayImage, block: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let block = block.max(1);
    let radius = (block / 2) as i64;
    let area = block as u64 * block as u64;
    let src = gray.as_raw();

    let mut rows = vec![0u64; w * h];
    for y in 0..h {
        let line = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut sum = 0u64;
            for dx in -radius..=radius {
                sum += line[replicate(x as i64 + dx, w as i64)] as u64;
            }
            rows[y * w + x] = sum;
        }
    }

    let mut mean = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u64;
            for dy in -radius..=radius {
                sum += rows[replicate(y as i64 + dy, h as i64) * w + x];
            }
            mean[y * w + x] = ((sum + area / 2) / area).min(255) as u8;
        }
    }

    GrayImage::from_raw(width, height, mean).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Inverted adaptive mean threshold
///
/// A pixel becomes foreground (255) when it is at least `offset` darker than
/// the mean of its `block x block` neighbourhood; everything else is 0.
/// `block` must be odd.
pub fn adaptive_threshold_inv(gray: &GrayImage, block: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mean = box_mean(gray, block);
    let mut binary = GrayImage::new(width, height);

    for ((src, m), dst) in gray.pixels().zip(mean.pixels()).zip(binary.pixels_mut()) {
        let is_dark = src[0] as i32 <= m[0] as i32 - offset;
        if is_dark {
            dst[0] = 255;
        }
    }

    binary
}

//! RGB to HSV conversion and HSV band thresholding
//!
//! Uses the 8-bit convention common to camera pipelines: hue is halved into
//! `0..180`, saturation and value are scaled to `0..=255`.

use crate::models::{Hsv, HsvRange};
use image::{GrayImage, RgbImage};

/// Convert one RGB pixel to HSV
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (ri, gi, bi) = (r as i32, g as i32, b as i32);
    let v = ri.max(gi).max(bi);
    let vmin = ri.min(gi).min(bi);
    let diff = v - vmin;

    let s = if v == 0 {
        0
    } else {
        (diff * 255 + v / 2) / v
    };

    let h = if diff == 0 {
        0
    } else {
        let sector = if v == ri {
            30.0 * (gi - bi) as f32 / diff as f32
        } else if v == gi {
            60.0 + 30.0 * (bi - ri) as f32 / diff as f32
        } else {
            120.0 + 30.0 * (ri - gi) as f32 / diff as f32
        };
        let h = (sector + 0.5).floor() as i32;
        if h < 0 { h + 180 } else { h % 180 }
    };

    Hsv::new(h as u8, s as u8, v as u8)
}

/// Mark pixels whose HSV value lies inside `range` (255) or outside (0)
pub fn hsv_in_range(rgb: &RgbImage, range: &HsvRange) -> GrayImage {
    let (width, height) = rgb.dimensions();
    let mut mask = GrayImage::new(width, height);

    for (src, dst) in rgb.pixels().zip(mask.pixels_mut()) {
        let [r, g, b] = src.0;
        if range.contains(rgb_to_hsv(r, g, b)) {
            dst.0[0] = 255;
        }
    }

    mask
}

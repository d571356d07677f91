//! Separable Gaussian smoothing with a mirrored border

use super::reflect101;
use image::GrayImage;

/// 1D Gaussian weights for an odd kernel size
///
/// Sizes up to 7 use the fixed binomial-like tables; larger sizes derive
/// sigma from the size as `0.3 * ((k - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(ksize: u32) -> Vec<f32> {
    match ksize {
        0 | 1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
            let center = (ksize / 2) as f32;
            let denom = 2.0 * sigma * sigma;
            let raw: Vec<f32> = (0..ksize)
                .map(|i| {
                    let d = i as f32 - center;
                    (-(d * d) / denom).exp()
                })
                .collect();
            let sum: f32 = raw.iter().sum();
            raw.into_iter().map(|w| w / sum).collect()
        }
    }
}

/// Blur with a `ksize x ksize` Gaussian
pub fn gaussian_blur(gray: &GrayImage, ksize: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let kernel = gaussian_kernel(ksize);
    if kernel.len() == 1 || width == 0 || height == 0 {
        return gray.clone();
    }

    let (w, h) = (width as usize, height as usize);
    let radius = (kernel.len() / 2) as i64;
    let src = gray.as_raw();

    // Horizontal pass keeps full precision for the vertical pass
    let mut rows = vec![0f32; w * h];
    for y in 0..h {
        let line = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = reflect101(x as i64 + k as i64 - radius, w as i64);
                acc += weight * line[sx] as f32;
            }
            rows[y * w + x] = acc;
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = reflect101(y as i64 + k as i64 - radius, h as i64);
                acc += weight * rows[sy * w + x];
            }
            out[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| gray.clone())
}

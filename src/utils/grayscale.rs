//! Convert RGB image to grayscale
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses 14-bit fixed point arithmetic: Y = (4899*R + 9617*G + 1868*B + 2^13) >> 14

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Coefficients for grayscale conversion, scaled by 2^14
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32 + ROUND) >> SHIFT;
    y.min(255) as u8
}

/// Convert an RGB image to single-channel luminance
pub fn rgb_to_grayscale(rgb: &RgbImage) -> GrayImage {
    let (width, height) = rgb.dimensions();
    let src = rgb.as_raw();
    let mut gray = vec![0u8; width as usize * height as usize];

    // Process 8 pixels at a time
    let pixel_count = gray.len();
    let mut i = 0;
    while i + 8 <= pixel_count {
        for j in 0..8 {
            let idx = (i + j) * 3;
            gray[i + j] = luma(src[idx], src[idx + 1], src[idx + 2]);
        }
        i += 8;
    }

    // Process remaining pixels
    for i in i..pixel_count {
        let idx = i * 3;
        gray[i] = luma(src[idx], src[idx + 1], src[idx + 2]);
    }

    GrayImage::from_raw(width, height, gray).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Replicate a single channel into RGB, e.g. to display a mask
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    let (width, height) = gray.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Luma([v]) = *gray.get_pixel(x, y);
        Rgb([v, v, v])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(pixels: &[[u8; 3]], width: u32, height: u32) -> RgbImage {
        RgbImage::from_raw(width, height, pixels.concat()).unwrap()
    }

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let gray = rgb_to_grayscale(&rgb(&[[255, 255, 255]], 1, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);

        // Pure black
        let gray = rgb_to_grayscale(&rgb(&[[0, 0, 0]], 1, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 0);

        // Pure red
        let gray = rgb_to_grayscale(&rgb(&[[255, 0, 0]], 1, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 76);

        // Pure green
        let gray = rgb_to_grayscale(&rgb(&[[0, 255, 0]], 1, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 150);
    }

    #[test]
    fn test_unrolled_and_tail_paths_agree() {
        // 11 pixels: one unrolled block of 8 plus a tail of 3
        let pixels: Vec<[u8; 3]> = (0..11u8).map(|i| [i * 20, 255 - i * 20, i * 7]).collect();
        let gray = rgb_to_grayscale(&rgb(&pixels, 11, 1));
        for (x, p) in pixels.iter().enumerate() {
            assert_eq!(gray.get_pixel(x as u32, 0)[0], luma(p[0], p[1], p[2]));
        }
    }

    #[test]
    fn test_gray_to_rgb() {
        let gray = GrayImage::from_raw(2, 1, vec![0, 200]).unwrap();
        let out = gray_to_rgb(&gray);
        assert_eq!(out.get_pixel(1, 0), &Rgb([200, 200, 200]));
    }
}

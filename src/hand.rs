//! Hand silhouette extraction
//!
//! Skin-toned pixels are selected in HSV space, grown and denoised, then the
//! largest connected region is taken as the hand. Its interior is filled and
//! the result is pulled inward so that vein analysis stays clear of the skin
//! fold at the true hand edge.

use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::median_filter;
use imageproc::map::map_colors;
use imageproc::region_labelling::{Connectivity, connected_components};
use tracing::debug;

use crate::config::HandMaskParams;
use crate::detector::contours::{find_external_contours, largest_contour};
use crate::utils::color::hsv_in_range;
use crate::utils::mask::{ON, count_nonzero, fill_holes};
use crate::utils::morphology::{Border, StructuringElement, dilate, erode};

/// Output of a successful hand extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct HandMask {
    /// Eroded hand region used by every later stage
    pub mask: GrayImage,
    /// Pixels inside the skin band, before any cleanup
    pub skin: GrayImage,
    /// Filled hand region before erosion
    pub silhouette: GrayImage,
}

/// Result of looking for a hand in an image.
#[derive(Debug, Clone, PartialEq)]
pub enum HandExtraction {
    /// A skin region was found
    Found(HandMask),
    /// No skin region survived cleanup; `mask` is all zero
    NoHandDetected {
        /// All-zero mask with the image's dimensions
        mask: GrayImage,
        /// Raw skin mask, kept for diagnostics
        skin: GrayImage,
    },
}

impl HandExtraction {
    /// The hand mask, all zero when no hand was found
    pub fn mask(&self) -> &GrayImage {
        match self {
            HandExtraction::Found(hand) => &hand.mask,
            HandExtraction::NoHandDetected { mask, .. } => mask,
        }
    }
}

/// Locate the hand in `rgb` and build its mask
pub fn extract_hand_mask(rgb: &RgbImage, params: &HandMaskParams) -> HandExtraction {
    let (width, height) = rgb.dimensions();

    let skin = hsv_in_range(rgb, &params.skin);
    debug!(skin_pixels = count_nonzero(&skin), "Skin band thresholded");

    let grown = dilate(
        &skin,
        StructuringElement::square(params.dilate_kernel),
        params.dilate_iterations,
    );
    let radius = params.median_window / 2;
    let cleaned = median_filter(&grown, radius, radius);

    let contours = find_external_contours(&cleaned);
    let hand = largest_contour(&contours)
        .and_then(|idx| contours[idx].points().first().map(|&start| (idx, start)));
    let Some((hand_idx, start)) = hand else {
        debug!("No skin region left after cleanup");
        return HandExtraction::NoHandDetected {
            mask: GrayImage::new(width, height),
            skin,
        };
    };

    // Every contour point lies on its region, so any of them identifies it
    let labels = connected_components(&cleaned, Connectivity::Eight, Luma([0u8]));
    let hand_label = labels.get_pixel(start.x as u32, start.y as u32)[0];
    let region = map_colors(&labels, |l: Luma<u32>| {
        Luma([if l[0] == hand_label { ON } else { 0 }])
    });
    let silhouette = fill_holes(&region);

    let mask = erode(
        &silhouette,
        StructuringElement::square(params.erode_margin),
        params.erode_iterations,
        Border::Background,
    );
    debug!(
        regions = contours.len(),
        hand_area = contours[hand_idx].area(),
        silhouette_pixels = count_nonzero(&silhouette),
        mask_pixels = count_nonzero(&mask),
        "Hand mask extracted"
    );

    HandExtraction::Found(HandMask {
        mask,
        skin,
        silhouette,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mask::is_subset;
    use image::Rgb;

    const SKIN: Rgb<u8> = Rgb([200, 150, 120]);
    const BACKDROP: Rgb<u8> = Rgb([20, 40, 160]);

    fn found(extraction: HandExtraction) -> HandMask {
        match extraction {
            HandExtraction::Found(hand) => hand,
            HandExtraction::NoHandDetected { .. } => panic!("expected a hand"),
        }
    }

    #[test]
    fn test_full_frame_skin_shrinks_from_frame() {
        let rgb = RgbImage::from_pixel(60, 50, SKIN);
        let hand = found(extract_hand_mask(&rgb, &HandMaskParams::default()));
        assert_eq!(count_nonzero(&hand.silhouette), 60 * 50);
        // 8x8 kernel reaches 4 px left/up and 3 px right/down
        assert_eq!(hand.mask.get_pixel(4, 4)[0], 255);
        assert_eq!(hand.mask.get_pixel(3, 10)[0], 0);
        assert_eq!(hand.mask.get_pixel(10, 3)[0], 0);
        assert_eq!(hand.mask.get_pixel(56, 46)[0], 255);
        assert_eq!(hand.mask.get_pixel(57, 20)[0], 0);
        assert_eq!(hand.mask.get_pixel(20, 47)[0], 0);
        assert_eq!(count_nonzero(&hand.mask), 53 * 43);
    }

    #[test]
    fn test_largest_region_wins_and_holes_fill() {
        let mut rgb = RgbImage::from_pixel(80, 80, BACKDROP);
        // Big hand with a dark (non-skin) hole, plus a small skin blob
        for y in 10..60 {
            for x in 10..60 {
                rgb.put_pixel(x, y, SKIN);
            }
        }
        for y in 26..44 {
            for x in 26..44 {
                rgb.put_pixel(x, y, BACKDROP);
            }
        }
        for y in 70..76 {
            for x in 70..76 {
                rgb.put_pixel(x, y, SKIN);
            }
        }

        let hand = found(extract_hand_mask(&rgb, &HandMaskParams::default()));
        // Dilation alone does not close an 18 px hole
        assert_eq!(hand.skin.get_pixel(35, 35)[0], 0);
        assert_eq!(hand.silhouette.get_pixel(35, 35)[0], 255);
        assert_eq!(hand.silhouette.get_pixel(72, 72)[0], 0);
        assert_eq!(hand.mask.get_pixel(35, 35)[0], 255);
        assert!(is_subset(&hand.mask, &hand.silhouette));
        assert!(count_nonzero(&hand.mask) < count_nonzero(&hand.silhouette));
    }

    #[test]
    fn test_no_skin_signals_no_hand() {
        let rgb = RgbImage::from_pixel(40, 30, BACKDROP);
        match extract_hand_mask(&rgb, &HandMaskParams::default()) {
            HandExtraction::NoHandDetected { mask, skin } => {
                assert_eq!(mask.dimensions(), (40, 30));
                assert_eq!(count_nonzero(&mask), 0);
                assert_eq!(count_nonzero(&skin), 0);
            }
            HandExtraction::Found(_) => panic!("backdrop is not skin"),
        }
    }

    #[test]
    fn test_isolated_skin_pixel_is_noise() {
        let mut rgb = RgbImage::from_pixel(40, 40, BACKDROP);
        rgb.put_pixel(20, 20, SKIN);
        let mut params = HandMaskParams::default();
        params.dilate_iterations = 0;
        let extraction = extract_hand_mask(&rgb, &params);
        assert!(matches!(extraction, HandExtraction::NoHandDetected { .. }));
        assert_eq!(count_nonzero(extraction.mask()), 0);
    }

    #[test]
    fn test_hand_entering_from_left_edge() {
        let mut rgb = RgbImage::from_pixel(80, 60, BACKDROP);
        for y in 10..50 {
            for x in 0..50 {
                rgb.put_pixel(x, y, SKIN);
            }
        }

        let hand = found(extract_hand_mask(&rgb, &HandMaskParams::default()));
        assert_eq!(hand.silhouette.get_pixel(0, 30)[0], 255);
        assert_eq!(hand.silhouette.get_pixel(70, 30)[0], 0);
        // Erosion still pulls the mask off the frame
        assert_eq!(hand.mask.get_pixel(0, 30)[0], 0);
        assert_eq!(hand.mask.get_pixel(10, 30)[0], 255);
        assert!(is_subset(&hand.mask, &hand.silhouette));
    }
}

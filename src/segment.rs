//! Vein segmentation inside the hand region
//!
//! Veins show up as slightly darker strands under the skin. Local contrast
//! enhancement makes them stand out from the surrounding tissue, a light blur
//! removes pore-level texture, and an adaptive threshold keeps pixels that are
//! darker than their neighbourhood.

use image::{GrayImage, RgbImage};
use tracing::debug;

use crate::config::{EnhanceParams, ThresholdParams};
use crate::error::Result;
use crate::utils::binarization::adaptive_threshold_inv;
use crate::utils::enhance::clahe;
use crate::utils::filter::gaussian_blur;
use crate::utils::grayscale::rgb_to_grayscale;
use crate::utils::mask::{and, count_nonzero};
use crate::utils::morphology::{StructuringElement, close};

/// Output of vein segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct VeinSegmentation {
    /// Candidate vein pixels, always inside the hand mask
    pub vein_mask: GrayImage,
    /// Contrast-enhanced grayscale image
    pub enhanced: GrayImage,
}

/// Segment vein candidates of `rgb` inside `hand_mask`
///
/// Fails only when `hand_mask` does not match the image size.
pub fn segment_veins(
    rgb: &RgbImage,
    hand_mask: &GrayImage,
    enhance: &EnhanceParams,
    threshold: &ThresholdParams,
) -> Result<VeinSegmentation> {
    let gray = rgb_to_grayscale(rgb);
    let enhanced = clahe(&gray, enhance.clip_limit, enhance.tile_grid);
    let blurred = gaussian_blur(&enhanced, threshold.blur_kernel);
    let binary = adaptive_threshold_inv(&blurred, threshold.block_size, threshold.offset);
    debug!(
        candidates = count_nonzero(&binary),
        block_size = threshold.block_size,
        offset = threshold.offset,
        "Adaptive threshold applied"
    );

    let inside = and(&binary, hand_mask)?;
    let closed = close(&inside, StructuringElement::square(threshold.close_kernel));
    // Closing may bridge across the hand edge; re-clip so veins stay inside
    let vein_mask = and(&closed, hand_mask)?;
    debug!(vein_pixels = count_nonzero(&vein_mask), "Vein mask segmented");

    Ok(VeinSegmentation {
        vein_mask,
        enhanced,
    })
}

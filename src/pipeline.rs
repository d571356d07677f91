//! Full detection run
//!
//! One run goes through the stages in a fixed order:
//! hand mask -> vein segmentation -> statistics -> overlay.
//! Each stage produces new buffers, so a run either yields every output or
//! stops early without touching anything produced before it.

use image::{GrayImage, RgbImage};
use tracing::{debug, info, warn};

use crate::config::{StatisticsSource, VeinConfig};
use crate::error::{Result, VeinError};
use crate::hand::{HandExtraction, HandMask, extract_hand_mask};
use crate::models::Contour;
use crate::render::{ContourSelection, RejectedContour, draw_overlay, filter_contours};
use crate::segment::{VeinSegmentation, segment_veins};
use crate::stats::VeinStatistics;
use crate::utils::mask::count_nonzero;

/// Furthest stage reached by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PipelineStage {
    /// Nothing computed yet, or the input was rejected
    #[default]
    Idle,
    /// Hand mask available
    HandMaskComputed,
    /// Vein mask and enhanced image available
    VeinsSegmented,
    /// Statistics available
    StatsComputed,
    /// Overlay available; the run is complete
    Rendered,
}

/// Every output of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct VeinAnalysis {
    /// Eroded hand mask
    pub hand_mask: GrayImage,
    /// Raw skin band mask
    pub skin_mask: GrayImage,
    /// Filled hand region before erosion
    pub silhouette: GrayImage,
    /// Contrast-enhanced grayscale image
    pub enhanced: GrayImage,
    /// Candidate vein pixels
    pub vein_mask: GrayImage,
    /// Widened hand-edge band used to reject contours
    pub boundary: GrayImage,
    /// Contours drawn on the overlay
    pub accepted: Vec<Contour>,
    /// Contours left out of the overlay
    pub rejected: Vec<RejectedContour>,
    /// Vein statistics
    pub statistics: VeinStatistics,
    /// Original image with veins highlighted
    pub overlay: RgbImage,
}

/// Outcome of a run that was not aborted by an error
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// All stages ran
    Complete(VeinAnalysis),
    /// No skin region was found; later stages were skipped
    NoHandDetected {
        /// All-zero mask with the image's dimensions
        hand_mask: GrayImage,
    },
}

impl Detection {
    /// Stage the run stopped at
    pub fn stage(&self) -> PipelineStage {
        match self {
            Detection::Complete(_) => PipelineStage::Rendered,
            Detection::NoHandDetected { .. } => PipelineStage::HandMaskComputed,
        }
    }

    /// The analysis of a complete run
    pub fn analysis(&self) -> Option<&VeinAnalysis> {
        match self {
            Detection::Complete(analysis) => Some(analysis),
            Detection::NoHandDetected { .. } => None,
        }
    }

    /// Consume the detection, keeping the analysis of a complete run
    pub fn into_analysis(self) -> Option<VeinAnalysis> {
        match self {
            Detection::Complete(analysis) => Some(analysis),
            Detection::NoHandDetected { .. } => None,
        }
    }
}

/// Run every stage on `rgb`
///
/// Errors are reserved for input that cannot be processed at all: an image
/// with a zero dimension or a configuration that fails validation.
pub fn detect_veins(rgb: &RgbImage, config: &VeinConfig) -> Result<Detection> {
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(VeinError::EmptyImage {
            width: width as usize,
            height: height as usize,
        });
    }
    config.validate()?;
    debug!(width, height, "Starting vein detection");

    let HandMask {
        mask: hand_mask,
        skin: skin_mask,
        silhouette,
    } = match extract_hand_mask(rgb, &config.hand) {
        HandExtraction::Found(hand) => hand,
        HandExtraction::NoHandDetected { mask, .. } => {
            warn!(width, height, "No hand detected");
            return Ok(Detection::NoHandDetected { hand_mask: mask });
        }
    };
    debug!(
        stage = ?PipelineStage::HandMaskComputed,
        hand_pixels = count_nonzero(&hand_mask),
        "Hand mask ready"
    );

    let VeinSegmentation {
        vein_mask,
        enhanced,
    } = segment_veins(rgb, &hand_mask, &config.enhance, &config.threshold)?;
    debug!(
        stage = ?PipelineStage::VeinsSegmented,
        vein_pixels = count_nonzero(&vein_mask),
        "Veins segmented"
    );

    let ContourSelection {
        accepted,
        rejected,
        boundary,
    } = filter_contours(&vein_mask, &hand_mask, &config.render)?;
    let statistics = match config.statistics_source {
        StatisticsSource::AllContours => VeinStatistics::from_masks(&vein_mask, &hand_mask),
        StatisticsSource::AcceptedContours => {
            VeinStatistics::from_contours(&accepted, count_nonzero(&hand_mask))
        }
    };
    debug!(
        stage = ?PipelineStage::StatsComputed,
        veins = statistics.count(),
        "Statistics computed"
    );

    let overlay = draw_overlay(rgb, &accepted, &config.render);
    info!(
        width,
        height,
        veins = statistics.count(),
        accepted = accepted.len(),
        rejected = rejected.len(),
        "Vein detection complete"
    );

    Ok(Detection::Complete(VeinAnalysis {
        hand_mask,
        skin_mask,
        silhouette,
        enhanced,
        vein_mask,
        boundary,
        accepted,
        rejected,
        statistics,
        overlay,
    }))
}

//! vein_detect - Hand vein extraction from color photographs
//!
//! Finds the hand in an RGB image, segments the darker vein strands inside
//! it, measures them and highlights them on the original picture. The whole
//! run is a pure function of the image and a [`VeinConfig`]: no global
//! state, and the same input always gives the same output.
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use vein_detect::{Detection, VeinConfig, detect_veins};
//!
//! let image = RgbImage::from_pixel(64, 64, Rgb([200, 150, 120]));
//! match detect_veins(&image, &VeinConfig::default()).unwrap() {
//!     Detection::Complete(analysis) => println!("{}", analysis.statistics),
//!     Detection::NoHandDetected { .. } => println!("no hand"),
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Detection parameters and their validation
pub mod config;
/// Region extraction (external contours, connected components)
pub mod detector;
/// Error type
pub mod error;
/// Hand mask extraction
pub mod hand;
/// Core data structures (Contour, Point, HSV)
pub mod models;
/// Stage orchestration
pub mod pipeline;
/// Contour filtering and overlay rendering
pub mod render;
/// Vein segmentation
pub mod segment;
/// Vein statistics
pub mod stats;
/// Host-side helpers (image loading, dataset iteration, writing outputs)
pub mod tools;
/// Image primitives (color conversion, CLAHE, filtering, morphology)
pub mod utils;

pub use config::{
    EnhanceParams, HandMaskParams, RenderParams, StatisticsSource, ThresholdParams, VeinConfig,
};
pub use error::{Result, VeinError};
pub use models::{BoundingBox, Contour, Hsv, HsvRange, Point, PointI};
pub use pipeline::{Detection, PipelineStage, VeinAnalysis, detect_veins};
pub use render::{RejectedContour, Rejection};
pub use stats::{VeinStatistics, VeinSummary};

use image::RgbImage;
use utils::grayscale::gray_to_rgb;

/// Run detection on raw RGB bytes
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel, row-major)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `config` - Detection parameters
pub fn detect_veins_raw(
    image: &[u8],
    width: usize,
    height: usize,
    config: &VeinConfig,
) -> Result<Detection> {
    if width == 0 || height == 0 {
        return Err(VeinError::EmptyImage { width, height });
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .unwrap_or(usize::MAX);
    let size_error = VeinError::BufferSize {
        expected,
        actual: image.len(),
    };
    if image.len() != expected {
        return Err(size_error);
    }
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(size_error),
    };
    let rgb = RgbImage::from_raw(w, h, image.to_vec()).ok_or(size_error)?;
    detect_veins(&rgb, config)
}

/// Buffer shown by [`VeinDetector::view`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// The analysed image
    Original,
    /// Contrast-enhanced grayscale
    Enhanced,
    /// Binary vein mask
    VeinMask,
    /// Original with veins highlighted
    Overlay,
}

/// Detector that keeps the result of its last complete run
///
/// A run that finds no hand, or fails, leaves the previous result in place.
pub struct VeinDetector {
    config: VeinConfig,
    last: Option<(RgbImage, VeinAnalysis)>,
    last_stage: PipelineStage,
}

impl VeinDetector {
    /// Create a detector with the given parameters
    pub fn new(config: VeinConfig) -> Self {
        Self {
            config,
            last: None,
            last_stage: PipelineStage::Idle,
        }
    }

    /// Current parameters
    pub fn config(&self) -> &VeinConfig {
        &self.config
    }

    /// Replace the parameters used by later runs
    pub fn set_config(&mut self, config: VeinConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Analyse `image`
    ///
    /// Returns the new analysis, or `None` when no hand was found.
    pub fn run(&mut self, image: &RgbImage) -> Result<Option<&VeinAnalysis>> {
        let detection = match detect_veins(image, &self.config) {
            Ok(detection) => detection,
            Err(e) => {
                self.last_stage = PipelineStage::Idle;
                return Err(e);
            }
        };
        self.last_stage = detection.stage();

        match detection {
            Detection::Complete(analysis) => {
                self.last = Some((image.clone(), analysis));
                Ok(self.last.as_ref().map(|(_, analysis)| analysis))
            }
            Detection::NoHandDetected { .. } => Ok(None),
        }
    }

    /// Stage reached by the most recent run
    pub fn last_stage(&self) -> PipelineStage {
        self.last_stage
    }

    /// Result of the last complete run
    pub fn analysis(&self) -> Option<&VeinAnalysis> {
        self.last.as_ref().map(|(_, analysis)| analysis)
    }

    /// RGB rendering of one buffer of the last complete run
    pub fn view(&self, view: View) -> Option<RgbImage> {
        let (image, analysis) = self.last.as_ref()?;
        Some(match view {
            View::Original => image.clone(),
            View::Enhanced => gray_to_rgb(&analysis.enhanced),
            View::VeinMask => gray_to_rgb(&analysis.vein_mask),
            View::Overlay => analysis.overlay.clone(),
        })
    }
}

impl Default for VeinDetector {
    fn default() -> Self {
        Self::new(VeinConfig::default())
    }
}

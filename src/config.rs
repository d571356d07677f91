//! Detection parameters.
//!
//! Every tunable value of the pipeline lives in [`VeinConfig`]. The struct is
//! immutable from the pipeline's point of view: it is borrowed per run and
//! never stored globally, so two runs with equal configs and equal images
//! produce identical outputs.

use crate::error::{Result, VeinError};
use crate::models::{Hsv, HsvRange};

/// Largest kernel, window or block side accepted by [`VeinConfig::validate`]
pub const MAX_KERNEL: u32 = 255;
/// Largest number of morphology passes
pub const MAX_ITERATIONS: u32 = 32;
/// Largest CLAHE tile count along one axis
pub const MAX_TILES: u32 = 64;

/// Skin segmentation and hand-silhouette cleanup.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HandMaskParams {
    /// Inclusive HSV band classified as skin (OpenCV 8-bit HSV convention).
    pub skin: HsvRange,
    /// Side of the square dilation kernel applied to the raw skin mask.
    pub dilate_kernel: u32,
    /// Number of dilation passes.
    pub dilate_iterations: u32,
    /// Side of the square median window used to drop isolated pixels.
    pub median_window: u32,
    /// Side of the square kernel used to shrink the filled silhouette.
    ///
    /// Pulling the boundary inward keeps skin folds at the true hand edge out
    /// of the vein analysis.
    pub erode_margin: u32,
    /// Number of erosion passes.
    pub erode_iterations: u32,
}

impl Default for HandMaskParams {
    fn default() -> Self {
        Self {
            skin: HsvRange::new(Hsv::new(0, 20, 70), Hsv::new(20, 255, 255)),
            dilate_kernel: 5,
            dilate_iterations: 2,
            median_window: 5,
            erode_margin: 8,
            erode_iterations: 1,
        }
    }
}

/// Local contrast enhancement (CLAHE).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Histogram clip limit, relative to a uniform histogram.
    pub clip_limit: f32,
    /// Number of tiles along x and y.
    pub tile_grid: [u32; 2],
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_grid: [8, 8],
        }
    }
}

/// Smoothing, adaptive binarization and gap closing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    /// Gaussian kernel side (odd).
    pub blur_kernel: u32,
    /// Side of the neighbourhood used for the local mean (odd, >= 3).
    pub block_size: u32,
    /// A pixel is a vein candidate when it is at least this much darker than
    /// its local mean.
    pub offset: i32,
    /// Side of the square closing kernel that bridges gaps in vein strands.
    pub close_kernel: u32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            block_size: 15,
            offset: 10,
            close_kernel: 3,
        }
    }
}

/// Contour filtering and overlay rendering.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Contours larger than this fraction of the image area are rejected.
    pub max_area_ratio: f64,
    /// Side of the square kernel used to widen hand-mask edges into the
    /// boundary tolerance band.
    pub boundary_margin: u32,
    /// Low hysteresis threshold for hand-mask edge detection.
    pub canny_low: f32,
    /// High hysteresis threshold for hand-mask edge detection.
    pub canny_high: f32,
    /// Contours whose bounding box comes within this many pixels of the image
    /// frame are rejected. Zero disables the check.
    pub frame_margin: u32,
    /// Outline stroke width in pixels, used both for the boundary test and
    /// for drawing.
    pub stroke_width: u32,
    /// RGB color of accepted vein outlines.
    pub highlight: [u8; 3],
    /// Weight of the annotated copy in the final blend; the original gets
    /// `1 - blend`.
    pub blend: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            max_area_ratio: 0.15,
            boundary_margin: 8,
            canny_low: 100.0,
            canny_high: 200.0,
            frame_margin: 0,
            stroke_width: 2,
            highlight: [0, 255, 0],
            blend: 0.6,
        }
    }
}

/// Which contours feed the statistics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsSource {
    /// Every external contour of the vein mask, including ones the renderer
    /// rejects as artifacts.
    #[default]
    AllContours,
    /// Only contours that survive area, frame and boundary filtering.
    AcceptedContours,
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VeinConfig {
    /// Hand mask extraction.
    pub hand: HandMaskParams,
    /// Contrast enhancement.
    pub enhance: EnhanceParams,
    /// Binarization.
    pub threshold: ThresholdParams,
    /// Contour filtering and overlay.
    pub render: RenderParams,
    /// Contour set used for statistics.
    pub statistics_source: StatisticsSource,
}

impl VeinConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VeinError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter can be executed.
    pub fn validate(&self) -> Result<()> {
        let hand = &self.hand;
        let skin = &hand.skin;
        if skin.lower.h > skin.upper.h || skin.lower.s > skin.upper.s || skin.lower.v > skin.upper.v
        {
            return Err(VeinError::config(format!(
                "skin lower bound {:?} exceeds upper bound {:?}",
                skin.lower, skin.upper
            )));
        }
        kernel("hand.dilate_kernel", hand.dilate_kernel)?;
        kernel("hand.erode_margin", hand.erode_margin)?;
        kernel("hand.median_window", hand.median_window)?;
        odd("hand.median_window", hand.median_window)?;
        at_most("hand.dilate_iterations", hand.dilate_iterations, MAX_ITERATIONS)?;
        at_most("hand.erode_iterations", hand.erode_iterations, MAX_ITERATIONS)?;

        let enhance = &self.enhance;
        if !(enhance.clip_limit.is_finite() && enhance.clip_limit > 0.0) {
            return Err(VeinError::config(format!(
                "enhance.clip_limit must be positive, got {}",
                enhance.clip_limit
            )));
        }
        positive("enhance.tile_grid[0]", enhance.tile_grid[0])?;
        positive("enhance.tile_grid[1]", enhance.tile_grid[1])?;
        at_most("enhance.tile_grid[0]", enhance.tile_grid[0], MAX_TILES)?;
        at_most("enhance.tile_grid[1]", enhance.tile_grid[1], MAX_TILES)?;

        let threshold = &self.threshold;
        odd("threshold.blur_kernel", threshold.blur_kernel)?;
        at_most("threshold.blur_kernel", threshold.blur_kernel, MAX_KERNEL)?;
        odd("threshold.block_size", threshold.block_size)?;
        if threshold.block_size < 3 {
            return Err(VeinError::config("threshold.block_size must be at least 3"));
        }
        at_most("threshold.block_size", threshold.block_size, MAX_KERNEL)?;
        kernel("threshold.close_kernel", threshold.close_kernel)?;

        let render = &self.render;
        if !(render.max_area_ratio > 0.0 && render.max_area_ratio <= 1.0) {
            return Err(VeinError::config(format!(
                "render.max_area_ratio must be in (0, 1], got {}",
                render.max_area_ratio
            )));
        }
        kernel("render.boundary_margin", render.boundary_margin)?;
        kernel("render.stroke_width", render.stroke_width)?;
        if !(render.canny_low >= 0.0 && render.canny_low <= render.canny_high) {
            return Err(VeinError::config(format!(
                "render canny thresholds must satisfy 0 <= low <= high, got {}/{}",
                render.canny_low, render.canny_high
            )));
        }
        if !(0.0..=1.0).contains(&render.blend) {
            return Err(VeinError::config(format!(
                "render.blend must be in [0, 1], got {}",
                render.blend
            )));
        }

        Ok(())
    }
}

fn positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(VeinError::config(format!("{name} must be positive")));
    }
    Ok(())
}

fn at_most(name: &str, value: u32, max: u32) -> Result<()> {
    if value > max {
        return Err(VeinError::config(format!(
            "{name} must be at most {max}, got {value}"
        )));
    }
    Ok(())
}

fn kernel(name: &str, value: u32) -> Result<()> {
    positive(name, value)?;
    at_most(name, value, MAX_KERNEL)
}

fn odd(name: &str, value: u32) -> Result<()> {
    if value % 2 == 0 {
        return Err(VeinError::config(format!("{name} must be odd, got {value}")));
    }
    Ok(())
}

//! Host-side helpers shared by the CLI and benches
//!
//! Nothing in here is needed by the detection itself; these functions deal
//! with files, environment variables and summaries for humans.

use crate::utils::mask::count_nonzero;
use crate::{VeinAnalysis, VeinConfig, VeinError, VeinStatistics};
use image::{GenericImageView, GrayImage, RgbImage};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the host helpers
#[derive(Debug, Error)]
pub enum ToolError {
    /// Reading or writing a file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Decoding or encoding an image failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// Serializing statistics failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The detection library rejected its input
    #[error(transparent)]
    Vein(#[from] VeinError),
}

fn max_dim_from_env() -> Option<u32> {
    match env::var("VEIN_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image as RGB, downscaled to `VEIN_MAX_DIM` when that is set.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, ToolError> {
    let img = image::open(path)?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    Ok(rgb)
}

/// Load a JSON config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<VeinConfig, ToolError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(VeinConfig::from_json(&json)?)
        }
        None => Ok(VeinConfig::default()),
    }
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskStats {
    /// Count of set pixels.
    pub set_pixels: u64,
    /// Total pixels in the mask.
    pub total_pixels: u64,
    /// Ratio of set pixels to total pixels.
    pub set_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &GrayImage) -> GrayStats {
    let data = gray.as_raw();
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in data {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    if data.is_empty() {
        return GrayStats { min: 0, max: 0, avg: 0 };
    }
    GrayStats {
        min,
        max,
        avg: (sum / data.len() as u64) as u8,
    }
}

/// Compute set pixel stats for a binary mask.
pub fn mask_stats(mask: &GrayImage) -> MaskStats {
    let set = count_nonzero(mask);
    let total = mask.width() as u64 * mask.height() as u64;
    let ratio = if total == 0 {
        0.0
    } else {
        set as f64 / total as f64
    };
    MaskStats {
        set_pixels: set,
        total_pixels: total,
        set_ratio: ratio,
    }
}

/// Write the masks and overlay of `analysis` as PNG files into `dir`.
///
/// Returns the written paths in a fixed order: hand mask, enhanced image,
/// vein mask, overlay.
pub fn write_outputs<P: AsRef<Path>>(
    dir: P,
    analysis: &VeinAnalysis,
) -> Result<Vec<PathBuf>, ToolError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let hand = dir.join("hand_mask.png");
    analysis.hand_mask.save(&hand)?;
    let enhanced = dir.join("enhanced.png");
    analysis.enhanced.save(&enhanced)?;
    let veins = dir.join("vein_mask.png");
    analysis.vein_mask.save(&veins)?;
    let overlay = dir.join("overlay.png");
    analysis.overlay.save(&overlay)?;

    Ok(vec![hand, enhanced, veins, overlay])
}

/// Write `statistics` as pretty-printed JSON.
pub fn write_stats_json<P: AsRef<Path>>(
    path: P,
    statistics: &VeinStatistics,
) -> Result<(), ToolError> {
    let json = serde_json::to_string_pretty(statistics)?;
    fs::write(path, json)?;
    Ok(())
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("VEIN_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/hands"))
}

/// Smoke test flag from environment variables.
pub fn smoke_from_env() -> bool {
    matches!(
        env::var("VEIN_SMOKE").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// Iterate dataset image paths with optional smoke list and limit.
///
/// With `smoke` set, `_smoke.txt` in the root lists the images to use, one
/// path per line relative to the root; the full tree is used when the list
/// is missing or names no existing file.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
    smoke: bool,
) -> impl Iterator<Item = PathBuf> {
    let root = root.as_ref();
    let mut images = if smoke {
        load_smoke_list(root).unwrap_or_else(|| collect_images(root))
    } else {
        collect_images(root)
    };

    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn load_smoke_list(root: &Path) -> Option<Vec<PathBuf>> {
    let smoke_path = root.join("_smoke.txt");
    let contents = fs::read_to_string(&smoke_path).ok()?;
    let mut paths = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let candidate = Path::new(line);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            root.join(candidate)
        };
        if path.exists() {
            paths.push(path);
        }
    }
    if paths.is_empty() { None } else { Some(paths) }
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff") {
                    images.push(path);
                }
            }
        }
    }

    images
}

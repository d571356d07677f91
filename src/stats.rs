//! Vein statistics
//!
//! Aggregates the geometry of the vein contours into a single record. The
//! record is either fully populated or the [`VeinStatistics::NoVeinsDetected`]
//! sentinel; there is no partially filled state.

use std::fmt;

use image::GrayImage;

use crate::detector::contours::{find_external_contours, largest_contour};
use crate::models::{Contour, PointI};
use crate::utils::mask::count_nonzero;

/// Aggregate measurements over a non-empty set of vein contours.
///
/// Areas are in px², perimeters in px.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VeinSummary {
    /// Number of contours
    pub count: usize,
    /// Sum of contour areas
    pub total_area: f64,
    /// Mean contour area
    pub average_area: f64,
    /// Largest contour area
    pub max_area: f64,
    /// Sum of contour perimeters
    pub total_perimeter: f64,
    /// Mean contour perimeter
    pub average_perimeter: f64,
    /// Longest contour perimeter
    pub max_perimeter: f64,
    /// Perimeter of the largest-area contour
    pub largest_perimeter: f64,
    /// Centroid of the largest-area contour, `(0, 0)` when its area is zero
    pub largest_centroid: PointI,
    /// Hand mask pixel count
    pub hand_area: u64,
    /// Total vein area as a percentage of the hand area, 0 without a hand
    pub vein_percentage: f64,
}

/// Statistics of one detection run
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VeinStatistics {
    /// The vein mask has no contours
    NoVeinsDetected,
    /// At least one contour was measured
    Measured(VeinSummary),
}

impl VeinStatistics {
    /// Measure the external contours of `vein_mask` against `hand_mask`
    pub fn from_masks(vein_mask: &GrayImage, hand_mask: &GrayImage) -> Self {
        let contours = find_external_contours(vein_mask);
        Self::from_contours(&contours, count_nonzero(hand_mask))
    }

    /// Measure an arbitrary contour set against a hand of `hand_area` pixels
    pub fn from_contours(contours: &[Contour], hand_area: u64) -> Self {
        let Some(largest) = largest_contour(contours) else {
            return VeinStatistics::NoVeinsDetected;
        };

        let areas: Vec<f64> = contours.iter().map(Contour::area).collect();
        let perimeters: Vec<f64> = contours.iter().map(Contour::perimeter).collect();
        let count = contours.len();
        let total_area: f64 = areas.iter().sum();
        let total_perimeter: f64 = perimeters.iter().sum();

        let vein_percentage = if hand_area > 0 {
            100.0 * total_area / hand_area as f64
        } else {
            0.0
        };

        VeinStatistics::Measured(VeinSummary {
            count,
            total_area,
            average_area: total_area / count as f64,
            max_area: areas[largest],
            total_perimeter,
            average_perimeter: total_perimeter / count as f64,
            max_perimeter: perimeters.iter().copied().fold(0.0, f64::max),
            largest_perimeter: perimeters[largest],
            largest_centroid: contours[largest].centroid_or_origin(),
            hand_area,
            vein_percentage,
        })
    }

    /// The measurements, `None` for the sentinel
    pub fn summary(&self) -> Option<&VeinSummary> {
        match self {
            VeinStatistics::NoVeinsDetected => None,
            VeinStatistics::Measured(summary) => Some(summary),
        }
    }

    /// Number of measured contours
    pub fn count(&self) -> usize {
        self.summary().map_or(0, |s| s.count)
    }
}

impl fmt::Display for VeinStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VeinStatistics::NoVeinsDetected => return writeln!(f, "No veins detected."),
            VeinStatistics::Measured(s) => s,
        };
        writeln!(f, "Total veins detected: {}", s.count)?;
        writeln!(f, "Largest vein area: {:.2} px²", s.max_area)?;
        writeln!(f, "Largest vein perimeter: {:.2} px", s.largest_perimeter)?;
        writeln!(f, "Longest vein perimeter: {:.2} px", s.max_perimeter)?;
        writeln!(f, "Average vein area: {:.2} px²", s.average_area)?;
        writeln!(f, "Average vein perimeter: {:.2} px", s.average_perimeter)?;
        writeln!(f, "Total vein area: {:.2} px²", s.total_area)?;
        writeln!(f, "Total vein perimeter: {:.2} px", s.total_perimeter)?;
        if s.hand_area > 0 {
            writeln!(f, "Total vein area / hand: {:.2}%", s.vein_percentage)?;
        }
        writeln!(
            f,
            "Largest vein centroid: ({}, {})",
            s.largest_centroid.x, s.largest_centroid.y
        )
    }
}

//! Contour filtering and overlay rendering
//!
//! Not every dark strand inside the hand is a vein. Contours that cover a
//! large part of the image are shadows or background leaks, and contours
//! whose outline reaches the hand edge are usually skin folds. Those are
//! rejected; the rest are outlined on top of the original image.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{
    BresenhamLineIter, draw_antialiased_line_segment_mut, draw_filled_circle_mut,
};
use imageproc::edges::canny;
use imageproc::map::map_colors2;
use imageproc::pixelops::interpolate;
use tracing::debug;

use crate::config::RenderParams;
use crate::detector::contours::find_external_contours;
use crate::error::{Result, VeinError};
use crate::models::{Contour, PointI};
use crate::utils::mask::ON;
use crate::utils::morphology::{StructuringElement, dilate};

/// Why a contour was left out of the overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Enclosed area above the configured fraction of the image
    TooLarge {
        /// Contour area
        area: f64,
        /// Largest accepted area
        limit: f64,
    },
    /// Bounding box closer to the image frame than allowed
    NearFrame {
        /// Pixels between the box and the nearest image edge
        distance: i32,
    },
    /// Outline overlaps the band around the hand boundary
    TouchesHandBoundary,
}

/// A contour that did not make it into the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedContour {
    /// The contour itself
    pub contour: Contour,
    /// First check it failed
    pub reason: Rejection,
}

/// Output of the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Original image with accepted contours blended in
    pub overlay: RgbImage,
    /// Contours drawn on the overlay
    pub accepted: Vec<Contour>,
    /// Contours left out, with the reason
    pub rejected: Vec<RejectedContour>,
    /// Widened hand-edge band used for the boundary check
    pub boundary: GrayImage,
}

/// Widened edges of the hand mask
pub fn boundary_band(hand_mask: &GrayImage, params: &RenderParams) -> GrayImage {
    let edges = canny(hand_mask, params.canny_low, params.canny_high);
    dilate(&edges, StructuringElement::square(params.boundary_margin), 1)
}

/// Closed outline of `contour` rasterized into a window around its bounding
/// box, grown by the stroke radius. Returns the window's top-left corner in
/// image coordinates and the window.
fn stroke_window(contour: &Contour, stroke_width: u32) -> Option<(PointI, GrayImage)> {
    let bbox = contour.bounding_box()?;
    let radius = stroke_width / 2;
    let origin = PointI::new(bbox.min_x - radius as i32, bbox.min_y - radius as i32);
    let mut window = GrayImage::new(bbox.width() + 2 * radius, bbox.height() + 2 * radius);
    let (win_w, win_h) = window.dimensions();
    let simplified = contour.simplify();
    let points = simplified.points();

    let mut stamp = |x: i32, y: i32| {
        let (x, y) = (x - origin.x, y - origin.y);
        if radius == 0 {
            if x >= 0 && y >= 0 && (x as u32) < win_w && (y as u32) < win_h {
                window.put_pixel(x as u32, y as u32, Luma([ON]));
            }
        } else {
            draw_filled_circle_mut(&mut window, (x, y), radius as i32, Luma([ON]));
        }
    };

    match points {
        [] => {}
        [p] => stamp(p.x, p.y),
        _ => {
            let n = points.len();
            for i in 0..n {
                let a = points[i];
                let b = points[(i + 1) % n];
                let line =
                    BresenhamLineIter::new((a.x as f32, a.y as f32), (b.x as f32, b.y as f32));
                for (x, y) in line {
                    stamp(x, y);
                }
            }
        }
    }

    Some((origin, window))
}

/// Image coordinates of the set pixels of a stroke window that fall inside a
/// `width x height` image
fn stroke_pixels(
    origin: PointI,
    window: &GrayImage,
    width: u32,
    height: u32,
) -> impl Iterator<Item = (u32, u32)> + '_ {
    window.enumerate_pixels().filter_map(move |(x, y, p)| {
        let (ix, iy) = (origin.x + x as i32, origin.y + y as i32);
        let inside = ix >= 0 && iy >= 0 && (ix as u32) < width && (iy as u32) < height;
        (p[0] != 0 && inside).then_some((ix as u32, iy as u32))
    })
}

/// Rasterize the closed outline of `contour` with the given stroke width
pub fn stroke_mask(contour: &Contour, width: u32, height: u32, stroke_width: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if let Some((origin, window)) = stroke_window(contour, stroke_width) {
        for (x, y) in stroke_pixels(origin, &window, width, height) {
            mask.put_pixel(x, y, Luma([ON]));
        }
    }
    mask
}

/// True when the outline of `contour` covers a set pixel of `band`
fn stroke_touches(contour: &Contour, band: &GrayImage, stroke_width: u32) -> bool {
    let Some((origin, window)) = stroke_window(contour, stroke_width) else {
        return false;
    };
    let (width, height) = band.dimensions();
    stroke_pixels(origin, &window, width, height).any(|(x, y)| band.get_pixel(x, y)[0] != 0)
}

/// Decide whether `contour` belongs on the overlay
fn check(
    contour: &Contour,
    dims: (u32, u32),
    boundary: &GrayImage,
    params: &RenderParams,
) -> Option<Rejection> {
    let (width, height) = dims;

    let area = contour.area();
    let limit = params.max_area_ratio * width as f64 * height as f64;
    if area > limit {
        return Some(Rejection::TooLarge { area, limit });
    }

    if params.frame_margin > 0 {
        if let Some(bbox) = contour.bounding_box() {
            let distance = bbox.frame_distance(width, height);
            if distance < params.frame_margin as i32 {
                return Some(Rejection::NearFrame { distance });
            }
        }
    }

    if stroke_touches(contour, boundary, params.stroke_width) {
        return Some(Rejection::TouchesHandBoundary);
    }

    None
}

/// Draw `contour` anti-aliased with a square brush of `stroke_width`
fn draw_contour(canvas: &mut RgbImage, contour: &Contour, color: Rgb<u8>, stroke_width: u32) {
    let simplified = contour.simplify();
    let points = simplified.points();
    let low = -((stroke_width / 2) as i32);
    let high = low + stroke_width.max(1) as i32;

    for dy in low..high {
        for dx in low..high {
            let n = points.len();
            for i in 0..n {
                let a = points[i];
                let b = points[(i + 1) % n];
                draw_antialiased_line_segment_mut(
                    canvas,
                    (a.x + dx, a.y + dy),
                    (b.x + dx, b.y + dy),
                    color,
                    interpolate,
                );
            }
        }
    }
}

/// Accepted and rejected contours of a vein mask
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSelection {
    /// Contours that pass every check
    pub accepted: Vec<Contour>,
    /// Contours left out, with the reason
    pub rejected: Vec<RejectedContour>,
    /// Widened hand-edge band used for the boundary check
    pub boundary: GrayImage,
}

fn same_size(dims: (u32, u32), mask: &GrayImage) -> Result<()> {
    if mask.dimensions() != dims {
        return Err(VeinError::DimensionMismatch {
            left: dims,
            right: mask.dimensions(),
        });
    }
    Ok(())
}

/// Split the external contours of `vein_mask` into accepted and rejected
pub fn filter_contours(
    vein_mask: &GrayImage,
    hand_mask: &GrayImage,
    params: &RenderParams,
) -> Result<ContourSelection> {
    let dims = vein_mask.dimensions();
    same_size(dims, hand_mask)?;

    let boundary = boundary_band(hand_mask, params);
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for contour in find_external_contours(vein_mask) {
        match check(&contour, dims, &boundary, params) {
            Some(reason) => rejected.push(RejectedContour { contour, reason }),
            None => accepted.push(contour),
        }
    }
    debug!(
        accepted = accepted.len(),
        rejected = rejected.len(),
        "Vein contours filtered"
    );

    Ok(ContourSelection {
        accepted,
        rejected,
        boundary,
    })
}

/// Outline `contours` on a copy of `rgb` and blend it with the original
pub fn draw_overlay(rgb: &RgbImage, contours: &[Contour], params: &RenderParams) -> RgbImage {
    let color = Rgb(params.highlight);
    let mut annotated = rgb.clone();
    for contour in contours {
        draw_contour(&mut annotated, contour, color, params.stroke_width);
    }

    let alpha = params.blend;
    map_colors2(&annotated, rgb, |a: Rgb<u8>, o: Rgb<u8>| {
        let mix = |x: u8, y: u8| {
            (x as f32 * alpha + y as f32 * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb([mix(a[0], o[0]), mix(a[1], o[1]), mix(a[2], o[2])])
    })
}

/// Filter the contours of `vein_mask` and blend the survivors onto `rgb`
pub fn render_overlay(
    rgb: &RgbImage,
    vein_mask: &GrayImage,
    hand_mask: &GrayImage,
    params: &RenderParams,
) -> Result<RenderOutput> {
    same_size(rgb.dimensions(), vein_mask)?;
    let ContourSelection {
        accepted,
        rejected,
        boundary,
    } = filter_contours(vein_mask, hand_mask, params)?;
    let overlay = draw_overlay(rgb, &accepted, params);

    Ok(RenderOutput {
        overlay,
        accepted,
        rejected,
        boundary,
    })
}

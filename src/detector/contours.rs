//! External contour extraction from binary masks

use image::GrayImage;
use image::imageops::replace;
use imageproc::contours::{BorderType, find_contours};

use crate::models::{Contour, PointI};

/// Outer borders of every top-level region in `mask`.
///
/// Regions nested inside holes of other regions are skipped, as are hole
/// borders. Any non-zero pixel counts as foreground; connectivity is
/// 8-neighbour. Regions touching the image frame are traced like any other.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // The tracer only starts an outer border after a background pixel, so
    // frame the mask with one pixel of background
    let mut padded = GrayImage::new(width + 2, height + 2);
    replace(&mut padded, mask, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points = c
                .points
                .into_iter()
                .map(|p| PointI::new(p.x - 1, p.y - 1))
                .collect();
            Contour::new(points)
        })
        .collect()
}

/// Index of the contour with the largest area, first one wins on ties
pub fn largest_contour(contours: &[Contour]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in contours.iter().enumerate() {
        let area = c.area();
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((i, area)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            Luma([if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_empty_mask_has_no_contours() {
        assert!(find_external_contours(&GrayImage::new(10, 10)).is_empty());
        assert!(find_external_contours(&GrayImage::new(0, 0)).is_empty());
    }

    #[test]
    fn test_rectangle_area() {
        let mask = rect_mask(20, 20, 5, 5, 14, 9);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        // Polygon through pixel centres: 9 x 4
        assert!((contours[0].area() - 36.0).abs() < 1e-9);
        assert!((contours[0].perimeter() - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_nested_region_is_skipped() {
        // Ring with an island in its hole
        let mut mask = rect_mask(30, 30, 2, 2, 27, 27);
        for y in 5..=24 {
            for x in 5..=24 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        for y in 12..=16 {
            for x in 12..=16 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 625.0).abs() < 1e-9);
    }

    #[test]
    fn test_largest_contour() {
        let mut mask = rect_mask(40, 20, 2, 2, 5, 5);
        for y in 8..=15 {
            for x in 20..=35 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 2);
        let idx = largest_contour(&contours).unwrap();
        assert!((contours[idx].area() - 15.0 * 7.0).abs() < 1e-9);
        assert_eq!(largest_contour(&[]), None);
    }

    #[test]
    fn test_region_filling_the_frame() {
        let mask = GrayImage::from_pixel(64, 64, Luma([255]));
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 63.0 * 63.0).abs() < 1e-9);
        let bbox = contours[0].bounding_box().unwrap();
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (0, 0, 63, 63));
    }

    #[test]
    fn test_region_flush_with_left_edge() {
        let mut mask = rect_mask(20, 20, 0, 5, 9, 9);
        // Second region touching the left edge on only some rows
        for y in 12..=16 {
            mask.put_pixel(0, y, Luma([255]));
            mask.put_pixel(1, y, Luma([255]));
        }
        mask.put_pixel(2, 14, Luma([255]));

        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 2);
        let idx = largest_contour(&contours).unwrap();
        assert!((contours[idx].area() - 36.0).abs() < 1e-9);
        assert!(contours.iter().all(|c| c.points().iter().all(|p| p.x >= 0 && p.y >= 0)));
    }
}

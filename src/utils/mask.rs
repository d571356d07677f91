//! Set operations on binary masks (0 = excluded, 255 = included)

use crate::error::{Result, VeinError};
use image::{GrayImage, Luma};
use imageproc::map::map_colors;
use imageproc::region_labelling::{Connectivity, connected_components};
use std::collections::HashSet;

/// Foreground value written to masks
pub const ON: u8 = 255;

fn same_size(a: &GrayImage, b: &GrayImage) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(VeinError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }
    Ok(())
}

/// Keep pixels of `image` where `mask` is set
pub fn and(image: &GrayImage, mask: &GrayImage) -> Result<GrayImage> {
    same_size(image, mask)?;
    let mut out = image.clone();
    for (dst, m) in out.pixels_mut().zip(mask.pixels()) {
        if m[0] == 0 {
            dst[0] = 0;
        }
    }
    Ok(out)
}

/// Number of non-zero pixels
pub fn count_nonzero(mask: &GrayImage) -> u64 {
    mask.as_raw().iter().filter(|&&v| v != 0).count() as u64
}

/// True when every set pixel of `inner` is also set in `outer`
pub fn is_subset(inner: &GrayImage, outer: &GrayImage) -> bool {
    inner.dimensions() == outer.dimensions()
        && inner
            .as_raw()
            .iter()
            .zip(outer.as_raw())
            .all(|(&i, &o)| i == 0 || o != 0)
}

/// True when any pixel is set in both masks
pub fn intersects(a: &GrayImage, b: &GrayImage) -> bool {
    a.as_raw()
        .iter()
        .zip(b.as_raw())
        .any(|(&x, &y)| x != 0 && y != 0)
}

/// Set every background pixel that cannot reach the image frame.
///
/// Background connectivity is 4-neighbour, which pairs with the 8-neighbour
/// foreground used for contour tracing: a hole is enclosed exactly when its
/// outer contour surrounds it.
pub fn fill_holes(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return mask.clone();
    }

    let background = map_colors(mask, |p: Luma<u8>| Luma([if p[0] == 0 { ON } else { 0 }]));
    let labels = connected_components(&background, Connectivity::Four, Luma([0u8]));

    let mut outside = HashSet::new();
    for x in 0..width {
        outside.insert(labels.get_pixel(x, 0)[0]);
        outside.insert(labels.get_pixel(x, height - 1)[0]);
    }
    for y in 0..height {
        outside.insert(labels.get_pixel(0, y)[0]);
        outside.insert(labels.get_pixel(width - 1, y)[0]);
    }
    outside.remove(&0);

    map_colors(&labels, |l: Luma<u32>| {
        Luma([if outside.contains(&l[0]) { 0 } else { ON }])
    })
}

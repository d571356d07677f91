//! Contrast-limited adaptive histogram equalization (CLAHE)
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram; the excess
//! counts above the clip limit are spread back over all bins so that flat
//! regions are not blown up. Output pixels blend the four nearest tile
//! tables bilinearly, which hides the tile seams.
//!
//! When the image size is not a multiple of the grid, tiles are sized for
//! the next multiple and read the missing pixels through a mirrored border.

use super::reflect101;
use image::GrayImage;

const HIST_SIZE: usize = 256;

fn clip_histogram(hist: &mut [u32; HIST_SIZE], clip: u32) {
    let mut clipped = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            clipped += *bin - clip;
            *bin = clip;
        }
    }

    let batch = clipped / HIST_SIZE as u32;
    let mut residual = clipped - batch * HIST_SIZE as u32;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (HIST_SIZE / residual as usize).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Build one tile's equalization table
fn tile_lut(hist: &[u32; HIST_SIZE], tile_area: u32) -> [u8; HIST_SIZE] {
    let scale = 255.0f32 / tile_area as f32;
    let mut lut = [0u8; HIST_SIZE];
    let mut sum = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        sum += count;
        lut[i] = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Equalize `gray` tile by tile with a clipped histogram
///
/// `clip_limit` is relative to a uniform histogram (2.0 allows each bin twice
/// the average count). `tiles` is the grid size `[columns, rows]`.
pub fn clahe(gray: &GrayImage, clip_limit: f32, tiles: [u32; 2]) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let tiles_x = tiles[0].max(1) as usize;
    let tiles_y = tiles[1].max(1) as usize;
    let (w, h) = (width as usize, height as usize);
    let padded_w = w.div_ceil(tiles_x) * tiles_x;
    let padded_h = h.div_ceil(tiles_y) * tiles_y;
    let tile_w = padded_w / tiles_x;
    let tile_h = padded_h / tiles_y;
    let tile_area = (tile_w * tile_h) as u32;

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f32 / HIST_SIZE as f32) as u32).max(1)
    } else {
        u32::MAX
    };

    let src = gray.as_raw();
    let mut luts = vec![[0u8; HIST_SIZE]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0u32; HIST_SIZE];
            for py in ty * tile_h..(ty + 1) * tile_h {
                let sy = reflect101(py as i64, h as i64);
                for px in tx * tile_w..(tx + 1) * tile_w {
                    let sx = reflect101(px as i64, w as i64);
                    hist[src[sy * w + sx] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);
            luts[ty * tiles_x + tx] = tile_lut(&hist, tile_area);
        }
    }

    // Per-column neighbours and weights are shared by every row
    let inv_tw = 1.0f32 / tile_w as f32;
    let columns: Vec<(usize, usize, f32)> = (0..w)
        .map(|x| {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as i64;
            let xa = txf - tx1 as f32;
            let tx2 = (tx1 + 1).min(tiles_x as i64 - 1) as usize;
            (tx1.max(0) as usize, tx2, xa)
        })
        .collect();

    let inv_th = 1.0f32 / tile_h as f32;
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as i64;
        let ya = tyf - ty1 as f32;
        let ty2 = (ty1 + 1).min(tiles_y as i64 - 1) as usize;
        let ty1 = ty1.max(0) as usize;

        let row_top = &luts[ty1 * tiles_x..(ty1 + 1) * tiles_x];
        let row_bottom = &luts[ty2 * tiles_x..(ty2 + 1) * tiles_x];
        for (x, &(tx1, tx2, xa)) in columns.iter().enumerate() {
            let v = src[y * w + x] as usize;
            let top = row_top[tx1][v] as f32 * (1.0 - xa) + row_top[tx2][v] as f32 * xa;
            let bottom = row_bottom[tx1][v] as f32 * (1.0 - xa) + row_bottom[tx2][v] as f32 * xa;
            let res = top * (1.0 - ya) + bottom * ya;
            out[y * w + x] = res.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| gray.clone())
}

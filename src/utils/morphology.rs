//! Rectangular morphology on 8-bit images
//!
//! Kernels are anchored at `(width / 2, height / 2)`, so an even kernel of
//! side 8 covers offsets `-4..=3`. A rectangle is separable, so every
//! operation runs as a row pass followed by a column pass.

use image::GrayImage;

/// Rectangular structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    width: u32,
    height: u32,
}

impl StructuringElement {
    /// Square element of the given side
    pub fn square(side: u32) -> Self {
        Self::rect(side, side)
    }

    /// Rectangle of the given size (each side at least 1)
    pub fn rect(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// How pixels outside the image take part in an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Outside pixels are skipped
    Ignore,
    /// Outside pixels read as 0, so erosion also eats in from the frame
    Background,
}

#[derive(Clone, Copy)]
enum Op {
    Max,
    Min,
}

fn pass(
    src: &GrayImage,
    len: u32,
    horizontal: bool,
    op: Op,
    border: Border,
) -> GrayImage {
    let (width, height) = src.dimensions();
    let mut dst = src.clone();
    if len <= 1 {
        return dst;
    }

    let anchor = (len / 2) as i64;
    let data = src.as_raw();
    let w = width as usize;
    let limit = (if horizontal { width } else { height }) as i64;
    let out: &mut [u8] = &mut dst;

    for y in 0..height as usize {
        for x in 0..w {
            let pos = (if horizontal { x } else { y }) as i64;
            let mut acc = match op {
                Op::Max => 0u8,
                Op::Min => 255u8,
            };
            for k in 0..len as i64 {
                let p = pos + k - anchor;
                let v = if p < 0 || p >= limit {
                    match border {
                        Border::Ignore => continue,
                        Border::Background => 0,
                    }
                } else if horizontal {
                    data[y * w + p as usize]
                } else {
                    data[p as usize * w + x]
                };
                acc = match op {
                    Op::Max => acc.max(v),
                    Op::Min => acc.min(v),
                };
            }
            out[y * w + x] = acc;
        }
    }

    dst
}

fn apply(
    image: &GrayImage,
    element: StructuringElement,
    iterations: u32,
    op: Op,
    border: Border,
) -> GrayImage {
    let mut out = image.clone();
    for _ in 0..iterations {
        let rows = pass(&out, element.width, true, op, border);
        out = pass(&rows, element.height, false, op, border);
    }
    out
}

/// Grow bright regions by the structuring element
pub fn dilate(image: &GrayImage, element: StructuringElement, iterations: u32) -> GrayImage {
    apply(image, element, iterations, Op::Max, Border::Ignore)
}

/// Shrink bright regions by the structuring element
pub fn erode(
    image: &GrayImage,
    element: StructuringElement,
    iterations: u32,
    border: Border,
) -> GrayImage {
    apply(image, element, iterations, Op::Min, border)
}

/// Dilation followed by erosion; bridges gaps narrower than the element
pub fn close(image: &GrayImage, element: StructuringElement) -> GrayImage {
    let dilated = dilate(image, element, 1);
    erode(&dilated, element, 1, Border::Ignore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn count(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn test_dilate_single_pixel() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255]));
        let out = dilate(&img, StructuringElement::square(3), 1);
        assert_eq!(count(&out), 9);
        let out = dilate(&img, StructuringElement::square(3), 2);
        assert_eq!(count(&out), 25);
    }

    #[test]
    fn test_even_kernel_anchor() {
        let mut img = GrayImage::new(12, 1);
        img.put_pixel(6, 0, Luma([255]));
        let out = dilate(&img, StructuringElement::rect(4, 1), 1);
        // offsets -2..=1 around each output pixel reach x=6 from x in 5..=8
        let on: Vec<u32> = (0..12).filter(|&x| out.get_pixel(x, 0)[0] > 0).collect();
        assert_eq!(on, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_erode_border_policy() {
        let img = GrayImage::from_pixel(10, 10, Luma([255]));
        let ignored = erode(&img, StructuringElement::square(3), 1, Border::Ignore);
        assert_eq!(count(&ignored), 100);

        let framed = erode(&img, StructuringElement::square(3), 1, Border::Background);
        assert_eq!(count(&framed), 64);
        assert_eq!(framed.get_pixel(0, 0)[0], 0);
        assert_eq!(framed.get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn test_erode_eight_margin_from_frame() {
        let img = GrayImage::from_pixel(20, 20, Luma([255]));
        let out = erode(&img, StructuringElement::square(8), 1, Border::Background);
        // offsets -4..=3: first 4 and last 3 rows/columns are lost
        assert_eq!(out.get_pixel(3, 10)[0], 0);
        assert_eq!(out.get_pixel(4, 10)[0], 255);
        assert_eq!(out.get_pixel(16, 10)[0], 255);
        assert_eq!(out.get_pixel(17, 10)[0], 0);
    }

    #[test]
    fn test_close_bridges_gap() {
        let mut img = GrayImage::new(9, 3);
        for x in 0..9 {
            if x != 4 {
                img.put_pixel(x, 1, Luma([255]));
            }
        }
        let out = close(&img, StructuringElement::square(3));
        assert_eq!(out.get_pixel(4, 1)[0], 255);
    }
}

//! Image primitives used by the detection stages
//!
//! This module provides the building blocks of the vein pipeline:
//! - Grayscale and HSV conversion
//! - Contrast enhancement (CLAHE)
//! - Gaussian smoothing and adaptive binarization
//! - Rectangular morphology and mask set operations

pub mod binarization;
pub mod color;
pub mod enhance;
pub mod filter;
pub mod grayscale;
pub mod mask;
pub mod morphology;

/// Mirror an out-of-range index back into `0..n` without repeating the edge
pub(crate) fn reflect101(i: i64, n: i64) -> usize {
    if n <= 1 {
        return 0;
    }
    let period = 2 * n - 2;
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// Clamp an index into `0..n`, repeating the edge pixel
pub(crate) fn replicate(i: i64, n: i64) -> usize {
    i.clamp(0, (n - 1).max(0)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect101() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(9, 5), 1);
        assert_eq!(reflect101(7, 1), 0);
    }

    #[test]
    fn test_replicate() {
        assert_eq!(replicate(-3, 5), 0);
        assert_eq!(replicate(2, 5), 2);
        assert_eq!(replicate(8, 5), 4);
    }
}

/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Truncate toward zero onto the pixel grid
    pub fn truncate(&self) -> PointI {
        PointI::new(self.x as i32, self.y as i32)
    }
}

/// Integer point for pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct PointI {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl PointI {
    /// Create a new integer point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &PointI) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Convert to a floating point position
    pub fn to_f64(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

impl From<imageproc::point::Point<i32>> for PointI {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = PointI::new(0, 0);
        let b = PointI::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.to_f64().distance(&b.to_f64()) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_truncate_rounds_toward_zero() {
        assert_eq!(Point::new(2.9, 7.1).truncate(), PointI::new(2, 7));
        assert_eq!(Point::new(-0.5, 0.5).truncate(), PointI::new(0, 0));
    }
}

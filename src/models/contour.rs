use super::{Point, PointI};

/// Closed polygon traced along the border of a connected mask region.
///
/// The last point connects back to the first. Area, perimeter and moments are
/// computed on the polygon itself, so a one-pixel-wide strand has zero area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    points: Vec<PointI>,
}

/// Zeroth and first order area moments of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    /// Enclosed area
    pub m00: f64,
    /// First moment about the y axis
    pub m10: f64,
    /// First moment about the x axis
    pub m01: f64,
}

/// Inclusive pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Leftmost column
    pub min_x: i32,
    /// Topmost row
    pub min_y: i32,
    /// Rightmost column
    pub max_x: i32,
    /// Bottom row
    pub max_y: i32,
}

impl BoundingBox {
    /// Width in pixels
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x + 1) as u32
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y + 1) as u32
    }

    /// Smallest distance from the box to any edge of a `width x height` frame
    pub fn frame_distance(&self, width: u32, height: u32) -> i32 {
        let right = width as i32 - 1 - self.max_x;
        let bottom = height as i32 - 1 - self.max_y;
        self.min_x.min(self.min_y).min(right).min(bottom)
    }
}

impl Contour {
    /// Create a contour from its ordered border points
    pub fn new(points: Vec<PointI>) -> Self {
        Self { points }
    }

    /// Border points in traversal order
    pub fn points(&self) -> &[PointI] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the contour has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Polygon moments via Green's theorem, oriented so that `m00 >= 0`
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments::default();
        }

        let mut a00 = 0.0f64;
        let mut a10 = 0.0f64;
        let mut a01 = 0.0f64;
        let mut prev = self.points[n - 1];
        for &p in &self.points {
            let (xp, yp) = (prev.x as f64, prev.y as f64);
            let (xi, yi) = (p.x as f64, p.y as f64);
            let cross = xp * yi - xi * yp;
            a00 += cross;
            a10 += cross * (xp + xi);
            a01 += cross * (yp + yi);
            prev = p;
        }

        let mut m = Moments {
            m00: a00 * 0.5,
            m10: a10 / 6.0,
            m01: a01 / 6.0,
        };
        if m.m00 < 0.0 {
            m.m00 = -m.m00;
            m.m10 = -m.m10;
            m.m01 = -m.m01;
        }
        m
    }

    /// Enclosed polygon area (shoelace formula)
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    /// Length of the closed outline
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut prev = self.points[n - 1];
        let mut length = 0.0;
        for p in &self.points {
            length += prev.distance(p);
            prev = *p;
        }
        length
    }

    /// Area centroid, `None` for degenerate (zero-area) contours
    pub fn centroid(&self) -> Option<Point> {
        let m = self.moments();
        if m.m00 == 0.0 {
            return None;
        }
        Some(Point::new(m.m10 / m.m00, m.m01 / m.m00))
    }

    /// Area centroid truncated to pixels, `(0, 0)` when the area is zero
    pub fn centroid_or_origin(&self) -> PointI {
        self.centroid().map(|c| c.truncate()).unwrap_or_default()
    }

    /// Inclusive bounding box, `None` for an empty contour
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bbox = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &self.points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    /// Drop points lying in the middle of straight runs.
    ///
    /// Area and perimeter are unchanged; only the vertex count shrinks.
    pub fn simplify(&self) -> Contour {
        let n = self.points.len();
        if n < 3 {
            return self.clone();
        }

        let kept: Vec<PointI> = (0..n)
            .filter(|&i| {
                let prev = self.points[(i + n - 1) % n];
                let cur = self.points[i];
                let next = self.points[(i + 1) % n];
                let (ax, ay) = (cur.x - prev.x, cur.y - prev.y);
                let (bx, by) = (next.x - cur.x, next.y - cur.y);
                let collinear = ax * by - ay * bx == 0;
                let same_direction = ax * bx + ay * by > 0;
                !(collinear && same_direction)
            })
            .map(|i| self.points[i])
            .collect();

        if kept.is_empty() {
            self.clone()
        } else {
            Contour::new(kept)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i32) -> Contour {
        let mut pts = Vec::new();
        for x in 0..side {
            pts.push(PointI::new(x, 0));
        }
        for y in 0..side {
            pts.push(PointI::new(side, y));
        }
        for x in (1..=side).rev() {
            pts.push(PointI::new(x, side));
        }
        for y in (1..=side).rev() {
            pts.push(PointI::new(0, y));
        }
        Contour::new(pts)
    }

    #[test]
    fn test_square_geometry() {
        let c = square(4);
        assert!((c.area() - 16.0).abs() < 1e-9);
        assert!((c.perimeter() - 16.0).abs() < 1e-9);
        let centroid = c.centroid().unwrap();
        assert!((centroid.x - 2.0).abs() < 1e-9);
        assert!((centroid.y - 2.0).abs() < 1e-9);
        assert_eq!(c.centroid_or_origin(), PointI::new(2, 2));
    }

    #[test]
    fn test_orientation_does_not_change_sign() {
        let c = square(6);
        let mut reversed = c.points().to_vec();
        reversed.reverse();
        let r = Contour::new(reversed);
        assert!((c.area() - r.area()).abs() < 1e-9);
        assert_eq!(c.centroid_or_origin(), r.centroid_or_origin());
    }

    #[test]
    fn test_degenerate_strand_has_origin_centroid() {
        let strand = Contour::new(vec![
            PointI::new(5, 5),
            PointI::new(6, 5),
            PointI::new(7, 5),
            PointI::new(6, 5),
        ]);
        assert_eq!(strand.area(), 0.0);
        assert!((strand.perimeter() - 4.0).abs() < 1e-9);
        assert!(strand.centroid().is_none());
        assert_eq!(strand.centroid_or_origin(), PointI::new(0, 0));
    }

    #[test]
    fn test_single_point() {
        let dot = Contour::new(vec![PointI::new(3, 3)]);
        assert_eq!(dot.area(), 0.0);
        assert_eq!(dot.perimeter(), 0.0);
        assert_eq!(dot.centroid_or_origin(), PointI::default());
        let bbox = dot.bounding_box().unwrap();
        assert_eq!((bbox.width(), bbox.height()), (1, 1));
    }

    #[test]
    fn test_simplify_keeps_corners_only() {
        let c = square(5);
        let s = c.simplify();
        assert_eq!(s.len(), 4);
        assert!((s.area() - c.area()).abs() < 1e-9);
        assert!((s.perimeter() - c.perimeter()).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_frame_distance() {
        let c = square(4);
        let bbox = c.bounding_box().unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_x: 0,
                min_y: 0,
                max_x: 4,
                max_y: 4
            }
        );
        assert_eq!(bbox.frame_distance(10, 10), 0);
        let shifted = Contour::new(
            c.points()
                .iter()
                .map(|p| PointI::new(p.x + 3, p.y + 2))
                .collect(),
        );
        assert_eq!(shifted.bounding_box().unwrap().frame_distance(10, 10), 2);
    }
}

/// Traced region borders and their geometry
pub mod contour;
/// HSV pixels and inclusive HSV bands
pub mod hsv;
/// Float and integer pixel coordinates
pub mod point;

pub use contour::{BoundingBox, Contour, Moments};
pub use hsv::{Hsv, HsvRange};
pub use point::{Point, PointI};

/// Pixel in 8-bit HSV space.
///
/// Hue is stored halved (`0..180`) so it fits a byte; saturation and value
/// span `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Hsv {
    /// Hue in degrees / 2
    pub h: u8,
    /// Saturation
    pub s: u8,
    /// Value
    pub v: u8,
}

impl Hsv {
    /// Create a new HSV triple
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive per-channel HSV band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HsvRange {
    /// Lower bound, inclusive
    pub lower: Hsv,
    /// Upper bound, inclusive
    pub upper: Hsv,
}

impl HsvRange {
    /// Create a band from its bounds
    pub fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// True when every channel lies within its bounds
    pub fn contains(&self, px: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&px.h)
            && (self.lower.s..=self.upper.s).contains(&px.s)
            && (self.lower.v..=self.upper.v).contains(&px.v)
    }
}

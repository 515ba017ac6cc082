//! Pixel positions in raster space.

use serde::{Deserialize, Serialize};

/// A (fractional) pixel position.
///
/// NaN coordinates mark positions that could not be resolved, e.g. a
/// geographic position outside the raster footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    /// Marker for unresolvable pixel positions.
    pub const INVALID: PixelPos = PixelPos {
        x: f64::NAN,
        y: f64::NAN,
    };

    /// Create a new pixel position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Valid pixel positions are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x >= 0.0 && self.y >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(PixelPos::new(0.0, 0.0).is_valid());
        assert!(PixelPos::new(10.5, 3.25).is_valid());
        assert!(!PixelPos::new(-1.0, 0.0).is_valid());
        assert!(!PixelPos::INVALID.is_valid());
    }
}

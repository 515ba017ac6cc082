//! Paired geographic and pixel positions.

use crate::{GeoPos, PixelPos};
use serde::{Deserialize, Serialize};

/// A geographic position together with its pixel-space location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub geo: GeoPos,
    pub pixel: PixelPos,
}

impl Coord {
    /// Create a new coordinate pair.
    pub fn new(geo: GeoPos, pixel: PixelPos) -> Self {
        Self { geo, pixel }
    }

    /// True if the pixel-space location is resolvable.
    pub fn is_valid(&self) -> bool {
        self.pixel.is_valid()
    }
}

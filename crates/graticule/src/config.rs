//! Graticule configuration and grid-step selection.

use geo_common::{AngleFormat, RasterSize};
use serde::{Deserialize, Serialize};

/// Rasters smaller than this in either dimension get no graticule.
pub const MIN_RASTER_DIM: usize = 16;

const ONE_MINUTE: f64 = 1.0 / 60.0;
const TEN_MINUTES: f64 = 10.0 / 60.0;

/// Configuration for [`Graticule::build`](crate::Graticule::build).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraticuleConfig {
    /// Desired number of grid lines per axis when steps are automatic
    pub desired_line_count: usize,
    /// Degrees between parallels; `None` selects a step from the scene size
    pub lat_major_step: Option<f64>,
    /// Degrees between meridians; `None` selects a step from the scene size
    pub lon_major_step: Option<f64>,
    /// Samples per major step along each line; `None` derives a count
    /// from the raster size
    pub minor_subdivisions: Option<usize>,
    /// How labels render angle values
    pub label_format: AngleFormat,
}

impl Default for GraticuleConfig {
    fn default() -> Self {
        Self {
            desired_line_count: 4,
            lat_major_step: None,
            lon_major_step: None,
            minor_subdivisions: None,
            label_format: AngleFormat::default(),
        }
    }
}

/// Snap a raw degree increment to a human-friendly value: 30 degrees at
/// most, then multiples of 5 degrees, whole degrees, ten-minute
/// multiples, whole minutes, with one arc-minute as the floor.
pub(crate) fn sensible_degree_increment(increment: f64) -> f64 {
    if increment > 30.0 {
        30.0
    } else if increment >= 5.0 {
        5.0 * (increment / 5.0).round()
    } else if increment >= 1.0 {
        increment.round()
    } else if increment >= TEN_MINUTES {
        (6.0 * increment).round() / 6.0
    } else if increment >= ONE_MINUTE {
        (60.0 * increment).round() / 60.0
    } else {
        ONE_MINUTE
    }
}

/// Default line sampling density: a quarter of the smaller raster
/// dimension, clamped to [3, 200].
pub(crate) fn default_minor_subdivisions(raster: RasterSize) -> usize {
    (raster.min_dim() / 4).clamp(3, 200)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_ladder() {
        assert_eq!(sensible_degree_increment(45.0), 30.0);
        assert_eq!(sensible_degree_increment(12.0), 10.0);
        assert_eq!(sensible_degree_increment(7.4), 5.0);
        assert_eq!(sensible_degree_increment(2.3), 2.0);
        // 0.4 degrees snaps to 2/6 degree (two ten-minute units)
        assert!((sensible_degree_increment(0.4) - 2.0 / 6.0).abs() < 1e-12);
        // 0.04 degrees snaps to 2/60 degree (two minutes)
        assert!((sensible_degree_increment(0.04) - 2.0 / 60.0).abs() < 1e-12);
        // Below one minute the floor applies
        assert!((sensible_degree_increment(0.0001) - ONE_MINUTE).abs() < 1e-12);
    }

    #[test]
    fn test_minor_subdivision_clamp() {
        assert_eq!(default_minor_subdivisions(RasterSize::new(16, 16)), 4);
        assert_eq!(default_minor_subdivisions(RasterSize::new(8000, 8000)), 200);
        assert_eq!(default_minor_subdivisions(RasterSize::new(16, 10)), 3);
    }
}

//! Geographic positions in decimal degrees.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// Latitude is positive north, longitude positive east. An invalid
/// position carries NaN in both fields; check with [`GeoPos::is_valid`]
/// rather than comparing against a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPos {
    /// Marker for positions outside the geocoded footprint.
    pub const INVALID: GeoPos = GeoPos {
        lat: f64::NAN,
        lon: f64::NAN,
    };

    /// Create a new geographic position.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True if latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        is_valid_lat(self.lat) && is_valid_lon(self.lon)
    }
}

/// True for latitudes within [-90, 90]. NaN is invalid.
pub fn is_valid_lat(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// True for longitudes within [-180, 180]. NaN is invalid.
pub fn is_valid_lon(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// Wrap a longitude into [-180, 180].
pub fn limit_lon(mut lon: f64) -> f64 {
    while lon < -180.0 {
        lon += 360.0;
    }
    while lon > 180.0 {
        lon -= 360.0;
    }
    lon
}

//! Lambert Conformal Conic geocoding.
//!
//! Maps a cone tangent or secant to the Earth's surface onto a flat
//! plane. Common for mid-latitude regional scenes.
//!
//! The parameters are the central meridian, one or two standard
//! parallels, the geographic position of the first grid pixel and the
//! grid spacing in meters.

use crate::GeoCoding;
use geo_common::{limit_lon, GeoError, GeoPos, GeoResult, PixelPos};
use std::f64::consts::PI;

/// Mean Earth radius in meters.
const EARTH_RADIUS: f64 = 6_371_229.0;

/// Lambert Conformal Conic geocoding.
///
/// All stored angles are in radians; the public API is in degrees via
/// [`GeoPos`].
#[derive(Debug, Clone)]
pub struct LambertConformal {
    width: usize,
    height: usize,
    /// Central meridian in radians
    lon0: f64,
    /// Grid spacing in X direction (meters)
    dx: f64,
    /// Grid spacing in Y direction (meters)
    dy: f64,
    /// Cone constant
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the first grid pixel's latitude
    rho0: f64,
    /// First grid pixel in projection coordinates (meters)
    x0: f64,
    y0: f64,
}

impl LambertConformal {
    /// Create a Lambert Conformal geocoding.
    ///
    /// # Arguments
    /// * `first_lat_deg` / `first_lon_deg` - geographic position of pixel (0, 0)
    /// * `central_meridian_deg` - orientation of the grid
    /// * `latin1_deg` / `latin2_deg` - standard parallels (equal for a tangent cone)
    /// * `dx` / `dy` - grid spacing in meters
    /// * `width` / `height` - raster dimensions in pixels
    #[allow(clippy::too_many_arguments)]
    pub fn from_params(
        first_lat_deg: f64,
        first_lon_deg: f64,
        central_meridian_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        dx: f64,
        dy: f64,
        width: usize,
        height: usize,
    ) -> GeoResult<Self> {
        if width < 1 || height < 1 {
            return Err(GeoError::InvalidRasterSize { width, height });
        }
        if dx <= 0.0 || dy <= 0.0 {
            return Err(GeoError::parameter("dx/dy", "grid spacing must be positive"));
        }
        if latin1_deg.abs() >= 90.0 || latin2_deg.abs() >= 90.0 {
            return Err(GeoError::parameter(
                "latin1/latin2",
                "standard parallels must lie strictly between the poles",
            ));
        }
        if latin1_deg == 0.0 && latin2_deg == 0.0 {
            return Err(GeoError::parameter(
                "latin1/latin2",
                "equatorial standard parallels give a degenerate cone",
            ));
        }

        let to_rad = PI / 180.0;
        let lat1 = first_lat_deg * to_rad;
        let lon1 = first_lon_deg * to_rad;
        let lon0 = central_meridian_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;

        // Cone constant
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = EARTH_RADIUS * f / (PI / 4.0 + lat1 / 2.0).tan().powf(n);

        // First grid pixel in projection coordinates
        let theta0 = n * wrap_radians(lon1 - lon0);
        let x0 = rho0 * theta0.sin();
        let y0 = rho0 - rho0 * theta0.cos();

        Ok(Self {
            width,
            height,
            lon0,
            dx,
            dy,
            n,
            f,
            rho0,
            x0,
            y0,
        })
    }
}

impl GeoCoding for LambertConformal {
    fn geo_pos(&self, pixel: PixelPos) -> GeoPos {
        if !pixel.is_valid() {
            return GeoPos::INVALID;
        }

        let x = self.x0 + pixel.x * self.dx;
        let y = self.y0 + pixel.y * self.dy;

        let rho = (x * x + (self.rho0 - y) * (self.rho0 - y)).sqrt();
        let rho = if self.n < 0.0 { -rho } else { rho };
        let theta = (x / (self.rho0 - y)).atan();

        let lat = 2.0 * ((EARTH_RADIUS * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        let to_deg = 180.0 / PI;
        GeoPos::new(lat * to_deg, limit_lon(lon * to_deg))
    }

    fn pixel_pos(&self, geo: GeoPos) -> PixelPos {
        if !geo.is_valid() {
            return PixelPos::INVALID;
        }

        let to_rad = PI / 180.0;
        let lat = geo.lat * to_rad;
        let dlon = wrap_radians(geo.lon * to_rad - self.lon0);

        let rho = EARTH_RADIUS * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        let i = (x - self.x0) / self.dx;
        let j = (y - self.y0) / self.dy;

        if i < 0.0 || i > (self.width - 1) as f64 || j < 0.0 || j > (self.height - 1) as f64 {
            return PixelPos::INVALID;
        }
        PixelPos::new(i, j)
    }
}

/// Normalize an angle in radians to [-PI, PI].
fn wrap_radians(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 3km mid-latitude CONUS-like grid, tangent cone at 38.5N.
    fn conus_grid() -> LambertConformal {
        LambertConformal::from_params(
            21.138123,   // first_lat
            -122.719528, // first_lon
            -97.5,       // central meridian
            38.5,        // latin1
            38.5,        // latin2
            3000.0,      // dx
            3000.0,      // dy
            1799,        // width
            1059,        // height
        )
        .unwrap()
    }

    #[test]
    fn test_first_pixel_maps_to_origin() {
        let proj = conus_grid();
        let pixel = proj.pixel_pos(GeoPos::new(21.138123, -122.719528));
        assert!(pixel.is_valid());
        assert!(pixel.x.abs() < 0.1, "x should be ~0, got {}", pixel.x);
        assert!(pixel.y.abs() < 0.1, "y should be ~0, got {}", pixel.y);
    }

    #[test]
    fn test_roundtrip_at_grid_center() {
        let proj = conus_grid();
        let geo = proj.geo_pos(PixelPos::new(900.0, 500.0));
        let pixel = proj.pixel_pos(geo);

        assert!((pixel.x - 900.0).abs() < 0.01, "x roundtrip: {}", pixel.x);
        assert!((pixel.y - 500.0).abs() < 0.01, "y roundtrip: {}", pixel.y);
    }

    #[test]
    fn test_out_of_grid_is_invalid() {
        let proj = conus_grid();
        // Somewhere in the south Atlantic, far outside the grid
        let pixel = proj.pixel_pos(GeoPos::new(-30.0, -20.0));
        assert!(!pixel.is_valid());
    }

    #[test]
    fn test_rejects_degenerate_parameters() {
        assert!(LambertConformal::from_params(
            21.0, -122.0, -97.5, 38.5, 38.5, 0.0, 3000.0, 100, 100
        )
        .is_err());
        assert!(LambertConformal::from_params(
            21.0, -122.0, -97.5, 90.0, 90.0, 3000.0, 3000.0, 100, 100
        )
        .is_err());
        assert!(
            LambertConformal::from_params(21.0, -122.0, -97.5, 38.5, 38.5, 3000.0, 3000.0, 0, 100)
                .is_err()
        );
    }
}

//! Equirectangular (linear lat/lon) geocoding.

use crate::GeoCoding;
use geo_common::{limit_lon, GeoError, GeoPos, GeoResult, PixelPos};

/// A geocoding where latitude is linear in the pixel row and longitude
/// linear in the pixel column.
///
/// `lat_step` is usually negative for north-up scenes. Longitudes wrap
/// across the antimeridian, so a scene may span the seam.
#[derive(Debug, Clone)]
pub struct EquirectangularGeoCoding {
    width: usize,
    height: usize,
    origin_lat: f64,
    origin_lon: f64,
    lat_step: f64,
    lon_step: f64,
}

impl EquirectangularGeoCoding {
    /// Create a new linear geocoding.
    ///
    /// `origin_lat`/`origin_lon` is the geographic position of pixel
    /// (0, 0); the steps are degrees per pixel.
    pub fn new(
        width: usize,
        height: usize,
        origin_lat: f64,
        origin_lon: f64,
        lat_step: f64,
        lon_step: f64,
    ) -> GeoResult<Self> {
        if width < 1 || height < 1 {
            return Err(GeoError::InvalidRasterSize { width, height });
        }
        if lat_step == 0.0 || lon_step == 0.0 {
            return Err(GeoError::parameter(
                "lat_step/lon_step",
                "degree-per-pixel steps must be nonzero",
            ));
        }
        Ok(Self {
            width,
            height,
            origin_lat,
            origin_lon,
            lat_step,
            lon_step,
        })
    }
}

impl GeoCoding for EquirectangularGeoCoding {
    fn geo_pos(&self, pixel: PixelPos) -> GeoPos {
        if !pixel.is_valid() {
            return GeoPos::INVALID;
        }
        let lat = self.origin_lat + pixel.y * self.lat_step;
        let lon = limit_lon(self.origin_lon + pixel.x * self.lon_step);
        GeoPos::new(lat, lon)
    }

    fn pixel_pos(&self, geo: GeoPos) -> PixelPos {
        if !geo.is_valid() {
            return PixelPos::INVALID;
        }

        let y = (geo.lat - self.origin_lat) / self.lat_step;
        if y < 0.0 || y > (self.height - 1) as f64 {
            return PixelPos::INVALID;
        }

        // The longitude axis wraps, so try the neighboring branches and
        // keep the one that lands inside the raster.
        let max_x = (self.width - 1) as f64;
        let dlon = geo.lon - self.origin_lon;
        for branch in [dlon, dlon + 360.0, dlon - 360.0] {
            let x = branch / self.lon_step;
            if (0.0..=max_x).contains(&x) {
                return PixelPos::new(x, y);
            }
        }
        PixelPos::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_mapping() {
        let gc = EquirectangularGeoCoding::new(100, 100, 0.0, 0.0, 0.1, 0.1).unwrap();

        let geo = gc.geo_pos(PixelPos::new(20.0, 30.0));
        assert!((geo.lat - 3.0).abs() < 1e-12);
        assert!((geo.lon - 2.0).abs() < 1e-12);

        let pixel = gc.pixel_pos(GeoPos::new(3.0, 2.0));
        assert!((pixel.x - 20.0).abs() < 1e-9);
        assert!((pixel.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_wrap() {
        // Scene from 170E across the seam to 170W
        let gc = EquirectangularGeoCoding::new(200, 100, 60.0, 170.0, -0.1, 0.1).unwrap();

        let east = gc.geo_pos(PixelPos::new(0.0, 0.0));
        assert!((east.lon - 170.0).abs() < 1e-12);

        let west = gc.geo_pos(PixelPos::new(150.0, 0.0));
        assert!((west.lon - (-175.0)).abs() < 1e-9);

        // Inverse resolves the wrapped branch
        let pixel = gc.pixel_pos(GeoPos::new(60.0, -175.0));
        assert!((pixel.x - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_outside_footprint_is_invalid() {
        let gc = EquirectangularGeoCoding::new(100, 100, 0.0, 0.0, 0.1, 0.1).unwrap();
        assert!(!gc.pixel_pos(GeoPos::new(50.0, 2.0)).is_valid());
        assert!(!gc.pixel_pos(GeoPos::new(3.0, 90.0)).is_valid());
    }
}

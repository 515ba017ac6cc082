//! Tie-point grid geocoding: a sparse, regularly subsampled lat/lon
//! grid interpolated bilinearly to full raster resolution.

use crate::GeoCoding;
use geo_common::{limit_lon, GeoError, GeoPos, GeoResult, PixelPos};
use nalgebra::{Matrix2, Vector2};

/// Geocoding backed by subsampled latitude/longitude tie-point grids.
///
/// Grid nodes sit `subsampling` pixels apart; positions between nodes
/// are interpolated bilinearly. Nodes may carry NaN to mark regions
/// without geolocation, which interpolate to [`GeoPos::INVALID`].
#[derive(Debug, Clone)]
pub struct TiePointGeoCoding {
    width: usize,
    height: usize,
    grid_width: usize,
    grid_height: usize,
    subsampling: usize,
    /// Row-major `grid_width x grid_height` node latitudes
    lats: Vec<f64>,
    /// Row-major node longitudes, same layout
    lons: Vec<f64>,
}

impl TiePointGeoCoding {
    /// Create a tie-point geocoding.
    ///
    /// The node grids must be row-major `grid_width x grid_height` and
    /// must cover the full raster at the given subsampling.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
        subsampling: usize,
        lats: Vec<f64>,
        lons: Vec<f64>,
    ) -> GeoResult<Self> {
        if width < 1 || height < 1 {
            return Err(GeoError::InvalidRasterSize { width, height });
        }
        if grid_width < 2 || grid_height < 2 {
            return Err(GeoError::TiePointGrid(
                "need at least 2x2 tie-point nodes".to_string(),
            ));
        }
        if subsampling < 1 {
            return Err(GeoError::parameter("subsampling", "must be >= 1"));
        }
        let expected = grid_width * grid_height;
        if lats.len() != expected || lons.len() != expected {
            return Err(GeoError::TiePointGrid(format!(
                "expected {} nodes, got {} lats / {} lons",
                expected,
                lats.len(),
                lons.len()
            )));
        }
        if (grid_width - 1) * subsampling < width - 1 || (grid_height - 1) * subsampling < height - 1
        {
            return Err(GeoError::TiePointGrid(format!(
                "{}x{} grid at subsampling {} does not cover a {}x{} raster",
                grid_width, grid_height, subsampling, width, height
            )));
        }
        Ok(Self {
            width,
            height,
            grid_width,
            grid_height,
            subsampling,
            lats,
            lons,
        })
    }

    fn node(&self, i: usize, j: usize) -> (f64, f64) {
        let idx = j * self.grid_width + i;
        (self.lats[idx], self.lons[idx])
    }

    /// The four cell nodes around grid position (gx, gy), with the cell
    /// longitudes unwrapped into the branch of the first node.
    fn cell(&self, gx: f64, gy: f64) -> Option<([f64; 4], [f64; 4], f64, f64)> {
        let i = (gx.floor() as usize).min(self.grid_width - 2);
        let j = (gy.floor() as usize).min(self.grid_height - 2);
        let fx = gx - i as f64;
        let fy = gy - j as f64;

        let nodes = [
            self.node(i, j),
            self.node(i + 1, j),
            self.node(i, j + 1),
            self.node(i + 1, j + 1),
        ];
        if nodes.iter().any(|(lat, lon)| lat.is_nan() || lon.is_nan()) {
            return None;
        }

        let lats = [nodes[0].0, nodes[1].0, nodes[2].0, nodes[3].0];
        let base = nodes[0].1;
        let mut lons = [0.0; 4];
        for (k, (_, lon)) in nodes.iter().enumerate() {
            let mut lon = *lon;
            while lon - base > 180.0 {
                lon -= 360.0;
            }
            while lon - base < -180.0 {
                lon += 360.0;
            }
            lons[k] = lon;
        }
        Some((lats, lons, fx, fy))
    }
}

impl GeoCoding for TiePointGeoCoding {
    fn geo_pos(&self, pixel: PixelPos) -> GeoPos {
        if !pixel.is_valid() {
            return GeoPos::INVALID;
        }

        let step = self.subsampling as f64;
        let gx = (pixel.x / step).clamp(0.0, (self.grid_width - 1) as f64);
        let gy = (pixel.y / step).clamp(0.0, (self.grid_height - 1) as f64);

        let Some((lats, lons, fx, fy)) = self.cell(gx, gy) else {
            return GeoPos::INVALID;
        };

        let lat = (1.0 - fy) * ((1.0 - fx) * lats[0] + fx * lats[1])
            + fy * ((1.0 - fx) * lats[2] + fx * lats[3]);
        let lon = (1.0 - fy) * ((1.0 - fx) * lons[0] + fx * lons[1])
            + fy * ((1.0 - fx) * lons[2] + fx * lons[3]);

        GeoPos::new(lat, limit_lon(lon))
    }

    fn pixel_pos(&self, geo: GeoPos) -> PixelPos {
        if !geo.is_valid() {
            return PixelPos::INVALID;
        }

        // Nearest node, angular distance with seam-aware longitude delta
        let mut best: Option<(usize, usize, f64)> = None;
        for j in 0..self.grid_height {
            for i in 0..self.grid_width {
                let (lat, lon) = self.node(i, j);
                if lat.is_nan() || lon.is_nan() {
                    continue;
                }
                let dlat = geo.lat - lat;
                let dlon = limit_lon(geo.lon - lon);
                let dist = dlat * dlat + dlon * dlon;
                if best.map_or(true, |(_, _, d)| dist < d) {
                    best = Some((i, j, dist));
                }
            }
        }
        let Some((i, j, _)) = best else {
            return PixelPos::INVALID;
        };

        // Local first-order inversion around the nearest node
        let di: isize = if i + 1 < self.grid_width { 1 } else { -1 };
        let dj: isize = if j + 1 < self.grid_height { 1 } else { -1 };
        let (lat0, lon0) = self.node(i, j);
        let (lat_i, lon_i) = self.node((i as isize + di) as usize, j);
        let (lat_j, lon_j) = self.node(i, (j as isize + dj) as usize);
        if [lat_i, lon_i, lat_j, lon_j].iter().any(|v| v.is_nan()) {
            return PixelPos::INVALID;
        }

        let jacobian = Matrix2::new(
            (lat_i - lat0) / di as f64,
            (lat_j - lat0) / dj as f64,
            limit_lon(lon_i - lon0) / di as f64,
            limit_lon(lon_j - lon0) / dj as f64,
        );
        let rhs = Vector2::new(geo.lat - lat0, limit_lon(geo.lon - lon0));
        let Some(inverse) = jacobian.try_inverse() else {
            return PixelPos::INVALID;
        };
        let offset = inverse * rhs;

        let step = self.subsampling as f64;
        let x = (i as f64 + offset[0]) * step;
        let y = (j as f64 + offset[1]) * step;
        if x < 0.0 || x > (self.width - 1) as f64 || y < 0.0 || y > (self.height - 1) as f64 {
            return PixelPos::INVALID;
        }
        PixelPos::new(x, y)
    }

    fn native_sampling_stride(&self) -> Option<usize> {
        Some(self.subsampling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 node grid over a 65x65 raster, subsampling 16, linear field
    /// lat = 50 - 0.1 * y, lon = 10 + 0.1 * x.
    fn linear_grid() -> TiePointGeoCoding {
        let mut lats = Vec::new();
        let mut lons = Vec::new();
        for j in 0..5 {
            for i in 0..5 {
                lats.push(50.0 - 0.1 * (j * 16) as f64);
                lons.push(10.0 + 0.1 * (i * 16) as f64);
            }
        }
        TiePointGeoCoding::new(65, 65, 5, 5, 16, lats, lons).unwrap()
    }

    #[test]
    fn test_bilinear_matches_linear_field() {
        let gc = linear_grid();
        let geo = gc.geo_pos(PixelPos::new(23.0, 41.0));
        assert!((geo.lat - (50.0 - 4.1)).abs() < 1e-9);
        assert!((geo.lon - (10.0 + 2.3)).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let gc = linear_grid();
        let geo = gc.geo_pos(PixelPos::new(30.0, 12.0));
        let pixel = gc.pixel_pos(geo);
        assert!(pixel.is_valid());
        assert!((pixel.x - 30.0).abs() < 1e-6, "x: {}", pixel.x);
        assert!((pixel.y - 12.0).abs() < 1e-6, "y: {}", pixel.y);
    }

    #[test]
    fn test_nan_nodes_mark_invalid_footprint() {
        let mut lats = Vec::new();
        let mut lons = Vec::new();
        for j in 0..5 {
            for i in 0..5 {
                lats.push(50.0 - 0.1 * (j * 16) as f64);
                lons.push(10.0 + 0.1 * (i * 16) as f64);
            }
        }
        // Knock out the top-left node
        lats[0] = f64::NAN;
        let gc = TiePointGeoCoding::new(65, 65, 5, 5, 16, lats, lons).unwrap();

        assert!(!gc.geo_pos(PixelPos::new(4.0, 4.0)).is_valid());
        // Far corner is still fine
        assert!(gc.geo_pos(PixelPos::new(60.0, 60.0)).is_valid());
    }

    #[test]
    fn test_native_stride() {
        assert_eq!(linear_grid().native_sampling_stride(), Some(16));
    }

    #[test]
    fn test_rejects_undersized_grid() {
        let nodes = vec![0.0; 4];
        assert!(TiePointGeoCoding::new(100, 100, 2, 2, 16, nodes.clone(), nodes).is_err());
    }
}

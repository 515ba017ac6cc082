//! Geographic boundary polygon of a raster scene.

use geo_common::{GeoPos, PixelPos, RasterSize};
use projection::GeoCoding;

/// Boundary-walk stride: a size-derived heuristic, refined by the
/// geocoding's native sampling stride when it supplies a finer one.
pub(crate) fn boundary_stride<G: GeoCoding + ?Sized>(geocoding: &G, raster: RasterSize) -> usize {
    let heuristic = (raster.min_dim() / 50).max(1);
    match geocoding.native_sampling_stride() {
        Some(native) if native >= 1 => native.min(heuristic),
        _ => heuristic,
    }
}

/// Sample the raster's edge pixels into a closed geographic polygon.
///
/// Invalid samples are dropped, the first vertex is repeated at the end
/// so every edge gets intersection-tested, and longitudes are unwrapped
/// into one continuous branch to avoid spurious antimeridian jumps.
pub(crate) fn create_geo_boundary<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    stride: usize,
) -> Vec<GeoPos> {
    let mut boundary: Vec<GeoPos> = pixel_boundary(raster, stride)
        .into_iter()
        .map(|pixel| geocoding.geo_pos(pixel))
        .filter(|geo| geo.is_valid())
        .collect();

    if let Some(&first) = boundary.first() {
        boundary.push(first);
    }
    unwrap_polygon_lons(&mut boundary);
    boundary
}

/// Walk the rectangle outline at pixel centers: top edge left to right,
/// right edge top to bottom, bottom edge right to left, left edge
/// bottom to top.
fn pixel_boundary(raster: RasterSize, stride: usize) -> Vec<PixelPos> {
    let inset = 0.5;
    let x2 = raster.width - 1;
    let y2 = raster.height - 1;
    let step = stride.max(1);

    let mut pixels = Vec::new();

    let mut last_x = 0;
    let mut x = 0;
    while x < x2 {
        pixels.push(PixelPos::new(x as f64 + inset, inset));
        last_x = x;
        x += step;
    }

    let mut last_y = 0;
    let mut y = 0;
    while y < y2 {
        pixels.push(PixelPos::new(x2 as f64 + inset, y as f64 + inset));
        last_y = y;
        y += step;
    }

    pixels.push(PixelPos::new(x2 as f64 + inset, y2 as f64 + inset));

    let mut x = last_x as isize;
    while x > 0 {
        pixels.push(PixelPos::new(x as f64 + inset, y2 as f64 + inset));
        x -= step as isize;
    }

    pixels.push(PixelPos::new(inset, y2 as f64 + inset));

    let mut y = last_y as isize;
    while y > 0 {
        pixels.push(PixelPos::new(inset, y as f64 + inset));
        y -= step as isize;
    }

    pixels
}

/// Unwrap longitudes so consecutive vertices never jump by more than
/// 180 degrees; a seam-crossing polygon ends up in one branch, e.g.
/// 170..190 instead of 170..-170.
fn unwrap_polygon_lons(boundary: &mut [GeoPos]) {
    let Some(first) = boundary.first() else {
        return;
    };
    let mut prev = first.lon;
    for geo in boundary.iter_mut().skip(1) {
        let mut lon = geo.lon;
        while lon - prev > 180.0 {
            lon -= 360.0;
        }
        while lon - prev < -180.0 {
            lon += 360.0;
        }
        geo.lon = lon;
        prev = lon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::EquirectangularGeoCoding;

    #[test]
    fn test_pixel_boundary_stays_on_outline() {
        let pixels = pixel_boundary(RasterSize::new(100, 50), 10);
        assert!(pixels.len() > 20);
        for p in &pixels {
            let on_x_edge = (p.x - 0.5).abs() < 1e-9 || (p.x - 99.5).abs() < 1e-9;
            let on_y_edge = (p.y - 0.5).abs() < 1e-9 || (p.y - 49.5).abs() < 1e-9;
            assert!(on_x_edge || on_y_edge, "({}, {}) is not on the outline", p.x, p.y);
        }
    }

    #[test]
    fn test_boundary_is_closed() {
        let gc = EquirectangularGeoCoding::new(100, 100, 50.0, 0.0, -0.1, 0.1).unwrap();
        let boundary = create_geo_boundary(&gc, RasterSize::new(100, 100), 10);
        assert!(boundary.len() > 3);
        assert_eq!(boundary.first(), boundary.last());
    }

    #[test]
    fn test_seam_crossing_boundary_unwraps() {
        // Scene spanning 170E..190E (i.e. across the antimeridian)
        let gc = EquirectangularGeoCoding::new(200, 100, 60.0, 170.0, -0.1, 0.1).unwrap();
        let boundary = create_geo_boundary(&gc, RasterSize::new(200, 100), 10);

        for pair in boundary.windows(2) {
            assert!(
                (pair[1].lon - pair[0].lon).abs() <= 180.0,
                "unwrapped boundary must not jump across the seam"
            );
        }
        // The eastern half sits in the >180 branch
        assert!(boundary.iter().any(|g| g.lon > 180.0));
    }

    #[test]
    fn test_native_stride_refines_heuristic() {
        use projection::TiePointGeoCoding;

        let mut lats = Vec::new();
        let mut lons = Vec::new();
        for j in 0..65 {
            for i in 0..65 {
                lats.push(50.0 - 0.1 * (j * 4) as f64);
                lons.push(10.0 + 0.1 * (i * 4) as f64);
            }
        }
        let gc = TiePointGeoCoding::new(257, 257, 65, 65, 4, lats, lons).unwrap();
        let raster = RasterSize::new(257, 257);

        // Size heuristic alone would be 257/50 = 5; the native grid
        // stride of 4 is finer and wins.
        assert_eq!(boundary_stride(&gc, raster), 4);

        let plain = EquirectangularGeoCoding::new(257, 257, 50.0, 10.0, -0.1, 0.1).unwrap();
        assert_eq!(boundary_stride(&plain, raster), 5);
    }
}

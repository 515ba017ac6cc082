//! Boundary-crossing computation for candidate parallels and meridians.

use geo_common::GeoPos;

/// Longitudes at which the boundary polygon crosses the given latitude.
///
/// A crossing is a sign change of `lat - target` between consecutive
/// vertices; the longitude is linearly interpolated at the crossing.
pub(crate) fn parallel_intersections(boundary: &[GeoPos], lat: f64) -> Vec<f64> {
    let mut crossings = Vec::new();
    for pair in boundary.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if curr.lat == prev.lat {
            continue;
        }
        if (lat >= prev.lat && lat <= curr.lat) || (lat >= curr.lat && lat <= prev.lat) {
            let weight = (lat - prev.lat) / (curr.lat - prev.lat);
            if (0.0..1.0).contains(&weight) {
                crossings.push(prev.lon + weight * (curr.lon - prev.lon));
            }
        }
    }
    crossings
}

/// Latitudes at which the boundary polygon crosses the given longitude.
///
/// The longitude must already be expressed in the boundary's unwrapped
/// branch.
pub(crate) fn meridian_intersections(boundary: &[GeoPos], lon: f64) -> Vec<f64> {
    let mut crossings = Vec::new();
    for pair in boundary.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if curr.lon == prev.lon {
            continue;
        }
        if (lon >= prev.lon && lon <= curr.lon) || (lon >= curr.lon && lon <= prev.lon) {
            let weight = (lon - prev.lon) / (curr.lon - prev.lon);
            if (0.0..1.0).contains(&weight) {
                crossings.push(prev.lat + weight * (curr.lat - prev.lat));
            }
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed unit "diamond" centered on (0, 0), 10 degrees across.
    fn diamond() -> Vec<GeoPos> {
        vec![
            GeoPos::new(5.0, 0.0),
            GeoPos::new(0.0, 5.0),
            GeoPos::new(-5.0, 0.0),
            GeoPos::new(0.0, -5.0),
            GeoPos::new(5.0, 0.0),
        ]
    }

    #[test]
    fn test_parallel_crossings_are_paired() {
        let crossings = parallel_intersections(&diamond(), 2.5);
        assert_eq!(crossings.len(), 2);
        let (west, east) = (crossings[0].min(crossings[1]), crossings[0].max(crossings[1]));
        assert!((west - (-2.5)).abs() < 1e-9);
        assert!((east - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_meridian_crossings_are_paired() {
        let crossings = meridian_intersections(&diamond(), -2.5);
        assert_eq!(crossings.len(), 2);
        let (south, north) = (crossings[0].min(crossings[1]), crossings[0].max(crossings[1]));
        assert!((south - (-2.5)).abs() < 1e-9);
        assert!((north - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_line_outside_polygon_has_no_crossings() {
        assert!(parallel_intersections(&diamond(), 20.0).is_empty());
        assert!(meridian_intersections(&diamond(), 20.0).is_empty());
    }
}

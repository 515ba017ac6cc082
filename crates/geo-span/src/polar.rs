//! Exhaustive polar-extreme refinement.
//!
//! Scans every pixel of the raster to locate the northernmost and
//! southernmost valid positions, then extrapolates the local latitude
//! gradient to decide whether the scene actually reaches a pole. This
//! is the only O(width * height) operation in the engine, so it runs
//! as a per-row rayon reduction and only as a refinement step.

use geo_common::{Coord, PixelPos, RasterSize};
use projection::GeoCoding;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Extremal-latitude positions of a scene and the pole-crossing
/// verdicts extrapolated from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoords {
    pub northernmost: Coord,
    pub southernmost: Coord,
    /// True when the extreme sits on the raster edge, where no
    /// gradient-based verdict is possible
    pub northernmost_on_edge: bool,
    pub southernmost_on_edge: bool,
    pub north_pole_detected: bool,
    pub south_pole_detected: bool,
}

impl PolarCoords {
    /// Find the extremal-latitude pixels and extrapolate pole crossings.
    ///
    /// Returns `None` when the raster has no valid geographic sample.
    pub fn refine<G: GeoCoding + ?Sized>(geocoding: &G, raster: RasterSize) -> Option<PolarCoords> {
        let (north, south) = (0..raster.height)
            .into_par_iter()
            .map(|y| {
                let mut north: Option<Coord> = None;
                let mut south: Option<Coord> = None;
                for x in 0..raster.width {
                    let pixel = PixelPos::new(x as f64, y as f64);
                    let geo = geocoding.geo_pos(pixel);
                    if !geo.is_valid() {
                        continue;
                    }
                    let coord = Coord::new(geo, pixel);
                    if north.map_or(true, |c| more_northern(&coord, &c)) {
                        north = Some(coord);
                    }
                    if south.map_or(true, |c| more_southern(&coord, &c)) {
                        south = Some(coord);
                    }
                }
                (north, south)
            })
            .reduce(
                || (None, None),
                |a, b| (pick(a.0, b.0, more_northern), pick(a.1, b.1, more_southern)),
            );

        let northernmost = north?;
        let southernmost = south?;
        let lat_range = (northernmost.geo.lat - southernmost.geo.lat).abs();

        let (northernmost_on_edge, north_pole_detected) =
            pole_verdict(geocoding, raster, &northernmost, lat_range, true);
        let (southernmost_on_edge, south_pole_detected) =
            pole_verdict(geocoding, raster, &southernmost, lat_range, false);

        tracing::debug!(
            north_lat = northernmost.geo.lat,
            south_lat = southernmost.geo.lat,
            north_pole_detected,
            south_pole_detected,
            "polar refinement complete"
        );

        Some(PolarCoords {
            northernmost,
            southernmost,
            northernmost_on_edge,
            southernmost_on_edge,
            north_pole_detected,
            south_pole_detected,
        })
    }
}

/// Keep the better of two candidates under the given ordering.
fn pick(
    a: Option<Coord>,
    b: Option<Coord>,
    better: fn(&Coord, &Coord) -> bool,
) -> Option<Coord> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if better(&b, &a) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

/// Deterministic tie-break so the parallel reduction is order-independent:
/// higher latitude wins, equal latitudes fall back to scan order.
fn more_northern(candidate: &Coord, incumbent: &Coord) -> bool {
    candidate.geo.lat > incumbent.geo.lat
        || (candidate.geo.lat == incumbent.geo.lat && earlier_in_scan(candidate, incumbent))
}

fn more_southern(candidate: &Coord, incumbent: &Coord) -> bool {
    candidate.geo.lat < incumbent.geo.lat
        || (candidate.geo.lat == incumbent.geo.lat && earlier_in_scan(candidate, incumbent))
}

fn earlier_in_scan(a: &Coord, b: &Coord) -> bool {
    a.pixel.y < b.pixel.y || (a.pixel.y == b.pixel.y && a.pixel.x < b.pixel.x)
}

/// Extrapolate the local latitude gradient at an extremal pixel.
///
/// The neighbor one pixel diagonally inward estimates the per-pixel
/// latitude change; that delta is doubled as a buffer, with a fallback
/// of 10% of the scene's latitude range when the neighbor is invalid.
/// Returns (on_edge, pole_detected).
fn pole_verdict<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    extreme: &Coord,
    lat_range: f64,
    north: bool,
) -> (bool, bool) {
    let PixelPos { x, y } = extreme.pixel;
    if x <= 0.0 || x >= raster.max_x() || y <= 0.0 || y >= raster.max_y() {
        return (true, false);
    }

    let neighbor = geocoding.geo_pos(PixelPos::new(x - 1.0, y - 1.0));
    let delta = if neighbor.is_valid() {
        2.0 * (extreme.geo.lat - neighbor.lat).abs()
    } else {
        0.1 * lat_range
    };

    let detected = if north {
        extreme.geo.lat + delta >= 90.0
    } else {
        extreme.geo.lat - delta <= -90.0
    };
    (false, detected)
}

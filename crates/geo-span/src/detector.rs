//! Whole-scene span detection.

use crate::polar::PolarCoords;
use crate::scan::{scan_column_lat, scan_row_lon};
use crate::span::{LatSpan, LonSpan};
use geo_common::{is_valid_lat, is_valid_lon, PixelPos, RasterSize};
use projection::GeoCoding;
use serde::{Deserialize, Serialize};

/// Merged angular extent of a geocoded scene.
///
/// Produced by scanning five representative rows and five representative
/// columns (0%, 25%, 50%, 75%, 100%) of the raster through the
/// geocoding. The summary exists only when both axes yield a valid
/// span; a raster with no usable geocoding samples yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSpan {
    pub lon: LonSpan,
    pub lat: LatSpan,
    pub dateline_crossed: bool,
    pub north_pole_crossed: bool,
    pub south_pole_crossed: bool,
    /// True only if latitude is constant along every sampled row and
    /// longitude constant along every sampled column
    pub equidistant_cylindrical: bool,
    /// Present when the polar refinement pass ran
    pub polar: Option<PolarCoords>,
}

impl GeoSpan {
    /// Compute the scene span. The polar refinement pass runs only when
    /// the row/column scans already suspect a pole crossing.
    pub fn compute<G: GeoCoding + ?Sized>(geocoding: &G, raster: RasterSize) -> Option<GeoSpan> {
        Self::compute_with(geocoding, raster, false)
    }

    /// Compute the scene span, always running the polar refinement pass.
    pub fn compute_forced_polar<G: GeoCoding + ?Sized>(
        geocoding: &G,
        raster: RasterSize,
    ) -> Option<GeoSpan> {
        Self::compute_with(geocoding, raster, true)
    }

    fn compute_with<G: GeoCoding + ?Sized>(
        geocoding: &G,
        raster: RasterSize,
        force_polar: bool,
    ) -> Option<GeoSpan> {
        if raster.width < 1 || raster.height < 1 {
            return None;
        }

        let lon = combined_lon_span(geocoding, raster)?;
        let lat = combined_lat_span(geocoding, raster)?;

        let mut span = GeoSpan {
            dateline_crossed: lon.dateline_crossed,
            north_pole_crossed: lon.north_pole_crossed || lat.north_pole_crossed,
            south_pole_crossed: lon.south_pole_crossed || lat.south_pole_crossed,
            equidistant_cylindrical: is_equidistant_cylindrical(geocoding, raster),
            polar: None,
            lon,
            lat,
        };

        if span.north_pole_crossed || span.south_pole_crossed || force_polar {
            if let Some(polar) = PolarCoords::refine(geocoding, raster) {
                span.lat.max_lat = polar.northernmost.geo.lat;
                span.lat.min_lat = polar.southernmost.geo.lat;
                if polar.north_pole_detected {
                    span.north_pole_crossed = true;
                }
                if polar.south_pole_detected {
                    span.south_pole_crossed = true;
                }
                span.polar = Some(polar);
            }
        }

        tracing::debug!(
            lon_span = span.lon.span,
            lat_span = span.lat.span,
            dateline = span.dateline_crossed,
            north_pole = span.north_pole_crossed,
            south_pole = span.south_pole_crossed,
            equidistant = span.equidistant_cylindrical,
            "computed scene geo span"
        );

        Some(span)
    }
}

/// Row/column indices at 0%, 25%, 50%, 75% and 100% of the axis,
/// scanned center-first so the center line seeds the merge.
fn sample_lines(extent: usize) -> [usize; 5] {
    let last = extent - 1;
    [
        (last as f64 * 0.5).floor() as usize,
        (last as f64 * 0.25).floor() as usize,
        (last as f64 * 0.75).floor() as usize,
        0,
        last,
    ]
}

fn combined_lon_span<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
) -> Option<LonSpan> {
    let mut combined = LonSpan::EMPTY;
    for row in sample_lines(raster.height) {
        if let Some(line) = scan_row_lon(geocoding, raster, row) {
            combined = combined.merged(&line);
        }
    }
    if !combined.is_valid() {
        return None;
    }

    // Recompute from the merged bounds and keep the larger value, in
    // case the merge underestimated the extent.
    let recomputed = if combined.ascending && !combined.descending {
        combined.last_lon - combined.first_lon
            + if combined.dateline_crossed { 360.0 } else { 0.0 }
    } else if combined.descending && !combined.ascending {
        combined.first_lon - combined.last_lon
            + if combined.dateline_crossed { 360.0 } else { 0.0 }
    } else {
        360.0
    };
    combined.span = combined.span.max(recomputed.abs());

    Some(combined)
}

fn combined_lat_span<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
) -> Option<LatSpan> {
    let mut combined = LatSpan::EMPTY;
    for column in sample_lines(raster.width) {
        if let Some(line) = scan_column_lat(geocoding, raster, column) {
            combined = combined.merged(&line);
        }
    }
    if !combined.is_valid() {
        return None;
    }

    let recomputed = if combined.north_pole_crossed {
        (90.0 - combined.last_lat).abs() + (90.0 - combined.first_lat).abs()
    } else if combined.south_pole_crossed {
        (-90.0 - combined.last_lat).abs() + (-90.0 - combined.first_lat).abs()
    } else {
        (combined.last_lat - combined.first_lat).abs()
    };
    combined.span = combined.span.max(recomputed);

    Some(combined)
}

/// True only if latitude is exactly constant along each of three
/// sampled rows and longitude exactly constant along each of three
/// sampled columns. Sample lines outside the raster pass trivially.
fn is_equidistant_cylindrical<G: GeoCoding + ?Sized>(geocoding: &G, raster: RasterSize) -> bool {
    let rows = [raster.height / 2, 5, raster.height.saturating_sub(5)];
    for row in rows {
        if !row_has_constant_lat(geocoding, raster, row) {
            return false;
        }
    }

    let columns = [raster.width / 2, 5, raster.width.saturating_sub(5)];
    for column in columns {
        if !column_has_constant_lon(geocoding, raster, column) {
            return false;
        }
    }
    true
}

fn row_has_constant_lat<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    row: usize,
) -> bool {
    if row >= raster.height {
        return true;
    }
    let mut reference: Option<f64> = None;
    for x in 0..raster.width {
        let geo = geocoding.geo_pos(PixelPos::new(x as f64, row as f64));
        if !is_valid_lat(geo.lat) {
            continue;
        }
        match reference {
            Some(lat) if geo.lat != lat => return false,
            Some(_) => {}
            None => reference = Some(geo.lat),
        }
    }
    true
}

fn column_has_constant_lon<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    column: usize,
) -> bool {
    if column >= raster.width {
        return true;
    }
    let mut reference: Option<f64> = None;
    for y in 0..raster.height {
        let geo = geocoding.geo_pos(PixelPos::new(column as f64, y as f64));
        if !is_valid_lon(geo.lon) {
            continue;
        }
        match reference {
            Some(lon) if geo.lon != lon => return false,
            Some(_) => {}
            None => reference = Some(geo.lon),
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lines_cover_fractions() {
        assert_eq!(sample_lines(101), [50, 25, 75, 0, 100]);
        assert_eq!(sample_lines(1), [0, 0, 0, 0, 0]);
    }
}

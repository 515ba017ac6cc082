//! Graticule construction.

use crate::boundary::{boundary_stride, create_geo_boundary};
use crate::config::{
    default_minor_subdivisions, sensible_degree_increment, GraticuleConfig, MIN_RASTER_DIM,
};
use crate::glyphs::{
    corner_lat_glyphs, corner_lon_glyphs, east_glyphs, edge_ticks, north_glyphs, south_glyphs,
    west_glyphs, LineEnd, TextGlyph,
};
use crate::intersect::{meridian_intersections, parallel_intersections};
use geo_common::{limit_lon, Coord, GeoPos, PixelPos, RasterSize};
use geo_span::GeoSpan;
use projection::GeoCoding;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Hard cap on lines per family, in case a caller-supplied step is far
/// too tight for the scene.
const LINES_MAX: usize = 200;

/// One meridian or parallel: ordered geo/pixel coordinate pairs.
///
/// Pixel positions may be invalid where the geocoding has no footprint;
/// the drawable [`LinePath`] restarts there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraticuleLine {
    pub coords: Vec<Coord>,
}

/// Drawable form of one line: polyline pieces split wherever an invalid
/// pixel interrupts continuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    pub pieces: Vec<Vec<PixelPos>>,
}

/// A geometric representation of a geographic grid measured in
/// longitudes and latitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graticule {
    pub parallels: Vec<GraticuleLine>,
    pub meridians: Vec<GraticuleLine>,
    pub parallel_paths: Vec<LinePath>,
    pub meridian_paths: Vec<LinePath>,
    /// Longitude labels along the north edge
    pub glyphs_north: Vec<TextGlyph>,
    /// Longitude labels along the south edge
    pub glyphs_south: Vec<TextGlyph>,
    /// Latitude labels down the west edge
    pub glyphs_west: Vec<TextGlyph>,
    /// Latitude labels down the east edge
    pub glyphs_east: Vec<TextGlyph>,
    pub glyphs_lat_corners: Vec<TextGlyph>,
    pub glyphs_lon_corners: Vec<TextGlyph>,
    pub ticks_north: Vec<PixelPos>,
    pub ticks_south: Vec<PixelPos>,
    pub ticks_west: Vec<PixelPos>,
    pub ticks_east: Vec<PixelPos>,
    /// True when the latitude axis runs descending-only
    pub flipped_lats: bool,
    /// True when the longitude axis runs descending-only
    pub flipped_lons: bool,
    /// Degrees between parallels, after auto-selection
    pub lat_major_step: f64,
    /// Degrees between meridians, after auto-selection
    pub lon_major_step: f64,
}

impl Graticule {
    /// Build the graticule for a geocoded raster.
    ///
    /// Returns `None` for rasters smaller than 16x16 in either
    /// dimension or without usable geocoding samples.
    pub fn build<G: GeoCoding + ?Sized>(
        geocoding: &G,
        raster: RasterSize,
        config: &GraticuleConfig,
    ) -> Option<Graticule> {
        if raster.width < MIN_RASTER_DIM || raster.height < MIN_RASTER_DIM {
            return None;
        }
        let span = GeoSpan::compute(geocoding, raster)?;

        let line_count = config.desired_line_count.max(2) as f64;
        let auto_lat = config.lat_major_step.filter(|s| *s > 0.0).is_none();
        let auto_lon = config.lon_major_step.filter(|s| *s > 0.0).is_none();
        let mut lat_step = config
            .lat_major_step
            .filter(|s| *s > 0.0)
            .unwrap_or_else(|| sensible_degree_increment(span.lat.span / line_count));
        let mut lon_step = config
            .lon_major_step
            .filter(|s| *s > 0.0)
            .unwrap_or_else(|| sensible_degree_increment(span.lon.span / line_count));
        if auto_lat && auto_lon {
            // Same spacing on both axes when both are auto-selected
            lat_step = lat_step.min(lon_step);
            lon_step = lat_step;
        }

        let mut minor = config
            .minor_subdivisions
            .unwrap_or_else(|| default_minor_subdivisions(raster));
        if span.north_pole_crossed || span.south_pole_crossed {
            minor = minor.max(256);
        }
        if span.equidistant_cylindrical {
            // Straight lines in pixel space need almost no sampling
            minor = 4;
        }
        let lon_minor = lon_step / minor as f64;
        let lat_minor = lat_step / minor as f64;

        let stride = boundary_stride(geocoding, raster);
        let boundary = create_geo_boundary(geocoding, raster, stride);
        if boundary.len() < 4 {
            return None;
        }

        let mut parallels = Vec::new();
        for lat in candidate_parallels(&span, lat_step) {
            parallels.extend(build_parallel(geocoding, &boundary, lat, lon_minor));
        }
        let mut meridians = Vec::new();
        for lon in candidate_meridians(&span, lon_step) {
            meridians.extend(build_meridian(geocoding, &boundary, lon, lat_minor));
        }

        let parallel_paths = parallels.iter().map(line_path).collect();
        let meridian_paths = meridians.iter().map(line_path).collect();

        let format = config.label_format;
        let graticule = Graticule {
            glyphs_north: north_glyphs(&meridians, &span, raster, format),
            glyphs_south: south_glyphs(&meridians, &span, raster, format),
            glyphs_west: west_glyphs(&parallels, &span, raster, format),
            glyphs_east: east_glyphs(&parallels, &span, raster, format),
            glyphs_lat_corners: corner_lat_glyphs(geocoding, raster, format),
            glyphs_lon_corners: corner_lon_glyphs(geocoding, raster, format),
            ticks_north: edge_ticks(&meridians, LineEnd::First),
            ticks_south: edge_ticks(&meridians, LineEnd::Last),
            ticks_west: edge_ticks(&parallels, LineEnd::First),
            ticks_east: edge_ticks(&parallels, LineEnd::Last),
            flipped_lats: span.lat.descending && !span.lat.ascending,
            flipped_lons: span.lon.descending && !span.lon.ascending,
            lat_major_step: lat_step,
            lon_major_step: lon_step,
            parallels,
            meridians,
            parallel_paths,
            meridian_paths,
        };

        tracing::debug!(
            parallels = graticule.parallels.len(),
            meridians = graticule.meridians.len(),
            lat_step,
            lon_step,
            minor,
            stride,
            "built graticule"
        );

        Some(graticule)
    }
}

/// Candidate parallel latitudes: multiples of the step anchored at the
/// equator, covering the scene's latitude range widened by one step.
/// The pole itself is forced in when the scene crosses it.
fn candidate_parallels(span: &GeoSpan, step: f64) -> Vec<f64> {
    let mut min = (span.lat.min_lat - step).max(-90.0);
    let mut max = (span.lat.max_lat + step).min(90.0);
    if span.north_pole_crossed && max > 80.0 {
        max = 90.0;
    }
    if span.south_pole_crossed && min < -80.0 {
        min = -90.0;
    }

    let mut lats = Vec::new();
    let mut found_north_pole = false;
    let mut found_south_pole = false;

    if max >= 0.0 {
        let mut lat = 0.0;
        while lat <= max && lats.len() <= LINES_MAX {
            if lat >= min {
                lats.push(lat);
                if lat == 90.0 {
                    found_north_pole = true;
                }
            }
            lat += step;
        }
    }
    if max == 90.0 && !found_north_pole {
        lats.push(90.0);
    }

    if min < 0.0 {
        let mut lat = -step;
        while lat >= min && lats.len() <= LINES_MAX {
            if lat <= max {
                lats.push(lat);
                if lat == -90.0 {
                    found_south_pole = true;
                }
            }
            lat -= step;
        }
    }
    if min == -90.0 && !found_south_pole {
        lats.push(-90.0);
    }

    lats
}

/// Candidate meridian longitudes, anchored at the prime meridian. For
/// seam-crossing scenes the candidates are generated east and west of
/// the antimeridian separately; scenes spanning 90 degrees or more, or
/// with ambiguous scan direction, get the full earth.
fn candidate_meridians(span: &GeoSpan, step: f64) -> Vec<f64> {
    let mut force_full_earth = false;
    let (mut min, mut max);
    if span.lon.span >= 90.0 {
        force_full_earth = true;
        min = -180.0;
        max = 180.0;
    } else if span.lon.ascending && !span.lon.descending {
        min = span.lon.first_lon.floor();
        max = span.lon.last_lon.ceil();
    } else if span.lon.descending && !span.lon.ascending {
        min = span.lon.last_lon.floor();
        max = span.lon.first_lon.ceil();
    } else {
        force_full_earth = true;
        min = -180.0;
        max = 180.0;
    }

    min = (min - step).max(-180.0);
    max = (max + step).min(180.0);

    let mut lons = Vec::new();
    if span.dateline_crossed && !force_full_earth {
        // East of the seam
        let mut lon = -180.0 + step;
        while lon <= max && lons.len() <= LINES_MAX {
            lons.push(lon);
            lon += step;
        }
        // West of the seam
        let mut lon = 180.0;
        while lon >= min && lons.len() <= LINES_MAX {
            lons.push(lon);
            lon -= step;
        }
    } else {
        if max >= 0.0 {
            let mut lon = 0.0;
            while lon <= max && lons.len() <= LINES_MAX {
                if lon >= min {
                    lons.push(lon);
                }
                lon += step;
            }
        }
        if min < 0.0 {
            let mut lon = -step;
            while lon >= min && lons.len() <= LINES_MAX {
                if lon <= max {
                    lons.push(lon);
                }
                lon -= step;
            }
        }
    }

    lons
}

/// Build the line segments for one parallel: pair the sorted boundary
/// crossings left to right and walk each pair in minor steps.
fn build_parallel<G: GeoCoding + ?Sized>(
    geocoding: &G,
    boundary: &[GeoPos],
    lat: f64,
    lon_minor_step: f64,
) -> Vec<GraticuleLine> {
    let mut crossings = parallel_intersections(boundary, lat);
    if crossings.is_empty() {
        return Vec::new();
    }
    if crossings.len() % 2 != 0 {
        // Tangent or degenerate crossing, not drawable as spans
        tracing::warn!(
            lat,
            crossings = crossings.len(),
            "skipping parallel with odd boundary crossing count"
        );
        return Vec::new();
    }
    crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut lines = Vec::new();
    for pair in crossings.chunks(2) {
        let line = walk_parallel(geocoding, lat, pair[0], pair[1], lon_minor_step);
        if line.coords.iter().filter(|c| c.is_valid()).count() >= 2 {
            lines.push(line);
        }
    }
    lines
}

fn walk_parallel<G: GeoCoding + ?Sized>(
    geocoding: &G,
    lat: f64,
    lon_start: f64,
    lon_end: f64,
    step: f64,
) -> GraticuleLine {
    let mut coords = Vec::new();
    let mut lon = lon_start;
    let mut done = false;
    while !done {
        if lon >= lon_end {
            lon = lon_end;
            done = true;
        }
        let geo = GeoPos::new(lat, limit_lon(lon));
        coords.push(Coord::new(geo, geocoding.pixel_pos(geo)));
        lon += step;
    }
    GraticuleLine { coords }
}

/// Build the line segments for one meridian: crossings are paired north
/// to south and each pair is walked in decreasing latitude. The
/// candidate longitude is shifted into the boundary's unwrapped branch
/// before intersection testing.
fn build_meridian<G: GeoCoding + ?Sized>(
    geocoding: &G,
    boundary: &[GeoPos],
    lon_candidate: f64,
    lat_minor_step: f64,
) -> Vec<GraticuleLine> {
    let mut lon_min = f64::INFINITY;
    let mut lon_max = f64::NEG_INFINITY;
    for geo in boundary {
        lon_min = lon_min.min(geo.lon);
        lon_max = lon_max.max(geo.lon);
    }

    let mut crossings = Vec::new();
    let mut lon = lon_candidate;
    for shift in [-360.0, 0.0, 360.0] {
        let shifted = lon_candidate + shift;
        if shifted >= lon_min && shifted <= lon_max {
            let mut found = meridian_intersections(boundary, shifted);
            if !found.is_empty() {
                lon = shifted;
            }
            crossings.append(&mut found);
        }
    }

    if crossings.is_empty() {
        return Vec::new();
    }
    if crossings.len() % 2 != 0 {
        tracing::warn!(
            lon = lon_candidate,
            crossings = crossings.len(),
            "skipping meridian with odd boundary crossing count"
        );
        return Vec::new();
    }
    // North to south
    crossings.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let mut lines = Vec::new();
    for pair in crossings.chunks(2) {
        let line = walk_meridian(geocoding, lon, pair[0], pair[1], lat_minor_step);
        if line.coords.iter().filter(|c| c.is_valid()).count() >= 2 {
            lines.push(line);
        }
    }
    lines
}

fn walk_meridian<G: GeoCoding + ?Sized>(
    geocoding: &G,
    lon: f64,
    lat_start: f64,
    lat_end: f64,
    step: f64,
) -> GraticuleLine {
    let mut coords = Vec::new();
    let mut lat = lat_start;
    let mut done = false;
    while !done {
        if lat <= lat_end {
            lat = lat_end;
            done = true;
        }
        let geo = GeoPos::new(lat, limit_lon(lon));
        coords.push(Coord::new(geo, geocoding.pixel_pos(geo)));
        lat -= step;
    }
    GraticuleLine { coords }
}

/// Split a line into drawable polyline pieces at invalid pixels:
/// move-to at the first valid point, line-to while continuity holds,
/// restart after each interruption.
fn line_path(line: &GraticuleLine) -> LinePath {
    let mut pieces = Vec::new();
    let mut current: Vec<PixelPos> = Vec::new();
    for coord in &line.coords {
        if coord.pixel.is_valid() {
            current.push(coord.pixel);
        } else if current.len() >= 2 {
            pieces.push(std::mem::take(&mut current));
        } else {
            current.clear();
        }
    }
    if current.len() >= 2 {
        pieces.push(current);
    }
    LinePath { pieces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_span::{LatSpan, LonSpan};

    fn span_with(lon: LonSpan, lat: LatSpan) -> GeoSpan {
        GeoSpan {
            dateline_crossed: lon.dateline_crossed,
            north_pole_crossed: false,
            south_pole_crossed: false,
            equidistant_cylindrical: false,
            polar: None,
            lon,
            lat,
        }
    }

    fn lon_span(first: f64, last: f64, span: f64) -> LonSpan {
        LonSpan {
            first_lon: first,
            last_lon: last,
            span,
            dateline_crossed: false,
            north_pole_crossed: false,
            south_pole_crossed: false,
            ascending: true,
            descending: false,
        }
    }

    fn lat_span(min: f64, max: f64) -> LatSpan {
        LatSpan {
            first_lat: min,
            last_lat: max,
            min_lat: min,
            max_lat: max,
            span: max - min,
            north_pole_crossed: false,
            south_pole_crossed: false,
            ascending: true,
            descending: false,
        }
    }

    #[test]
    fn test_candidate_parallels_cover_range_with_buffer() {
        let span = span_with(lon_span(0.0, 10.0, 10.0), lat_span(12.0, 38.0));
        let mut lats = candidate_parallels(&span, 10.0);
        lats.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // Range widened by one step: [2, 48] -> multiples of 10
        assert_eq!(lats, vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_candidate_parallels_span_equator() {
        let span = span_with(lon_span(0.0, 10.0, 10.0), lat_span(-15.0, 15.0));
        let mut lats = candidate_parallels(&span, 10.0);
        lats.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(lats, vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_candidate_meridians_cover_range() {
        let span = span_with(lon_span(-23.0, 17.0, 40.0), lat_span(0.0, 10.0));
        let mut lons = candidate_meridians(&span, 10.0);
        lons.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(lons, vec![-30.0, -20.0, -10.0, 0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_candidate_meridians_across_seam() {
        let mut lon = lon_span(170.0, -170.0, 20.0);
        lon.dateline_crossed = true;
        let span = span_with(lon, lat_span(50.0, 60.0));
        let mut lons = candidate_meridians(&span, 10.0);
        lons.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // Both sides of the seam, one step of buffer on each
        assert_eq!(lons, vec![-170.0, -160.0, 160.0, 170.0, 180.0]);
    }

    #[test]
    fn test_line_path_restarts_at_invalid_pixels() {
        let valid = |x: f64| Coord::new(GeoPos::new(0.0, x), PixelPos::new(x, 1.0));
        let invalid = Coord::new(GeoPos::new(0.0, 0.0), PixelPos::INVALID);
        let line = GraticuleLine {
            coords: vec![
                valid(0.0),
                valid(1.0),
                invalid,
                valid(3.0),
                valid(4.0),
                valid(5.0),
            ],
        };
        let path = line_path(&line);
        assert_eq!(path.pieces.len(), 2);
        assert_eq!(path.pieces[0].len(), 2);
        assert_eq!(path.pieces[1].len(), 3);
    }
}

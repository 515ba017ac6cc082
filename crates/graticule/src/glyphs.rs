//! Label glyphs and tick anchors for graticule lines.

use crate::builder::GraticuleLine;
use geo_common::{format_lat, format_lon, AngleFormat, Coord, PixelPos, RasterSize};
use geo_span::GeoSpan;
use projection::GeoCoding;
use serde::{Deserialize, Serialize};

/// Pixels from the raster edge within which an edge label may anchor
/// when labels are restricted to the scene border.
const EDGE_BUFFER_PX: f64 = 3.0;

/// A rendered label: text, anchor pixel and rotation.
///
/// The angle points from the anchor toward its interior neighbor, so
/// text reads outward from the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGlyph {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Rotation in radians
    pub angle: f64,
}

impl TextGlyph {
    fn new(text: String, anchor: PixelPos, toward: PixelPos) -> Self {
        Self {
            text,
            x: anchor.x,
            y: anchor.y,
            angle: (toward.y - anchor.y).atan2(toward.x - anchor.x),
        }
    }
}

/// Which end of a line a label or tick anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEnd {
    First,
    Last,
}

fn end_coord(line: &GraticuleLine, end: LineEnd) -> Option<&Coord> {
    if line.coords.len() < 2 {
        return None;
    }
    match end {
        LineEnd::First => line.coords.first(),
        LineEnd::Last => line.coords.last(),
    }
}

/// Build the glyphs for one edge of the scene.
///
/// `toward` is the unit pixel offset into the raster interior, which
/// fixes the text orientation; `within_edge` gates anchors to the scene
/// border for small scenes, matching the span-based restriction.
#[allow(clippy::too_many_arguments)]
fn edge_glyphs(
    lines: &[GraticuleLine],
    end: LineEnd,
    toward: (f64, f64),
    latitude_labels: bool,
    restrict_to_edge: bool,
    within_edge: impl Fn(PixelPos) -> bool,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    let mut glyphs = Vec::new();
    for line in lines {
        let Some(anchor) = end_coord(line, end) else {
            continue;
        };
        if !anchor.pixel.is_valid() {
            continue;
        }
        if restrict_to_edge && !within_edge(anchor.pixel) {
            continue;
        }

        let text = if latitude_labels {
            format_lat(anchor.geo.lat, format)
        } else {
            format_lon(anchor.geo.lon, format)
        };
        let neighbor = PixelPos::new(anchor.pixel.x + toward.0, anchor.pixel.y + toward.1);
        glyphs.push(TextGlyph::new(text, anchor.pixel, neighbor));
    }
    glyphs
}

/// Small scenes label only their borders; larger scenes may label any
/// line endpoint.
fn restrict_to_edge(span: &GeoSpan) -> bool {
    span.lon.span < 180.0 && span.lat.span < 90.0
}

/// Latitude labels down the west edge: first point of each parallel,
/// text pointing east into the image.
pub(crate) fn west_glyphs(
    parallels: &[GraticuleLine],
    span: &GeoSpan,
    _raster: RasterSize,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    edge_glyphs(
        parallels,
        LineEnd::First,
        (1.0, 0.0),
        true,
        restrict_to_edge(span),
        |p| p.x <= EDGE_BUFFER_PX,
        format,
    )
}

/// Latitude labels down the east edge: last point of each parallel,
/// text pointing west into the image.
pub(crate) fn east_glyphs(
    parallels: &[GraticuleLine],
    span: &GeoSpan,
    raster: RasterSize,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    edge_glyphs(
        parallels,
        LineEnd::Last,
        (-1.0, 0.0),
        true,
        restrict_to_edge(span),
        move |p| p.x >= raster.max_x() - EDGE_BUFFER_PX,
        format,
    )
}

/// Longitude labels along the north edge: first point of each meridian
/// (meridians are walked north to south), text pointing south.
pub(crate) fn north_glyphs(
    meridians: &[GraticuleLine],
    span: &GeoSpan,
    _raster: RasterSize,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    edge_glyphs(
        meridians,
        LineEnd::First,
        (0.0, 1.0),
        false,
        restrict_to_edge(span),
        |p| p.y <= EDGE_BUFFER_PX,
        format,
    )
}

/// Longitude labels along the south edge: last point of each meridian,
/// text pointing north.
pub(crate) fn south_glyphs(
    meridians: &[GraticuleLine],
    span: &GeoSpan,
    raster: RasterSize,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    edge_glyphs(
        meridians,
        LineEnd::Last,
        (0.0, -1.0),
        false,
        restrict_to_edge(span),
        move |p| p.y >= raster.max_y() - EDGE_BUFFER_PX,
        format,
    )
}

/// Tick anchors: the boundary-touching endpoint of each line.
pub(crate) fn edge_ticks(lines: &[GraticuleLine], end: LineEnd) -> Vec<PixelPos> {
    lines
        .iter()
        .filter_map(|line| end_coord(line, end))
        .filter(|coord| coord.pixel.is_valid())
        .map(|coord| coord.pixel)
        .collect()
}

/// Latitude labels at the four raster corners, oriented along the
/// horizontal neighbor pixel.
pub(crate) fn corner_lat_glyphs<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    corner_glyphs(geocoding, raster, format, true)
}

/// Longitude labels at the four raster corners, oriented along the
/// vertical neighbor pixel.
pub(crate) fn corner_lon_glyphs<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    format: AngleFormat,
) -> Vec<TextGlyph> {
    corner_glyphs(geocoding, raster, format, false)
}

fn corner_glyphs<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    format: AngleFormat,
    latitude_labels: bool,
) -> Vec<TextGlyph> {
    if raster.width < 2 || raster.height < 2 {
        return Vec::new();
    }
    let (max_x, max_y) = (raster.max_x(), raster.max_y());

    // Top-left, top-right, bottom-right, bottom-left: each corner pixel
    // paired with its interior neighbor for orientation.
    let corners: [(PixelPos, PixelPos); 4] = if latitude_labels {
        [
            (PixelPos::new(0.0, 0.0), PixelPos::new(1.0, 0.0)),
            (PixelPos::new(max_x, 0.0), PixelPos::new(max_x - 1.0, 0.0)),
            (
                PixelPos::new(max_x, max_y),
                PixelPos::new(max_x - 1.0, max_y),
            ),
            (PixelPos::new(0.0, max_y), PixelPos::new(1.0, max_y)),
        ]
    } else {
        [
            (PixelPos::new(0.0, 0.0), PixelPos::new(0.0, 1.0)),
            (PixelPos::new(max_x, 0.0), PixelPos::new(max_x, 1.0)),
            (
                PixelPos::new(max_x, max_y),
                PixelPos::new(max_x, max_y - 1.0),
            ),
            (PixelPos::new(0.0, max_y), PixelPos::new(0.0, max_y - 1.0)),
        ]
    };

    let mut glyphs = Vec::new();
    for (anchor, neighbor) in corners {
        let geo = geocoding.geo_pos(anchor);
        if !geo.is_valid() {
            continue;
        }
        let text = if latitude_labels {
            format_lat(geo.lat, format)
        } else {
            format_lon(geo.lon, format)
        };
        glyphs.push(TextGlyph::new(text, anchor, neighbor));
    }
    glyphs
}

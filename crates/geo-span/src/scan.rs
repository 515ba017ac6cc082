//! Scan-line sweeps that build per-line spans.

use crate::span::{Direction, LatSpan, LonSpan};
use geo_common::{is_valid_lat, is_valid_lon, PixelPos, RasterSize};
use projection::GeoCoding;

/// Consecutive same-direction deltas required before a direction is
/// committed. Hysteresis against single-pixel jitter.
const DIRECTION_TRIGGER: usize = 5;

/// A longitude jump of at least 360 minus this buffer between adjacent
/// pixels is read as an antimeridian crossing.
const DATELINE_BUFFER_DEG: f64 = 30.0;

/// A committed direction reversal beyond this latitude is read as a
/// pole transit.
const POLE_REVERSAL_LAT_DEG: f64 = 70.0;

/// Hysteresis direction tracker with states {NotSet, Ascending,
/// Descending} and a counter; the committed direction changes only
/// after [`DIRECTION_TRIGGER`] consecutive same-direction deltas.
#[derive(Debug)]
pub(crate) struct DirectionTracker {
    micro: Direction,
    count: usize,
    committed: Direction,
}

impl DirectionTracker {
    pub(crate) fn new() -> Self {
        Self {
            micro: Direction::NotSet,
            count: 0,
            committed: Direction::NotSet,
        }
    }

    /// Feed one pixel-to-pixel delta direction. Returns the previously
    /// committed direction when this observation flips the commitment.
    pub(crate) fn observe(&mut self, direction: Direction) -> Option<Direction> {
        if self.micro != direction {
            self.micro = direction;
            self.count = 0;
        }
        self.count += 1;

        if self.count >= DIRECTION_TRIGGER && self.committed != direction {
            let previous = self.committed;
            self.committed = direction;
            return Some(previous);
        }
        None
    }
}

/// Scan one raster row left to right and build its longitude span.
///
/// Returns `None` when the row has no valid longitude sample at all.
pub(crate) fn scan_row_lon<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    row: usize,
) -> Option<LonSpan> {
    let mut first_lon: Option<f64> = None;
    let mut last_lon = 0.0;
    let mut prev_lon: Option<f64> = None;
    let mut dateline_crossed = false;
    let mut north_pole_crossed = false;
    let mut south_pole_crossed = false;
    let mut ascending = false;
    let mut descending = false;
    let mut tracker = DirectionTracker::new();

    for x in 0..raster.width {
        let geo = geocoding.geo_pos(PixelPos::new(x as f64, row as f64));
        if !is_valid_lon(geo.lon) {
            continue;
        }

        if first_lon.is_none() {
            first_lon = Some(geo.lon);
            last_lon = geo.lon;
        } else if let Some(prev) = prev_lon {
            last_lon = geo.lon;

            let mut seam_ascending = false;
            let mut seam_descending = false;
            if (geo.lon - prev).abs() >= 360.0 - DATELINE_BUFFER_DEG {
                if geo.lon <= -180.0 + DATELINE_BUFFER_DEG && prev >= 180.0 - DATELINE_BUFFER_DEG {
                    seam_ascending = true;
                } else {
                    seam_descending = true;
                }
                dateline_crossed = true;
            }

            let observed = if geo.lon > prev || seam_ascending {
                Some(Direction::Ascending)
            } else if geo.lon < prev || seam_descending {
                Some(Direction::Descending)
            } else {
                None
            };

            if let Some(direction) = observed {
                if let Some(previous) = tracker.observe(direction) {
                    if previous != Direction::NotSet {
                        if geo.lat > POLE_REVERSAL_LAT_DEG {
                            north_pole_crossed = true;
                        } else if geo.lat < -POLE_REVERSAL_LAT_DEG {
                            south_pole_crossed = true;
                        }
                    }
                    match direction {
                        Direction::Ascending => ascending = true,
                        Direction::Descending => descending = true,
                        Direction::NotSet => {}
                    }
                }
            }
        }

        prev_lon = Some(geo.lon);
    }

    let first_lon = first_lon?;
    let span = if ascending && !descending {
        last_lon - first_lon + if dateline_crossed { 360.0 } else { 0.0 }
    } else if descending && !ascending {
        first_lon - last_lon + if dateline_crossed { 360.0 } else { 0.0 }
    } else {
        // Both or neither direction committed, likely a pole transit
        360.0
    };

    Some(LonSpan {
        first_lon,
        last_lon,
        span: span.abs(),
        dateline_crossed,
        north_pole_crossed,
        south_pole_crossed,
        ascending,
        descending,
    })
}

/// Scan one raster column from the bottom row upward and build its
/// latitude span, tracking min/max independently of the endpoints.
///
/// Returns `None` when the column has no valid latitude sample at all.
pub(crate) fn scan_column_lat<G: GeoCoding + ?Sized>(
    geocoding: &G,
    raster: RasterSize,
    column: usize,
) -> Option<LatSpan> {
    let mut first_lat: Option<f64> = None;
    let mut last_lat = 0.0;
    let mut min_lat = f64::NAN;
    let mut max_lat = f64::NAN;
    let mut prev_lat: Option<f64> = None;
    let mut north_pole_crossed = false;
    let mut south_pole_crossed = false;
    let mut ascending = false;
    let mut descending = false;
    let mut tracker = DirectionTracker::new();

    for offset in 0..raster.height {
        let y = raster.height - 1 - offset;
        let geo = geocoding.geo_pos(PixelPos::new(column as f64, y as f64));
        if !is_valid_lat(geo.lat) {
            continue;
        }

        if min_lat.is_nan() || geo.lat < min_lat {
            min_lat = geo.lat;
        }
        if max_lat.is_nan() || geo.lat > max_lat {
            max_lat = geo.lat;
        }

        if first_lat.is_none() {
            first_lat = Some(geo.lat);
            last_lat = geo.lat;
        } else if let Some(prev) = prev_lat {
            last_lat = geo.lat;

            let observed = if geo.lat > prev {
                Some(Direction::Ascending)
            } else if geo.lat < prev {
                Some(Direction::Descending)
            } else {
                None
            };

            if let Some(direction) = observed {
                if let Some(previous) = tracker.observe(direction) {
                    match direction {
                        Direction::Ascending => {
                            if previous == Direction::Descending
                                && geo.lat < -POLE_REVERSAL_LAT_DEG
                            {
                                south_pole_crossed = true;
                            }
                            ascending = true;
                        }
                        Direction::Descending => {
                            if previous == Direction::Ascending && geo.lat > POLE_REVERSAL_LAT_DEG {
                                north_pole_crossed = true;
                            }
                            descending = true;
                        }
                        Direction::NotSet => {}
                    }
                }
            }
        }

        prev_lat = Some(geo.lat);
    }

    let first_lat = first_lat?;
    let span = if north_pole_crossed {
        (90.0 - last_lat).abs() + (90.0 - first_lat).abs()
    } else if south_pole_crossed {
        (-90.0 - last_lat).abs() + (-90.0 - first_lat).abs()
    } else {
        (last_lat - first_lat).abs()
    };

    Some(LatSpan {
        first_lat,
        last_lat,
        min_lat,
        max_lat,
        span,
        north_pole_crossed,
        south_pole_crossed,
        ascending,
        descending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_needs_consecutive_run() {
        let mut tracker = DirectionTracker::new();
        for _ in 0..4 {
            assert!(tracker.observe(Direction::Ascending).is_none());
        }
        // Fifth consecutive delta commits
        assert_eq!(
            tracker.observe(Direction::Ascending),
            Some(Direction::NotSet)
        );
        // Already committed, no further transitions
        assert!(tracker.observe(Direction::Ascending).is_none());
    }

    #[test]
    fn test_tracker_jitter_resets_count() {
        let mut tracker = DirectionTracker::new();
        for _ in 0..4 {
            tracker.observe(Direction::Ascending);
        }
        // One opposing delta resets the run
        assert!(tracker.observe(Direction::Descending).is_none());
        for _ in 0..3 {
            assert!(tracker.observe(Direction::Ascending).is_none());
        }
        // The run restarted, so the fifth sample commits again
        tracker.observe(Direction::Ascending);
        assert_eq!(
            tracker.observe(Direction::Ascending),
            Some(Direction::NotSet)
        );
    }

    #[test]
    fn test_tracker_reports_reversal() {
        let mut tracker = DirectionTracker::new();
        for _ in 0..5 {
            tracker.observe(Direction::Ascending);
        }
        for _ in 0..4 {
            assert!(tracker.observe(Direction::Descending).is_none());
        }
        assert_eq!(
            tracker.observe(Direction::Descending),
            Some(Direction::Ascending)
        );
    }
}

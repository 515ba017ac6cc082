//! Per-line angular spans and the rules for merging them.

use geo_common::{is_valid_lat, is_valid_lon};
use serde::{Deserialize, Serialize};

/// Scan direction committed by the hysteresis tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    NotSet,
    Ascending,
    Descending,
}

/// Longitude span of one scan row, or of several merged rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonSpan {
    pub first_lon: f64,
    pub last_lon: f64,
    /// Angular extent in degrees
    pub span: f64,
    pub dateline_crossed: bool,
    pub north_pole_crossed: bool,
    pub south_pole_crossed: bool,
    pub ascending: bool,
    pub descending: bool,
}

impl LonSpan {
    /// Merge identity: invalid until merged with a valid span.
    pub const EMPTY: LonSpan = LonSpan {
        first_lon: f64::NAN,
        last_lon: f64::NAN,
        span: 0.0,
        dateline_crossed: false,
        north_pole_crossed: false,
        south_pole_crossed: false,
        ascending: false,
        descending: false,
    };

    /// A span is valid only if its extent is positive and both bounds
    /// are within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.span > 0.0 && is_valid_lon(self.first_lon) && is_valid_lon(self.last_lon)
    }

    /// Merge another row's span into this one.
    ///
    /// Invalid operands are ignored, never averaged in. When both
    /// operands are valid and agree on the dateline flag and on a single
    /// scan direction, the bounds widen by min/max; when they conflict,
    /// the bounds come from the operand with the larger individual span.
    /// Boolean flags are OR-combined either way, and the merged extent
    /// is the max of the operands (the caller recomputes it from the
    /// merged bounds afterwards and keeps the larger value).
    pub fn merged(&self, other: &LonSpan) -> LonSpan {
        if !other.is_valid() {
            return *self;
        }
        if !self.is_valid() {
            return *other;
        }

        let mut out = *self;
        let same_seam = self.dateline_crossed == other.dateline_crossed;
        let both_ascending = self.ascending && !self.descending && other.ascending && !other.descending;
        let both_descending = self.descending && !self.ascending && other.descending && !other.ascending;

        if same_seam && both_ascending {
            out.first_lon = self.first_lon.min(other.first_lon);
            out.last_lon = self.last_lon.max(other.last_lon);
        } else if same_seam && both_descending {
            out.first_lon = self.first_lon.max(other.first_lon);
            out.last_lon = self.last_lon.min(other.last_lon);
        } else if other.span > self.span {
            out.first_lon = other.first_lon;
            out.last_lon = other.last_lon;
        }

        out.span = self.span.max(other.span);
        out.dateline_crossed |= other.dateline_crossed;
        out.north_pole_crossed |= other.north_pole_crossed;
        out.south_pole_crossed |= other.south_pole_crossed;
        out.ascending |= other.ascending;
        out.descending |= other.descending;
        out
    }
}

/// Latitude span of one scan column, or of several merged columns.
///
/// `min_lat`/`max_lat` are tracked independently from `first_lat`/
/// `last_lat` since a column's endpoints need not be its extrema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatSpan {
    pub first_lat: f64,
    pub last_lat: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    /// Angular extent in degrees
    pub span: f64,
    pub north_pole_crossed: bool,
    pub south_pole_crossed: bool,
    pub ascending: bool,
    pub descending: bool,
}

impl LatSpan {
    /// Merge identity: invalid until merged with a valid span.
    pub const EMPTY: LatSpan = LatSpan {
        first_lat: f64::NAN,
        last_lat: f64::NAN,
        min_lat: f64::NAN,
        max_lat: f64::NAN,
        span: 0.0,
        north_pole_crossed: false,
        south_pole_crossed: false,
        ascending: false,
        descending: false,
    };

    /// A span is valid only if its extent is positive and all bounding
    /// latitudes are within [-90, 90].
    pub fn is_valid(&self) -> bool {
        self.span > 0.0
            && is_valid_lat(self.first_lat)
            && is_valid_lat(self.last_lat)
            && is_valid_lat(self.min_lat)
            && is_valid_lat(self.max_lat)
    }

    /// Merge another column's span into this one; same policy as
    /// [`LonSpan::merged`], keyed on the pole flags instead of the
    /// dateline flag. `min_lat`/`max_lat` always widen and are clamped
    /// to the poles.
    pub fn merged(&self, other: &LatSpan) -> LatSpan {
        if !other.is_valid() {
            return *self;
        }
        if !self.is_valid() {
            return *other;
        }

        let mut out = *self;
        let same_poles = self.north_pole_crossed == other.north_pole_crossed
            && self.south_pole_crossed == other.south_pole_crossed;
        let both_ascending = self.ascending && !self.descending && other.ascending && !other.descending;
        let both_descending = self.descending && !self.ascending && other.descending && !other.ascending;

        if same_poles && both_ascending {
            out.first_lat = self.first_lat.min(other.first_lat);
            out.last_lat = self.last_lat.max(other.last_lat);
        } else if same_poles && both_descending {
            out.first_lat = self.first_lat.max(other.first_lat);
            out.last_lat = self.last_lat.min(other.last_lat);
        } else if other.span > self.span {
            out.first_lat = other.first_lat;
            out.last_lat = other.last_lat;
        }

        out.span = self.span.max(other.span);
        out.min_lat = self.min_lat.min(other.min_lat).max(-90.0);
        out.max_lat = self.max_lat.max(other.max_lat).min(90.0);
        out.north_pole_crossed |= other.north_pole_crossed;
        out.south_pole_crossed |= other.south_pole_crossed;
        out.ascending |= other.ascending;
        out.descending |= other.descending;
        out
    }
}

//! Angle-to-label formatting for graticule and corner labels.

use serde::{Deserialize, Serialize};

/// How axis labels render an angle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleFormat {
    /// Append a compass letter (N/S/E/W) instead of a sign prefix.
    pub compass: bool,
    /// Decimal degrees instead of degrees/minutes/seconds.
    pub decimal: bool,
}

impl Default for AngleFormat {
    fn default() -> Self {
        Self {
            compass: true,
            decimal: false,
        }
    }
}

/// Format a latitude value, e.g. `45°30' N` or `- 45.5°`.
pub fn format_lat(lat: f64, format: AngleFormat) -> String {
    degree_string(lat, false, format)
}

/// Format a longitude value, e.g. `120°15'30" W` or `120.2583°`.
pub fn format_lon(lon: f64, format: AngleFormat) -> String {
    degree_string(lon, true, format)
}

/// Render one decimal-degree value.
///
/// DMS form prints minutes only when minutes or seconds are nonzero and
/// seconds only when nonzero, both zero-padded to two digits.
fn degree_string(value: f64, longitudinal: bool, format: AngleFormat) -> String {
    let sign = if value == 0.0 {
        0
    } else if value < 0.0 {
        -1
    } else {
        1
    };

    let mut rest = value.abs();
    let mut degree = rest.floor() as i64;
    rest -= degree as f64;
    let mut minutes = (rest * 60.0).floor() as i64;
    rest -= minutes as f64 / 60.0;
    let mut seconds = (rest * 3600.0).round() as i64;
    if seconds == 60 {
        seconds = 0;
        minutes += 1;
        if minutes == 60 {
            minutes = 0;
            degree += 1;
        }
    }

    let mut out = String::new();
    if !format.compass && sign == -1 {
        out.push_str("- ");
    }

    if format.decimal {
        out.push_str(&format!("{}°", value.abs()));
    } else {
        out.push_str(&format!("{degree}°"));
        if minutes != 0 || seconds != 0 {
            out.push_str(&format!("{minutes:02}'"));
            if seconds != 0 {
                out.push_str(&format!("{seconds:02}\""));
            }
        }
    }

    if format.compass && sign != 0 {
        out.push(' ');
        out.push(match (sign, longitudinal) {
            (-1, true) => 'W',
            (-1, false) => 'S',
            (_, true) => 'E',
            _ => 'N',
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DMS_COMPASS: AngleFormat = AngleFormat {
        compass: true,
        decimal: false,
    };
    const DMS_SIGNED: AngleFormat = AngleFormat {
        compass: false,
        decimal: false,
    };
    const DECIMAL_COMPASS: AngleFormat = AngleFormat {
        compass: true,
        decimal: true,
    };

    #[test]
    fn test_whole_degrees() {
        assert_eq!(format_lat(45.0, DMS_COMPASS), "45° N");
        assert_eq!(format_lat(-45.0, DMS_COMPASS), "45° S");
        assert_eq!(format_lon(-120.0, DMS_COMPASS), "120° W");
        assert_eq!(format_lon(120.0, DMS_COMPASS), "120° E");
    }

    #[test]
    fn test_zero_has_no_compass_letter() {
        assert_eq!(format_lat(0.0, DMS_COMPASS), "0°");
        assert_eq!(format_lon(0.0, DMS_COMPASS), "0°");
    }

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(format_lat(45.5, DMS_COMPASS), "45°30' N");
        // 10.2583333... degrees = 10°15'30"
        assert_eq!(format_lon(10.0 + 15.5 / 60.0, DMS_COMPASS), "10°15'30\" E");
    }

    #[test]
    fn test_seconds_rounding_carries() {
        // 29.99999 degrees rounds up through seconds -> minutes -> degrees
        assert_eq!(format_lat(29.9999999, DMS_COMPASS), "30° N");
    }

    #[test]
    fn test_signed_format() {
        assert_eq!(format_lat(-45.0, DMS_SIGNED), "- 45°");
        assert_eq!(format_lat(45.0, DMS_SIGNED), "45°");
    }

    #[test]
    fn test_decimal_format() {
        assert_eq!(format_lat(-45.5, DECIMAL_COMPASS), "45.5° S");
        assert_eq!(format_lon(12.25, DECIMAL_COMPASS), "12.25° E");
    }
}

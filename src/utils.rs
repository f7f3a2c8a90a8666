/// Utility functions
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Query-string timestamp layout, e.g. `2021-05-14T00:00:00.000Z`
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parse a `datetime` query value in the wire layout (fractional seconds optional)
pub fn parse_wire_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let ndt = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S%.fZ")?;
    Ok(Utc.from_utc_datetime(&ndt))
}

/// Format an instant in the wire layout, millisecond precision
pub fn format_wire_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(WIRE_FORMAT).to_string()
}

/// RFC 3339 with a `Z` suffix and sub-second digits only when present
pub fn format_observer_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// RFC 3339 UTC timestamp, whole seconds
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// RFC 3339 local civil timestamp with its numeric offset, whole seconds
pub fn format_local(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// `%f`-style rendering used by the flat contract
pub fn fixed6(x: f64) -> String {
    format!("{:.6}", x)
}

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Great-circle angle in degrees between two (longitude-like, latitude-like)
/// sky positions, using the haversine formula
pub fn angular_separation(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let rlat1 = lat1.to_radians();
    let rlat2 = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + rlat1.cos() * rlat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    c.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_wire_datetime_fields() {
        let dt = parse_wire_datetime("2006-01-02T15:04:05.000Z").unwrap();
        assert_eq!(dt.year(), 2006);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 2);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 4);
        assert_eq!(dt.second(), 5);
    }

    #[test]
    fn test_parse_wire_datetime_without_fraction() {
        let dt = parse_wire_datetime("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_577_836_800);
    }

    #[test]
    fn test_parse_wire_datetime_rejects_garbage() {
        assert!(parse_wire_datetime("yesterday").is_err());
        assert!(parse_wire_datetime("2021-05-14").is_err());
        assert!(parse_wire_datetime("2021-05-14T00:00:00+02:00").is_err());
    }

    #[test]
    fn test_wire_round_trip_keeps_milliseconds() {
        let original = parse_wire_datetime("2021-05-14T06:52:13.250Z").unwrap();
        let text = format_wire_datetime(&original);
        assert_eq!(text, "2021-05-14T06:52:13.250Z");
        assert_eq!(parse_wire_datetime(&text).unwrap(), original);
    }

    #[test]
    fn test_format_observer_datetime_drops_zero_fraction() {
        let dt = parse_wire_datetime("2021-05-14T00:00:00.000Z").unwrap();
        assert_eq!(format_observer_datetime(&dt), "2021-05-14T00:00:00Z");
    }

    #[test]
    fn test_format_local_keeps_offset() {
        let dt = parse_wire_datetime("2021-05-14T17:57:00.000Z").unwrap();
        let hst = FixedOffset::west_opt(10 * 3600).unwrap();
        assert_eq!(format_local(&dt.with_timezone(&hst)), "2021-05-14T07:57:00-10:00");
        assert_eq!(format_utc(&dt), "2021-05-14T17:57:00Z");
    }

    #[test]
    fn test_fixed6() {
        assert_eq!(fixed6(19.798484), "19.798484");
        assert_eq!(fixed6(0.0), "0.000000");
    }

    #[test]
    fn test_normalize_degrees() {
        assert_abs_diff_eq!(normalize_degrees(-90.0), 270.0);
        assert_abs_diff_eq!(normalize_degrees(720.5), 0.5);
        assert_abs_diff_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_angular_separation_zero_distance() {
        assert_eq!(angular_separation(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_angular_separation_pole_to_equator() {
        assert_abs_diff_eq!(angular_separation(0.0, 90.0, 123.0, 0.0), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angular_separation_known_pair() {
        // Arcturus and Spica, roughly 32.8 degrees apart
        let sep = angular_separation(213.9154, 19.1825, 201.2983, -11.1614);
        assert_abs_diff_eq!(sep, 32.79, epsilon = 0.05);
    }
}

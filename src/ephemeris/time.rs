//! Julian dates and sidereal time.

use chrono::{DateTime, Utc};

use crate::utils::normalize_degrees;

/// Julian day of the J2000.0 epoch
pub const J2000: f64 = 2_451_545.0;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub fn julian_day(at: &DateTime<Utc>) -> f64 {
    let secs = at.timestamp() as f64 + at.timestamp_subsec_millis() as f64 * 1e-3;
    secs / 86_400.0 + UNIX_EPOCH_JD
}

/// Julian centuries since J2000.0
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// Greenwich mean sidereal time in degrees (Meeus 12.4)
pub fn greenwich_sidereal_time(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Local mean sidereal time in degrees for an east-positive longitude
pub fn local_sidereal_time(jd: f64, longitude: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_time(jd) + longitude)
}

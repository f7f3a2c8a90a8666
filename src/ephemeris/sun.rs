//! Low-precision solar theory (Meeus, chapter 25).

use crate::domain::EclipticCoordinate;
use crate::utils::normalize_degrees;

use super::time::julian_centuries;

pub const AU_KM: f64 = 149_597_870.7;

/// Mean obliquity of the ecliptic in degrees
pub fn mean_obliquity(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

/// Longitude of the Moon's ascending node, degrees
pub fn lunar_node(t: f64) -> f64 {
    normalize_degrees(125.044_52 - 1_934.136_261 * t)
}

/// Geometric mean longitude of the Sun, degrees
pub fn mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t)
}

/// Mean anomaly of the Sun, degrees
pub fn mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t)
}

/// Apparent ecliptic position of the Sun for a Julian day; latitude is taken as zero
pub fn solar_ecliptic(jd: f64) -> EclipticCoordinate {
    let t = julian_centuries(jd);
    let l0 = mean_longitude(t);
    let m = mean_anomaly(t).to_radians();

    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();

    let true_longitude = l0 + c;
    let omega = lunar_node(t).to_radians();
    let apparent = true_longitude - 0.005_69 - 0.004_78 * omega.sin();

    let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;
    let v = m + c.to_radians();
    let r = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * v.cos());

    EclipticCoordinate {
        longitude: normalize_degrees(apparent),
        latitude: 0.0,
        distance_km: r * AU_KM,
    }
}

/// Obliquity corrected for nutation, used with apparent solar positions
pub fn apparent_obliquity(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    mean_obliquity(t) + 0.002_56 * lunar_node(t).to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::coords::ecliptic_to_equatorial;
    use approx::assert_abs_diff_eq;

    // Meeus example 25.a: 1992 October 13.0 TD
    const JD_1992_OCT_13: f64 = 2_448_908.5;

    #[test]
    fn test_solar_ecliptic_meeus_example() {
        let ec = solar_ecliptic(JD_1992_OCT_13);
        assert_abs_diff_eq!(ec.longitude, 199.908_95, epsilon = 2e-3);
        assert_abs_diff_eq!(ec.distance_km / AU_KM, 0.997_66, epsilon = 1e-4);
    }

    #[test]
    fn test_solar_equatorial_meeus_example() {
        let ec = solar_ecliptic(JD_1992_OCT_13);
        let eq = ecliptic_to_equatorial(&ec, apparent_obliquity(JD_1992_OCT_13));
        assert_abs_diff_eq!(eq.right_ascension, 198.380_83, epsilon = 3e-3);
        assert_abs_diff_eq!(eq.declination, -7.785_07, epsilon = 3e-3);
    }
}

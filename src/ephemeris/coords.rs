//! Coordinate conversions and atmospheric corrections.

use crate::domain::{EclipticCoordinate, EquatorialCoordinate, HorizontalCoordinate, ObserverLocation};
use crate::utils::{angular_separation, normalize_degrees};

/// Ecliptic (apparent longitude/latitude) to equatorial for a given obliquity
pub fn ecliptic_to_equatorial(ec: &EclipticCoordinate, obliquity: f64) -> EquatorialCoordinate {
    let l = ec.longitude.to_radians();
    let b = ec.latitude.to_radians();
    let e = obliquity.to_radians();

    let ra = (l.sin() * e.cos() - b.tan() * e.sin()).atan2(l.cos());
    let dec = (b.sin() * e.cos() + b.cos() * e.sin() * l.sin()).clamp(-1.0, 1.0).asin();

    EquatorialCoordinate {
        right_ascension: normalize_degrees(ra.to_degrees()),
        declination: dec.to_degrees(),
    }
}

/// Geocentric altitude/azimuth of an equatorial position for a local sidereal time
pub fn equatorial_to_horizontal(
    eq: &EquatorialCoordinate,
    location: &ObserverLocation,
    local_sidereal_time: f64,
) -> HorizontalCoordinate {
    let ha = normalize_degrees(local_sidereal_time - eq.right_ascension).to_radians();
    let dec = eq.declination.to_radians();
    let lat = location.latitude.to_radians();

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos();
    let alt = sin_alt.clamp(-1.0, 1.0).asin();

    let az = (-ha.sin() * dec.cos()).atan2(dec.sin() * lat.cos() - dec.cos() * lat.sin() * ha.cos());

    HorizontalCoordinate {
        altitude: alt.to_degrees(),
        azimuth: normalize_degrees(az.to_degrees()),
    }
}

/// Atmospheric refraction in degrees for a true altitude (Saemundsson).
/// Undefined below the horizon.
pub fn refraction(altitude: f64) -> Option<f64> {
    if !(0.0..=90.0).contains(&altitude) {
        return None;
    }
    let arg = (altitude + 10.3 / (altitude + 5.11)).to_radians();
    Some(1.02 / arg.tan() / 60.0)
}

/// Relative airmass (Pickering 2002). Undefined below the horizon.
pub fn airmass(altitude: f64) -> Option<f64> {
    if !(0.0..=90.0).contains(&altitude) {
        return None;
    }
    let arg = altitude + 244.0 / (165.0 + 47.0 * altitude.powf(1.1));
    Some(1.0 / arg.to_radians().sin())
}

/// Angular distance in degrees between two equatorial positions
pub fn separation(a: &EquatorialCoordinate, b: &EquatorialCoordinate) -> f64 {
    angular_separation(a.right_ascension, a.declination, b.right_ascension, b.declination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_refraction_near_horizon() {
        // about half a degree of lift right at the horizon
        assert_abs_diff_eq!(refraction(0.18326186176169362).unwrap(), 0.457266, epsilon = 1e-3);
        assert_abs_diff_eq!(refraction(72.80058854788766).unwrap(), 0.005219, epsilon = 2e-5);
    }

    #[test]
    fn test_refraction_absent_below_horizon() {
        assert_eq!(refraction(-0.125), None);
    }

    #[test]
    fn test_airmass_values() {
        assert_abs_diff_eq!(airmass(90.0).unwrap(), 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(airmass(72.80058854788766).unwrap(), 1.0466, epsilon = 1e-3);
        assert_abs_diff_eq!(airmass(0.18326186176169362).unwrap(), 35.82, epsilon = 0.05);
        assert_eq!(airmass(-3.0), None);
    }

    #[test]
    fn test_horizontal_on_meridian() {
        let location = ObserverLocation {
            longitude: 0.0,
            latitude: 40.0,
        };
        let eq = EquatorialCoordinate {
            right_ascension: 100.0,
            declination: 10.0,
        };
        let hz = equatorial_to_horizontal(&eq, &location, 100.0);
        assert_abs_diff_eq!(hz.altitude, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hz.azimuth, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_horizontal_west_of_meridian() {
        let location = ObserverLocation {
            longitude: 0.0,
            latitude: 0.0,
        };
        let eq = EquatorialCoordinate {
            right_ascension: 0.0,
            declination: 0.0,
        };
        // six sidereal hours after transit the target sets due west
        let hz = equatorial_to_horizontal(&eq, &location, 90.0);
        assert_abs_diff_eq!(hz.altitude, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hz.azimuth, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ecliptic_to_equatorial_meeus_pollux() {
        // Meeus example 13.a, inverted: Pollux at lambda 113.215630, beta 6.684170
        let ec = EclipticCoordinate {
            longitude: 113.215_630,
            latitude: 6.684_170,
            distance_km: 0.0,
        };
        let eq = ecliptic_to_equatorial(&ec, 23.439_291_1);
        assert_abs_diff_eq!(eq.right_ascension, 116.328_942, epsilon = 1e-4);
        assert_abs_diff_eq!(eq.declination, 28.026_183, epsilon = 1e-4);
    }

    #[test]
    fn test_separation_is_symmetric() {
        let a = EquatorialCoordinate {
            right_ascension: 88.792958,
            declination: 7.407064,
        };
        let b = EquatorialCoordinate {
            right_ascension: 76.2396,
            declination: 23.5988,
        };
        assert_abs_diff_eq!(separation(&a, &b), separation(&b, &a), epsilon = 1e-12);
    }
}

//! Lunar position from the principal periodic terms of Meeus chapter 47,
//! and phase quantities derived from the Moon-Sun geometry.

use crate::domain::{EclipticCoordinate, LunarPhase};
use crate::utils::normalize_degrees;

use super::sun::{lunar_node, mean_longitude};
use super::time::julian_centuries;

/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_853;

const EARTH_RADIUS_KM: f64 = 6_378.14;

// D, M, M', F, sum_l (1e-6 deg), sum_r (1e-3 km)
const LONGITUDE_DISTANCE: [(i8, i8, i8, i8, f64, f64); 60] = [
    (0, 0, 1, 0, 6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0, 658_314.0, -2_955_968.0),
    (0, 0, 2, 0, 213_618.0, -569_925.0),
    (0, 1, 0, 0, -185_116.0, 48_888.0),
    (0, 0, 0, 2, -114_332.0, -3_149.0),
    (2, 0, -2, 0, 58_793.0, 246_158.0),
    (2, -1, -1, 0, 57_066.0, -152_138.0),
    (2, 0, 1, 0, 53_322.0, -170_733.0),
    (2, -1, 0, 0, 45_758.0, -204_586.0),
    (0, 1, -1, 0, -40_923.0, -129_620.0),
    (1, 0, 0, 0, -34_720.0, 108_743.0),
    (0, 1, 1, 0, -30_383.0, 104_755.0),
    (2, 0, 0, -2, 15_327.0, 10_321.0),
    (0, 0, 1, 2, -12_528.0, 0.0),
    (0, 0, 1, -2, 10_980.0, 79_661.0),
    (4, 0, -1, 0, 10_675.0, -34_782.0),
    (0, 0, 3, 0, 10_034.0, -23_210.0),
    (4, 0, -2, 0, 8_548.0, -21_636.0),
    (2, 1, -1, 0, -7_888.0, 24_208.0),
    (2, 1, 0, 0, -6_766.0, 30_824.0),
    (1, 0, -1, 0, -5_163.0, -8_379.0),
    (1, 1, 0, 0, 4_987.0, -16_675.0),
    (2, -1, 1, 0, 4_036.0, -12_831.0),
    (2, 0, 2, 0, 3_994.0, -10_445.0),
    (4, 0, 0, 0, 3_861.0, -11_650.0),
    (2, 0, -3, 0, 3_665.0, 14_403.0),
    (0, 1, -2, 0, -2_689.0, -7_003.0),
    (2, 0, -1, 2, -2_602.0, 0.0),
    (2, -1, -2, 0, 2_390.0, 10_056.0),
    (1, 0, 1, 0, -2_348.0, 6_322.0),
    (2, -2, 0, 0, 2_236.0, -9_884.0),
    (0, 1, 2, 0, -2_120.0, 5_751.0),
    (0, 2, 0, 0, -2_069.0, 0.0),
    (2, -2, -1, 0, 2_048.0, -4_950.0),
    (2, 0, 1, -2, -1_773.0, 4_130.0),
    (2, 0, 0, 2, -1_595.0, 0.0),
    (4, -1, -1, 0, 1_215.0, -3_958.0),
    (0, 0, 2, 2, -1_110.0, 0.0),
    (3, 0, -1, 0, -892.0, 3_258.0),
    (2, 1, 1, 0, -810.0, 2_616.0),
    (4, -1, -2, 0, 759.0, -1_897.0),
    (0, 2, -1, 0, -713.0, -2_117.0),
    (2, 2, -1, 0, -700.0, 2_354.0),
    (2, 1, -2, 0, 691.0, 0.0),
    (2, -1, 0, -2, 596.0, 0.0),
    (4, 0, 1, 0, 549.0, -1_423.0),
    (0, 0, 4, 0, 537.0, -1_117.0),
    (4, -1, 0, 0, 520.0, -1_571.0),
    (1, 0, -2, 0, -487.0, -1_739.0),
    (2, 1, 0, -2, -399.0, 0.0),
    (0, 0, 2, -2, -381.0, -4_421.0),
    (1, 1, 1, 0, 351.0, 0.0),
    (3, 0, -2, 0, -340.0, 0.0),
    (4, 0, -3, 0, 330.0, 0.0),
    (2, -1, 2, 0, 327.0, 0.0),
    (0, 2, 1, 0, -323.0, 1_165.0),
    (1, 1, -1, 0, 299.0, 0.0),
    (2, 0, 3, 0, 294.0, 0.0),
    (2, 0, -1, -2, 0.0, 8_752.0),
];

// D, M, M', F, sum_b (1e-6 deg)
const LATITUDE: [(i8, i8, i8, i8, f64); 30] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
    (0, 0, 0, 3, -1_749.0),
    (0, 1, -1, 1, -1_565.0),
    (1, 0, 0, 1, -1_491.0),
    (0, 1, 1, 1, -1_475.0),
    (0, 1, 1, -1, -1_410.0),
    (0, 1, 0, -1, -1_344.0),
    (1, 0, 0, -1, -1_335.0),
    (0, 0, 3, 1, 1_107.0),
    (4, 0, 0, -1, 1_021.0),
    (4, 0, -1, 1, 833.0),
];

/// Fundamental arguments in degrees: (L', D, M, M', F)
fn arguments(t: f64) -> (f64, f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let lp = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
        - t4 / 65_194_000.0;
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;
    (
        normalize_degrees(lp),
        normalize_degrees(d),
        normalize_degrees(m),
        normalize_degrees(mp),
        normalize_degrees(f),
    )
}

/// Nutation in longitude, degrees (low-precision series)
pub fn nutation_in_longitude(t: f64) -> f64 {
    let omega = lunar_node(t).to_radians();
    let l = mean_longitude(t).to_radians();
    let lp = arguments(t).0.to_radians();
    (-17.20 * omega.sin() - 1.32 * (2.0 * l).sin() - 0.23 * (2.0 * lp).sin()
        + 0.21 * (2.0 * omega).sin())
        / 3600.0
}

/// Geometric ecliptic position of the Moon (no nutation), distance in km
pub fn geometric_ecliptic(jd: f64) -> EclipticCoordinate {
    let t = julian_centuries(jd);
    let (lp, d, m, mp, f) = arguments(t);
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let eccentricity = |mm: i8| match mm.abs() {
        1 => e,
        2 => e * e,
        _ => 1.0,
    };
    let angle = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        (cd as f64 * d + cm as f64 * m + cmp as f64 * mp + cf as f64 * f).to_radians()
    };

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(cd, cm, cmp, cf, l, r) in LONGITUDE_DISTANCE.iter() {
        let arg = angle(cd, cm, cmp, cf);
        let k = eccentricity(cm);
        sum_l += l * k * arg.sin();
        sum_r += r * k * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, b) in LATITUDE.iter() {
        sum_b += b * eccentricity(cm) * angle(cd, cm, cmp, cf).sin();
    }

    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let (lp_r, mp_r, f_r) = (lp.to_radians(), mp.to_radians(), f.to_radians());

    sum_l += 3_958.0 * a1.sin() + 1_962.0 * (lp_r - f_r).sin() + 318.0 * a2.sin();
    sum_b += -2_235.0 * lp_r.sin() + 382.0 * a3.sin() + 175.0 * (a1 - f_r).sin()
        + 175.0 * (a1 + f_r).sin()
        + 127.0 * (lp_r - mp_r).sin()
        - 115.0 * (lp_r + mp_r).sin();

    EclipticCoordinate {
        longitude: normalize_degrees(lp + sum_l / 1_000_000.0),
        latitude: sum_b / 1_000_000.0,
        distance_km: 385_000.56 + sum_r / 1_000.0,
    }
}

/// Apparent ecliptic position of the Moon
pub fn lunar_ecliptic(jd: f64) -> EclipticCoordinate {
    let geometric = geometric_ecliptic(jd);
    EclipticCoordinate {
        longitude: normalize_degrees(
            geometric.longitude + nutation_in_longitude(julian_centuries(jd)),
        ),
        ..geometric
    }
}

/// Equatorial horizontal parallax in degrees
pub fn horizontal_parallax(distance_km: f64) -> f64 {
    (EARTH_RADIUS_KM / distance_km).clamp(-1.0, 1.0).asin().to_degrees()
}

/// True obliquity: mean obliquity plus nutation in obliquity
pub fn true_obliquity(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    let omega = lunar_node(t).to_radians();
    let l = mean_longitude(t).to_radians();
    let lp = arguments(t).0.to_radians();
    let nutation = (9.20 * omega.cos() + 0.57 * (2.0 * l).cos() + 0.10 * (2.0 * lp).cos()
        - 0.09 * (2.0 * omega).cos())
        / 3600.0;
    super::sun::mean_obliquity(t) + nutation
}

/// Phase quantities from the apparent ecliptic positions of the Moon and Sun
pub fn lunar_phase(moon: &EclipticCoordinate, sun: &EclipticCoordinate) -> LunarPhase {
    let dl = (moon.longitude - sun.longitude).to_radians();
    let beta = moon.latitude.to_radians();

    let elongation = (beta.cos() * dl.cos()).clamp(-1.0, 1.0).acos();
    let angle = (sun.distance_km * elongation.sin())
        .atan2(moon.distance_km - sun.distance_km * elongation.cos());

    LunarPhase {
        age: normalize_degrees(moon.longitude - sun.longitude) * SYNODIC_MONTH / 360.0,
        angle: angle.to_degrees(),
        elongation: elongation.to_degrees(),
        fraction: (1.0 - elongation.cos()) / 2.0,
        illumination: 100.0 * (1.0 + angle.cos()) / 2.0,
    }
}

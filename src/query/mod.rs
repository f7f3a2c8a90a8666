/// Query parameter resolution
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{EquatorialCoordinate, ObserverLocation};
use crate::utils::parse_wire_datetime;

/// Seconds between the Unix epoch and 0001-01-01T00:00:00Z
const ZERO_INSTANT_TIMESTAMP: i64 = -62_135_596_800;

/// How malformed input is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Malformed values fall back silently: datetime to the zero instant,
    /// numbers to `0`. No range checks.
    Lenient,
    /// Malformed or out-of-range values are rejected
    Strict,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("datetime '{0}' is not a valid YYYY-MM-DDTHH:MM:SS.sssZ timestamp")]
    MalformedDatetime(String),

    #[error("{name} '{value}' is not a number")]
    MalformedNumber { name: &'static str, value: String },

    #[error("{name} {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverQuery {
    pub instant: DateTime<Utc>,
    pub location: ObserverLocation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetQuery {
    pub observer: ObserverQuery,
    pub coordinate: EquatorialCoordinate,
}

struct NumericParam {
    names: &'static [&'static str],
    min: f64,
    max: f64,
    /// whether `max` itself is allowed
    max_inclusive: bool,
}

const LONGITUDE: NumericParam = NumericParam {
    names: &["longitude"],
    min: -180.0,
    max: 180.0,
    max_inclusive: true,
};

const LATITUDE: NumericParam = NumericParam {
    names: &["latitude"],
    min: -90.0,
    max: 90.0,
    max_inclusive: true,
};

const RIGHT_ASCENSION: NumericParam = NumericParam {
    names: &["ra", "rightAscension"],
    min: 0.0,
    max: 360.0,
    max_inclusive: false,
};

const DECLINATION: NumericParam = NumericParam {
    names: &["dec", "declination"],
    min: -90.0,
    max: 90.0,
    max_inclusive: true,
};

/// Turns raw query strings into typed observer and target values
#[derive(Debug, Clone, Copy)]
pub struct QueryResolver {
    policy: Policy,
}

impl QueryResolver {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// Resolve `datetime`, `longitude` and `latitude`; a missing datetime means `now`
    pub fn observer(&self, params: &HashMap<String, String>, now: DateTime<Utc>) -> Result<ObserverQuery, QueryError> {
        let instant = match params.get("datetime") {
            None => now,
            Some(raw) => self.datetime(raw)?,
        };
        let location = ObserverLocation {
            longitude: self.number(params, &LONGITUDE)?,
            latitude: self.number(params, &LATITUDE)?,
        };
        Ok(ObserverQuery { instant, location })
    }

    /// Observer values plus the target's right ascension and declination
    pub fn target(&self, params: &HashMap<String, String>, now: DateTime<Utc>) -> Result<TargetQuery, QueryError> {
        let observer = self.observer(params, now)?;
        let coordinate = EquatorialCoordinate {
            right_ascension: self.number(params, &RIGHT_ASCENSION)?,
            declination: self.number(params, &DECLINATION)?,
        };
        Ok(TargetQuery { observer, coordinate })
    }

    fn datetime(&self, raw: &str) -> Result<DateTime<Utc>, QueryError> {
        match (parse_wire_datetime(raw), self.policy) {
            (Ok(at), _) => Ok(at),
            (Err(_), Policy::Lenient) => Ok(zero_instant()),
            (Err(_), Policy::Strict) => Err(QueryError::MalformedDatetime(raw.to_string())),
        }
    }

    fn number(&self, params: &HashMap<String, String>, param: &NumericParam) -> Result<f64, QueryError> {
        let name = param.names[0];
        let Some(raw) = param.names.iter().find_map(|n| params.get(*n)) else {
            return Ok(0.0);
        };
        let parsed = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());

        match self.policy {
            Policy::Lenient => Ok(parsed.unwrap_or(0.0)),
            Policy::Strict => {
                let value = parsed.ok_or_else(|| QueryError::MalformedNumber {
                    name,
                    value: raw.clone(),
                })?;
                let below_max = if param.max_inclusive {
                    value <= param.max
                } else {
                    value < param.max
                };
                if value < param.min || !below_max {
                    return Err(QueryError::OutOfRange {
                        name,
                        value,
                        min: param.min,
                        max: param.max,
                    });
                }
                Ok(value)
            }
        }
    }
}

/// 0001-01-01T00:00:00Z, what a lenient request is anchored to when its datetime is unreadable
pub fn zero_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_INSTANT_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_defaults_when_absent() {
        for policy in [Policy::Lenient, Policy::Strict] {
            let q = QueryResolver::new(policy).target(&HashMap::new(), now()).unwrap();
            assert_eq!(q.observer.instant, now());
            assert_eq!(q.observer.location.longitude, 0.0);
            assert_eq!(q.observer.location.latitude, 0.0);
            assert_eq!(q.coordinate.right_ascension, 0.0);
            assert_eq!(q.coordinate.declination, 0.0);
        }
    }

    #[test]
    fn test_parses_observer() {
        let p = params(&[
            ("datetime", "2021-05-14T00:00:00.000Z"),
            ("longitude", "-155.468094"),
            ("latitude", "19.798484"),
        ]);
        let q = QueryResolver::new(Policy::Strict).observer(&p, now()).unwrap();
        assert_eq!(q.instant, Utc.with_ymd_and_hms(2021, 5, 14, 0, 0, 0).unwrap());
        assert_eq!(q.location.longitude, -155.468094);
        assert_eq!(q.location.latitude, 19.798484);
    }

    #[test]
    fn test_lenient_datetime_falls_back_to_zero_instant() {
        let p = params(&[("datetime", "yesterday")]);
        let q = QueryResolver::new(Policy::Lenient).observer(&p, now()).unwrap();
        assert_eq!(q.instant, Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_strict_datetime_is_rejected() {
        let p = params(&[("datetime", "2021-05-14")]);
        let err = QueryResolver::new(Policy::Strict).observer(&p, now()).unwrap_err();
        assert_eq!(err, QueryError::MalformedDatetime("2021-05-14".to_string()));
    }

    #[test]
    fn test_lenient_numbers_fall_back_to_zero() {
        let p = params(&[("longitude", "east"), ("ra", "NaN"), ("dec", "400")]);
        let q = QueryResolver::new(Policy::Lenient).target(&p, now()).unwrap();
        assert_eq!(q.observer.location.longitude, 0.0);
        assert_eq!(q.coordinate.right_ascension, 0.0);
        assert_eq!(q.coordinate.declination, 400.0);
    }

    #[test]
    fn test_strict_rejects_malformed_number() {
        let p = params(&[("ra", "12h30m")]);
        let err = QueryResolver::new(Policy::Strict).target(&p, now()).unwrap_err();
        assert!(matches!(err, QueryError::MalformedNumber { name: "ra", .. }));
    }

    #[test]
    fn test_strict_rejects_out_of_range() {
        let resolver = QueryResolver::new(Policy::Strict);
        assert!(resolver.observer(&params(&[("latitude", "90.5")]), now()).is_err());
        assert!(resolver.observer(&params(&[("longitude", "-180.1")]), now()).is_err());
        assert!(resolver.target(&params(&[("ra", "360")]), now()).is_err());
        assert!(resolver.target(&params(&[("ra", "359.99")]), now()).is_ok());
        assert!(resolver.observer(&params(&[("latitude", "-90")]), now()).is_ok());
    }

    #[test]
    fn test_coordinate_aliases() {
        let p = params(&[("rightAscension", "88.792958"), ("declination", "7.407064")]);
        let q = QueryResolver::new(Policy::Strict).target(&p, now()).unwrap();
        assert_eq!(q.coordinate.right_ascension, 88.792958);
        assert_eq!(q.coordinate.declination, 7.407064);
    }

    #[test]
    fn test_short_names_win_over_aliases() {
        let p = params(&[("ra", "10"), ("rightAscension", "20")]);
        let q = QueryResolver::new(Policy::Strict).target(&p, now()).unwrap();
        assert_eq!(q.coordinate.right_ascension, 10.0);
    }
}

/// Scripted ephemeris for exercising the services without the real engine
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{
    Body, EclipticCoordinate, EquatorialCoordinate, LocalDay, LunarPhase, ObserverLocation, PathSample, Target,
    TwilightKind, TwilightWindow,
};
use crate::ephemeris::coords::ecliptic_to_equatorial;
use crate::ephemeris::sun::AU_KM;
use crate::ephemeris::{moon, Ephemeris, EphemerisError, EphemerisResult, RiseTransitSet};
use crate::utils::normalize_degrees;

/// 2021-05-14T00:00:00Z
const EPOCH: i64 = 1_620_950_400;

/// Rise/transit/set per local date come from a table; positions move
/// linearly from a fixed epoch so properties differ between instants.
#[derive(Default)]
pub struct ScriptedEphemeris {
    days: HashMap<NaiveDate, RiseTransitSet>,
    maximum: Option<EphemerisResult<DateTime<Utc>>>,
    fail_days: bool,
    fail_at: Vec<DateTime<Utc>>,
    maximum_calls: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl ScriptedEphemeris {
    pub fn with_day(mut self, date: NaiveDate, events: RiseTransitSet) -> Self {
        self.days.insert(date, events);
        self
    }

    pub fn with_maximum(mut self, result: EphemerisResult<DateTime<Utc>>) -> Self {
        self.maximum = Some(result);
        self
    }

    pub fn failing_days(mut self) -> Self {
        self.fail_days = true;
        self
    }

    /// Position lookups at `at` fail
    pub fn failing_at(mut self, at: DateTime<Utc>) -> Self {
        self.fail_at.push(at);
        self
    }

    pub fn maximum_calls(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.maximum_calls.lock().unwrap().clone()
    }
}

impl Ephemeris for ScriptedEphemeris {
    fn ecliptic(&self, body: Body, at: DateTime<Utc>) -> EphemerisResult<EclipticCoordinate> {
        if self.fail_at.contains(&at) {
            return Err(EphemerisError::NoConvergence("scripted position"));
        }
        let hours = (at.timestamp() - EPOCH) as f64 / 3600.0;
        Ok(match body {
            Body::Sun => EclipticCoordinate {
                longitude: normalize_degrees(53.0 + 0.041 * hours),
                latitude: 0.0,
                distance_km: AU_KM,
            },
            Body::Moon => EclipticCoordinate {
                longitude: normalize_degrees(80.0 + 0.549 * hours),
                latitude: 1.5,
                distance_km: 384_400.0,
            },
        })
    }

    fn equatorial(&self, body: Body, at: DateTime<Utc>) -> EphemerisResult<EquatorialCoordinate> {
        Ok(ecliptic_to_equatorial(&self.ecliptic(body, at)?, 23.44))
    }

    fn lunar_phase(&self, at: DateTime<Utc>) -> EphemerisResult<LunarPhase> {
        Ok(moon::lunar_phase(&self.ecliptic(Body::Moon, at)?, &self.ecliptic(Body::Sun, at)?))
    }

    fn rise_transit_set(&self, _: &Target, _: &ObserverLocation, day: LocalDay) -> EphemerisResult<RiseTransitSet> {
        if self.fail_days {
            return Err(EphemerisError::NoConvergence("scripted day"));
        }
        Ok(self.days.get(&day.date).copied().unwrap_or_default())
    }

    fn time_of_maximum_altitude(
        &self,
        _: &Target,
        _: &ObserverLocation,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> EphemerisResult<DateTime<Utc>> {
        self.maximum_calls.lock().unwrap().push((from, until));
        self.maximum
            .clone()
            .unwrap_or(Err(EphemerisError::NoConvergence("unscripted maximum")))
    }

    fn day_path(&self, _: &Target, _: &ObserverLocation, _: LocalDay) -> EphemerisResult<Vec<PathSample>> {
        Ok(Vec::new())
    }

    fn twilight(&self, _: &ObserverLocation, _: LocalDay, _: TwilightKind) -> EphemerisResult<Option<TwilightWindow>> {
        Ok(None)
    }
}

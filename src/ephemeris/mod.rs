//! Ephemeris engine.
//!
//! Pure functions of an instant and coordinates: solar and lunar positions,
//! horizontal conversion, lunar phase, horizon events for one local day,
//! day-long tracks and twilight windows. Callers go through the
//! [`Ephemeris`] trait so the event logic can be exercised against fakes;
//! [`Almanac`] is the production implementation.

pub mod coords;
pub mod moon;
pub mod search;
pub mod sun;
pub mod time;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    Body, EclipticCoordinate, EquatorialCoordinate, HorizontalCoordinate, Instant, LocalDay,
    LunarPhase, ObserverLocation, PathSample, Target, TwilightKind, TwilightWindow,
};

pub use coords::{airmass, refraction, separation};

/// Rise/set altitude of the Sun's centre: refraction plus semi-diameter
pub const SOLAR_HORIZON: f64 = -0.8333;
/// Rise/set altitude of a point source: refraction only
pub const STELLAR_HORIZON: f64 = -0.5667;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    #[error("instant outside the supported calendar range")]
    InvalidInstant,

    #[error("empty search interval")]
    InvalidInterval,

    #[error("{0} search did not converge")]
    NoConvergence(&'static str),
}

pub type EphemerisResult<T> = Result<T, EphemerisError>;

/// Horizon events inside one local day, as the engine finds them.
///
/// Rise and set are each the first occurrence in the window, so a rise may
/// come after the set when the target is up across local midnight. `transit`
/// is only reported when the target clears its horizon at its highest point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiseTransitSet {
    pub rise: Option<DateTime<Utc>>,
    pub transit: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

pub trait Ephemeris: Send + Sync {
    /// Apparent geocentric ecliptic position
    fn ecliptic(&self, body: Body, at: DateTime<Utc>) -> EphemerisResult<EclipticCoordinate>;

    /// Apparent geocentric equatorial position
    fn equatorial(&self, body: Body, at: DateTime<Utc>) -> EphemerisResult<EquatorialCoordinate>;

    fn lunar_phase(&self, at: DateTime<Utc>) -> EphemerisResult<LunarPhase>;

    fn rise_transit_set(
        &self,
        target: &Target,
        location: &ObserverLocation,
        day: LocalDay,
    ) -> EphemerisResult<RiseTransitSet>;

    fn time_of_maximum_altitude(
        &self,
        target: &Target,
        location: &ObserverLocation,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> EphemerisResult<DateTime<Utc>>;

    /// Samples of the target's track while it is above its horizon during `day`
    fn day_path(
        &self,
        target: &Target,
        location: &ObserverLocation,
        day: LocalDay,
    ) -> EphemerisResult<Vec<PathSample>>;

    /// Evening-to-morning window starting on `day`, `None` if the Sun never
    /// crosses the twilight horizon
    fn twilight(
        &self,
        location: &ObserverLocation,
        day: LocalDay,
        kind: TwilightKind,
    ) -> EphemerisResult<Option<TwilightWindow>>;

    fn target_equatorial(&self, target: &Target, at: DateTime<Utc>) -> EphemerisResult<EquatorialCoordinate> {
        match target {
            Target::Sun => self.equatorial(Body::Sun, at),
            Target::Moon => self.equatorial(Body::Moon, at),
            Target::Fixed(eq) => Ok(*eq),
        }
    }

    fn horizontal(
        &self,
        at: DateTime<Utc>,
        location: &ObserverLocation,
        eq: &EquatorialCoordinate,
    ) -> HorizontalCoordinate {
        let lst = time::local_sidereal_time(time::julian_day(&at), location.longitude);
        coords::equatorial_to_horizontal(eq, location, lst)
    }
}

/// Analytic low-precision ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct Almanac;

impl Almanac {
    pub fn new() -> Self {
        Self
    }

    fn altitude(&self, target: &Target, location: &ObserverLocation, at: DateTime<Utc>) -> EphemerisResult<f64> {
        let eq = self.target_equatorial(target, at)?;
        Ok(self.horizontal(at, location, &eq).altitude)
    }

    /// Altitude relative to the target's rise/set horizon; positive means risen
    fn above_horizon(&self, target: &Target, location: &ObserverLocation, at: DateTime<Utc>) -> EphemerisResult<f64> {
        match target {
            Target::Sun => Ok(self.altitude(target, location, at)? - SOLAR_HORIZON),
            Target::Fixed(_) => Ok(self.altitude(target, location, at)? - STELLAR_HORIZON),
            Target::Moon => {
                let jd = time::julian_day(&at);
                let ec = moon::lunar_ecliptic(jd);
                let eq = coords::ecliptic_to_equatorial(&ec, moon::true_obliquity(jd));
                let h0 = 0.7275 * moon::horizontal_parallax(ec.distance_km) + STELLAR_HORIZON;
                Ok(self.horizontal(at, location, &eq).altitude - h0)
            }
        }
    }
}

impl Ephemeris for Almanac {
    fn ecliptic(&self, body: Body, at: DateTime<Utc>) -> EphemerisResult<EclipticCoordinate> {
        let jd = time::julian_day(&at);
        Ok(match body {
            Body::Sun => sun::solar_ecliptic(jd),
            Body::Moon => moon::lunar_ecliptic(jd),
        })
    }

    fn equatorial(&self, body: Body, at: DateTime<Utc>) -> EphemerisResult<EquatorialCoordinate> {
        let jd = time::julian_day(&at);
        let ec = self.ecliptic(body, at)?;
        let obliquity = match body {
            Body::Sun => sun::apparent_obliquity(jd),
            Body::Moon => moon::true_obliquity(jd),
        };
        Ok(coords::ecliptic_to_equatorial(&ec, obliquity))
    }

    fn lunar_phase(&self, at: DateTime<Utc>) -> EphemerisResult<LunarPhase> {
        let moon = self.ecliptic(Body::Moon, at)?;
        let sun = self.ecliptic(Body::Sun, at)?;
        Ok(moon::lunar_phase(&moon, &sun))
    }

    fn rise_transit_set(
        &self,
        target: &Target,
        location: &ObserverLocation,
        day: LocalDay,
    ) -> EphemerisResult<RiseTransitSet> {
        let (start, end) = day.bounds().ok_or(EphemerisError::InvalidInstant)?;

        let crossings = search::find_crossings(start, end, |t| self.above_horizon(target, location, t))?;
        let (culmination, _) = search::find_maximum(start, end, |t| self.altitude(target, location, t))?;
        let transit = if self.above_horizon(target, location, culmination)? >= 0.0 {
            Some(culmination)
        } else {
            None
        };

        Ok(RiseTransitSet {
            rise: crossings.ascending,
            transit,
            set: crossings.descending,
        })
    }

    fn time_of_maximum_altitude(
        &self,
        target: &Target,
        location: &ObserverLocation,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> EphemerisResult<DateTime<Utc>> {
        let (at, _) = search::find_maximum(from, until, |t| self.altitude(target, location, t))?;
        Ok(at)
    }

    fn day_path(
        &self,
        target: &Target,
        location: &ObserverLocation,
        day: LocalDay,
    ) -> EphemerisResult<Vec<PathSample>> {
        let (start, end) = day.bounds().ok_or(EphemerisError::InvalidInstant)?;

        let mut samples = Vec::new();
        for t in search::sample_times(start, end)? {
            let eq = self.target_equatorial(target, t)?;
            let hz = self.horizontal(t, location, &eq);
            let up = self.above_horizon(target, location, t)? >= 0.0;
            samples.push((t, hz, up));
        }

        let path = samples
            .iter()
            .enumerate()
            .filter(|(_, (_, _, up))| *up)
            .map(|(i, (t, hz, _))| PathSample {
                instant: Instant::new(*t, day.zone),
                altitude: hz.altitude,
                azimuth: hz.azimuth,
                is_rise: i > 0 && !samples[i - 1].2,
                is_set: i + 1 < samples.len() && !samples[i + 1].2,
            })
            .collect();
        Ok(path)
    }

    fn twilight(
        &self,
        location: &ObserverLocation,
        day: LocalDay,
        kind: TwilightKind,
    ) -> EphemerisResult<Option<TwilightWindow>> {
        let (start, end) = day.bounds().ok_or(EphemerisError::InvalidInstant)?;
        let depth = |t: DateTime<Utc>| -> EphemerisResult<f64> {
            Ok(self.altitude(&Target::Sun, location, t)? - kind.horizon())
        };

        let Some(from) = search::find_crossings(start, end, depth)?.descending else {
            return Ok(None);
        };
        let morning_start = search::shift(from, 60.0)?;
        let morning_end = search::shift(from, 86_400.0)?;
        let Some(until) = search::find_crossings(morning_start, morning_end, depth)?.ascending else {
            return Ok(None);
        };

        Ok(Some(TwilightWindow {
            from: Instant::new(from, day.zone),
            until: Instant::new(until, day.zone),
        }))
    }
}

/// Horizon event resolution: rise, maximum and set relative to a query instant
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{
    EventOccurrence, HorizonEvent, Instant, LocalDay, ObserverLocation, ObserverZone, ResolvedEvents, Target,
    Visibility,
};
use crate::ephemeris::{Ephemeris, EphemerisError, EphemerisResult, RiseTransitSet};

pub struct HorizonSolver {
    ephemeris: Arc<dyn Ephemeris>,
}

impl HorizonSolver {
    pub fn new(ephemeris: Arc<dyn Ephemeris>) -> Self {
        Self { ephemeris }
    }

    /// Resolve the rise, maximum and set nearest to `at` and classify visibility.
    ///
    /// Events are computed for the local day containing `at`. When that day's
    /// rise comes after its set the target is up across a midnight: the rise is
    /// taken from the previous day if `at` is not yet past the set, otherwise the
    /// set is taken from the next day. A day with only a set borrows the previous
    /// day's rise and a day with only a rise borrows the next day's set.
    pub fn resolve(
        &self,
        target: &Target,
        location: &ObserverLocation,
        at: DateTime<Utc>,
        zone: ObserverZone,
    ) -> EphemerisResult<ResolvedEvents> {
        let day = LocalDay::containing(at, zone);
        let raw = self.ephemeris.rise_transit_set(target, location, day)?;

        let (rise, set, corrected) = match (raw.rise, raw.set) {
            (None, None) => return Ok(degenerate(&raw, zone)),
            (None, Some(set)) => (self.previous_rise(target, location, day)?, Some(set), true),
            (Some(rise), None) => (Some(rise), self.next_set(target, location, day)?, true),
            (Some(rise), Some(set)) if rise > set => {
                if at <= set {
                    (self.previous_rise(target, location, day)?, Some(set), true)
                } else {
                    (Some(rise), self.next_set(target, location, day)?, true)
                }
            }
            (Some(rise), Some(set)) => (Some(rise), Some(set), false),
        };

        let maximum = match (rise, set) {
            (Some(rise), Some(set)) => match raw.transit {
                Some(transit) if !corrected && rise <= transit && transit <= set => Some(transit),
                _ => self.maximum_between(target, location, rise, set),
            },
            _ => raw.transit,
        };

        Ok(ResolvedEvents {
            visibility: Visibility::Normal,
            rise: occurrence(HorizonEvent::Rise, rise, zone),
            maximum: occurrence(HorizonEvent::Maximum, maximum, zone),
            set: occurrence(HorizonEvent::Set, set, zone),
        })
    }

    fn previous_rise(
        &self,
        target: &Target,
        location: &ObserverLocation,
        day: LocalDay,
    ) -> EphemerisResult<Option<DateTime<Utc>>> {
        let previous = day.previous().ok_or(EphemerisError::InvalidInstant)?;
        debug!(target = %target, "taking rise from {}", previous.date);
        Ok(self.ephemeris.rise_transit_set(target, location, previous)?.rise)
    }

    fn next_set(
        &self,
        target: &Target,
        location: &ObserverLocation,
        day: LocalDay,
    ) -> EphemerisResult<Option<DateTime<Utc>>> {
        let next = day.next().ok_or(EphemerisError::InvalidInstant)?;
        debug!(target = %target, "taking set from {}", next.date);
        Ok(self.ephemeris.rise_transit_set(target, location, next)?.set)
    }

    fn maximum_between(
        &self,
        target: &Target,
        location: &ObserverLocation,
        rise: DateTime<Utc>,
        set: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self.ephemeris.time_of_maximum_altitude(target, location, rise, set) {
            Ok(at) => Some(at),
            Err(e) => {
                warn!(target = %target, error = %e, "maximum altitude search failed");
                None
            }
        }
    }
}

/// Neither a rise nor a set: up all day if a transit was still found, otherwise down all day
fn degenerate(raw: &RiseTransitSet, zone: ObserverZone) -> ResolvedEvents {
    let (visibility, maximum) = match raw.transit {
        Some(transit) => (Visibility::AlwaysAbove, Some(transit)),
        None => (Visibility::AlwaysBelow, None),
    };
    ResolvedEvents {
        visibility,
        rise: occurrence(HorizonEvent::Rise, None, zone),
        maximum: occurrence(HorizonEvent::Maximum, maximum, zone),
        set: occurrence(HorizonEvent::Set, None, zone),
    }
}

fn occurrence(kind: HorizonEvent, at: Option<DateTime<Utc>>, zone: ObserverZone) -> EventOccurrence {
    EventOccurrence {
        kind,
        instant: at.map(|t| Instant::new(t, zone)),
    }
}

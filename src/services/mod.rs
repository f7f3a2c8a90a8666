/// Business logic services layer
pub mod horizon;
pub mod properties;
#[cfg(test)]
pub mod testing;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::domain::{
    Instant, LocalDay, Observation, ObserverLocation, ObserverZone, SkyReport, Target, TwilightKind, TwilightReport,
};
use crate::ephemeris::Ephemeris;
use crate::errors::ApiResult;

pub use horizon::HorizonSolver;
pub use properties::PropertyEvaluator;

fn observation(location: ObserverLocation, at: DateTime<Utc>) -> Observation {
    let zone = ObserverZone::from_longitude(location.longitude);
    Observation {
        instant: Instant::new(at, zone),
        location,
        zone,
    }
}

/// Sun, Moon and fixed-target reports
pub struct SkyService {
    ephemeris: Arc<dyn Ephemeris>,
    solver: HorizonSolver,
    evaluator: PropertyEvaluator,
}

impl SkyService {
    pub fn new(ephemeris: Arc<dyn Ephemeris>) -> Self {
        Self {
            solver: HorizonSolver::new(ephemeris.clone()),
            evaluator: PropertyEvaluator::new(ephemeris.clone()),
            ephemeris,
        }
    }

    /// Current position plus resolved rise, maximum and set, each evaluated at
    /// its own instant. Fixed targets also get their track across the day.
    pub fn report(&self, target: Target, location: ObserverLocation, at: DateTime<Utc>) -> ApiResult<SkyReport> {
        let observation = observation(location, at);
        let current = self.evaluator.evaluate(at, &target, &location)?;
        let events = self.solver.resolve(&target, &location, at, observation.zone)?;

        let rise = self.evaluator.evaluate_occurrence(&events.rise, &target, &location);
        let maximum = self.evaluator.evaluate_occurrence(&events.maximum, &target, &location);
        let set = self.evaluator.evaluate_occurrence(&events.set, &target, &location);

        let path = match target {
            Target::Fixed(_) => {
                self.ephemeris
                    .day_path(&target, &location, LocalDay::containing(at, observation.zone))?
            }
            Target::Sun | Target::Moon => Vec::new(),
        };

        info!(
            target = %target,
            visibility = ?events.visibility,
            rise = rise.is_some(),
            maximum = maximum.is_some(),
            set = set.is_some(),
            "sky report resolved"
        );

        Ok(SkyReport {
            observation,
            target,
            visibility: events.visibility,
            current,
            rise,
            maximum,
            set,
            path,
        })
    }
}

/// Civil, nautical and astronomical twilight windows
pub struct TwilightService {
    ephemeris: Arc<dyn Ephemeris>,
}

impl TwilightService {
    pub fn new(ephemeris: Arc<dyn Ephemeris>) -> Self {
        Self { ephemeris }
    }

    pub fn report(&self, location: ObserverLocation, at: DateTime<Utc>) -> ApiResult<TwilightReport> {
        let observation = observation(location, at);
        let day = LocalDay::containing(at, observation.zone);
        let window = |kind| self.ephemeris.twilight(&location, day, kind);

        let report = TwilightReport {
            observation,
            civil: window(TwilightKind::Civil)?,
            nautical: window(TwilightKind::Nautical)?,
            astronomical: window(TwilightKind::Astronomical)?,
        };

        info!(
            zone = %observation.zone.name(),
            civil = report.civil.is_some(),
            nautical = report.nautical.is_some(),
            astronomical = report.astronomical.is_some(),
            "twilight report resolved"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EquatorialCoordinate, Visibility};
    use crate::ephemeris::{Almanac, RiseTransitSet};
    use crate::services::testing::ScriptedEphemeris;
    use chrono::{NaiveDate, TimeZone};

    fn hilo() -> ObserverLocation {
        ObserverLocation {
            longitude: -155.468094,
            latitude: 19.798484,
        }
    }

    fn may_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 5, 14, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_moon_properties_are_evaluated_per_event() {
        let service = SkyService::new(Arc::new(Almanac::new()));
        let report = service.report(Target::Moon, hilo(), may_14()).unwrap();

        assert_eq!(report.visibility, Visibility::Normal);
        let rise = report.rise.unwrap();
        let maximum = report.maximum.unwrap();
        let set = report.set.unwrap();
        assert!(rise.instant < maximum.instant && maximum.instant < set.instant);

        let (r, m, s) = (
            rise.properties.phase.unwrap(),
            maximum.properties.phase.unwrap(),
            set.properties.phase.unwrap(),
        );
        assert!(r.age < m.age && m.age < s.age);
        assert!(r.fraction < m.fraction && m.fraction < s.fraction);
        assert!(r.age > 1.5 && s.age < 4.0);

        assert_eq!(rise.instant.local().format("%Y-%m-%d %:z").to_string(), "2021-05-14 -10:00");
        assert!(report.path.is_empty());
        assert!(report.current.separation.is_none());
    }

    #[test]
    fn test_target_always_below() {
        let location = ObserverLocation {
            longitude: -155.468094,
            latitude: 45.798484,
        };
        let target = Target::Fixed(EquatorialCoordinate {
            right_ascension: 88.792958,
            declination: -77.407064,
        });
        let report = SkyService::new(Arc::new(Almanac::new()))
            .report(target, location, may_14())
            .unwrap();

        assert_eq!(report.visibility, Visibility::AlwaysBelow);
        assert!(report.rise.is_none());
        assert!(report.maximum.is_none());
        assert!(report.set.is_none());
        assert!(report.path.is_empty());
    }

    #[test]
    fn test_visible_target_has_a_path() {
        let target = Target::Fixed(EquatorialCoordinate {
            right_ascension: 88.792958,
            declination: 7.407064,
        });
        let report = SkyService::new(Arc::new(Almanac::new()))
            .report(target, hilo(), may_14())
            .unwrap();

        assert_eq!(report.visibility, Visibility::Normal);
        assert!(!report.path.is_empty());
        assert!(report.rise.unwrap().properties.separation.is_some());
    }

    #[test]
    fn test_failed_rise_evaluation_keeps_other_events() {
        let rise = Utc.with_ymd_and_hms(2021, 5, 14, 16, 0, 0).unwrap();
        let transit = Utc.with_ymd_and_hms(2021, 5, 15, 0, 0, 0).unwrap();
        let set = Utc.with_ymd_and_hms(2021, 5, 15, 8, 0, 0).unwrap();
        let engine = ScriptedEphemeris::default()
            .with_day(
                NaiveDate::from_ymd_opt(2021, 5, 14).unwrap(),
                RiseTransitSet {
                    rise: Some(rise),
                    transit: Some(transit),
                    set: Some(set),
                },
            )
            .failing_at(rise);

        let report = SkyService::new(Arc::new(engine)).report(Target::Moon, hilo(), may_14()).unwrap();
        assert_eq!(report.visibility, Visibility::Normal);
        assert!(report.rise.is_none());
        assert_eq!(report.maximum.unwrap().instant.utc(), transit);
        assert_eq!(report.set.unwrap().instant.utc(), set);
    }

    #[test]
    fn test_failed_current_position_is_an_error() {
        let engine = ScriptedEphemeris::default().failing_at(may_14());
        let result = SkyService::new(Arc::new(engine)).report(Target::Sun, hilo(), may_14());
        assert!(result.is_err());
    }

    #[test]
    fn test_twilight_report_at_hilo() {
        let report = TwilightService::new(Arc::new(Almanac::new()))
            .report(hilo(), may_14())
            .unwrap();

        assert_eq!(report.observation.zone.name(), "Etc/GMT+10");
        let civil = report.civil.unwrap();
        let astronomical = report.astronomical.unwrap();
        assert!(report.nautical.is_some());
        assert!(civil.duration_hours() > astronomical.duration_hours());
        assert!(civil.duration_hours() > 9.5 && civil.duration_hours() < 11.0);
    }
}

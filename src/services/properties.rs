/// Standard property bundle evaluated at a single instant
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::domain::{Body, EvaluatedEvent, EventOccurrence, ObserverLocation, StandardProperties, Target};
use crate::ephemeris::{airmass, refraction, separation, Ephemeris, EphemerisResult};

pub struct PropertyEvaluator {
    ephemeris: Arc<dyn Ephemeris>,
}

impl PropertyEvaluator {
    pub fn new(ephemeris: Arc<dyn Ephemeris>) -> Self {
        Self { ephemeris }
    }

    /// Position, phase, refraction, airmass and Moon separation of `target` at `at`.
    /// Phase is carried for the Moon and for fixed targets (the Moon's phase as
    /// seen next to them); separation only for fixed targets.
    pub fn evaluate(
        &self,
        at: DateTime<Utc>,
        target: &Target,
        location: &ObserverLocation,
    ) -> EphemerisResult<StandardProperties> {
        let equatorial = self.ephemeris.target_equatorial(target, at)?;
        let horizontal = self.ephemeris.horizontal(at, location, &equatorial);

        let phase = match target {
            Target::Sun => None,
            Target::Moon | Target::Fixed(_) => Some(self.ephemeris.lunar_phase(at)?),
        };

        let separation = match target {
            Target::Fixed(eq) => Some(separation(eq, &self.ephemeris.equatorial(Body::Moon, at)?)),
            _ => None,
        };

        Ok(StandardProperties {
            horizontal,
            equatorial,
            phase,
            refraction: refraction(horizontal.altitude),
            airmass: airmass(horizontal.altitude),
            separation,
        })
    }

    /// Evaluate one resolved occurrence at its own instant. Absent occurrences
    /// and failed evaluations both yield `None`; a failure is logged and does not
    /// affect other occurrences.
    pub fn evaluate_occurrence(
        &self,
        occurrence: &EventOccurrence,
        target: &Target,
        location: &ObserverLocation,
    ) -> Option<EvaluatedEvent> {
        let instant = occurrence.instant?;
        match self.evaluate(instant.utc(), target, location) {
            Ok(properties) => Some(EvaluatedEvent { instant, properties }),
            Err(e) => {
                warn!(
                    target = %target,
                    event = %occurrence.kind,
                    at = %instant.utc(),
                    error = %e,
                    "event evaluation failed"
                );
                None
            }
        }
    }
}

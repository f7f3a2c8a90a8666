use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{EvaluatedEvent, Observation, PathSample, SkyReport, Target};
use crate::utils::{format_local, format_observer_datetime, format_utc};

#[derive(Serialize)]
struct ObserverBody {
    datetime: String,
    longitude: f64,
    latitude: f64,
}

pub fn observer(observation: &Observation) -> Value {
    json!(ObserverBody {
        datetime: format_observer_datetime(&observation.instant.utc()),
        longitude: observation.location.longitude,
        latitude: observation.location.latitude,
    })
}

#[derive(Serialize)]
struct EventBody {
    #[serde(rename = "LCT")]
    lct: String,
    #[serde(rename = "UTC")]
    utc: String,
    alt: f64,
    az: f64,
    ra: f64,
    dec: f64,
    /// refraction, degrees
    #[serde(rename = "R")]
    refraction: Option<f64>,
    /// airmass
    #[serde(rename = "X")]
    airmass: Option<f64>,
    #[serde(flatten)]
    phase: Option<PhaseBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    separation: Option<f64>,
}

#[derive(Serialize)]
struct PhaseBody {
    age: f64,
    angle: f64,
    fraction: f64,
    illumination: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PathBody {
    instant: String,
    altitude: f64,
    azimuth: f64,
    is_rise: bool,
    is_set: bool,
}

fn event(target: &Target, event: &Option<EvaluatedEvent>) -> Value {
    let Some(e) = event else {
        return Value::Null;
    };
    let p = &e.properties;
    let body = EventBody {
        lct: format_local(&e.instant.local()),
        utc: format_utc(&e.instant.utc()),
        alt: p.horizontal.altitude,
        az: p.horizontal.azimuth,
        ra: p.equatorial.right_ascension,
        dec: p.equatorial.declination,
        refraction: p.refraction,
        airmass: p.airmass,
        phase: match target {
            Target::Moon => p.phase.map(|ph| PhaseBody {
                age: ph.age,
                angle: ph.angle,
                fraction: ph.fraction,
                illumination: ph.illumination,
            }),
            _ => None,
        },
        separation: match target {
            Target::Fixed(_) => p.separation,
            _ => None,
        },
    };
    json!(body)
}

fn path(samples: &[PathSample]) -> Vec<PathBody> {
    samples
        .iter()
        .map(|s| PathBody {
            instant: format_local(&s.instant.local()),
            altitude: s.altitude,
            azimuth: s.azimuth,
            is_rise: s.is_rise,
            is_set: s.is_set,
        })
        .collect()
}

pub fn sky(report: &SkyReport) -> Value {
    let target = &report.target;
    let mut body = json!({
        "observer": observer(&report.observation),
        "rise": event(target, &report.rise),
        "maximum": event(target, &report.maximum),
        "set": event(target, &report.set),
    });
    if let Target::Fixed(_) = target {
        body["path"] = json!(path(&report.path));
    }
    body
}

use serde_json::{json, Value};

use crate::domain::{EvaluatedEvent, Observation, SkyReport, StandardProperties, Target};
use crate::utils::{fixed6, format_local, format_observer_datetime};

pub fn observer(observation: &Observation) -> Value {
    json!({
        "datetime": format_observer_datetime(&observation.instant.utc()),
        "longitude": fixed6(observation.location.longitude),
        "latitude": fixed6(observation.location.latitude),
    })
}

fn position(p: &StandardProperties) -> Value {
    json!({
        "alt": fixed6(p.horizontal.altitude),
        "az": fixed6(p.horizontal.azimuth),
        "ra": fixed6(p.equatorial.right_ascension),
        "dec": fixed6(p.equatorial.declination),
    })
}

fn phase(p: &StandardProperties) -> Value {
    let Some(phase) = p.phase else {
        return Value::Null;
    };
    let mut body = json!({
        "age": fixed6(phase.age),
        "angle": fixed6(phase.angle),
        "d": fixed6(phase.elongation),
        "fraction": fixed6(phase.fraction),
        "illumination": fixed6(phase.illumination),
    });
    if let Some(separation) = p.separation {
        body["separation"] = json!(fixed6(separation));
    }
    body
}

fn local(event: &Option<EvaluatedEvent>) -> Value {
    event
        .as_ref()
        .map_or(Value::Null, |e| json!(format_local(&e.instant.local())))
}

pub fn sky(report: &SkyReport) -> Value {
    let observer = observer(&report.observation);
    let position = position(&report.current);

    match report.target {
        Target::Sun => json!({
            "observer": observer,
            "position": position,
        }),
        Target::Moon => json!({
            "observer": observer,
            "position": position,
            "phase": phase(&report.current),
            "transit": {
                "rise": local(&report.rise),
                "set": local(&report.set),
            },
        }),
        Target::Fixed(_) => json!({
            "observer": observer,
            "position": position,
            "phase": phase(&report.current),
            "transit": {
                "rise": local(&report.rise),
                "maximum": local(&report.maximum),
                "set": local(&report.set),
            },
        }),
    }
}

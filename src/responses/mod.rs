/// Versioned response contracts over the shared report types
mod v1;
mod v2;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Observation, SkyReport, TwilightKind, TwilightReport, TwilightWindow};
use crate::query::Policy;
use crate::utils::format_local;

pub const API_NAME: &str = "Rust Sky API";

/// Which response contract a route speaks. Both render the same reports;
/// only input strictness and output shape differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractVersion {
    /// Deprecated: flat single transit window, numbers as `%.6f` strings,
    /// malformed input silently defaulted
    V1,
    /// Rise, maximum and set each with a full property bundle; malformed
    /// input rejected
    V2,
}

impl ContractVersion {
    pub fn name(&self) -> &'static str {
        match self {
            ContractVersion::V1 => "v1",
            ContractVersion::V2 => "v2",
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            ContractVersion::V1 => Policy::Lenient,
            ContractVersion::V2 => Policy::Strict,
        }
    }

    pub fn sky(&self, report: &SkyReport) -> Value {
        match self {
            ContractVersion::V1 => v1::sky(report),
            ContractVersion::V2 => v2::sky(report),
        }
    }

    pub fn twilight(&self, report: &TwilightReport) -> Value {
        let observer = match self {
            ContractVersion::V1 => v1::observer(&report.observation),
            ContractVersion::V2 => v2::observer(&report.observation),
        };
        serde_json::json!({
            "observer": observer,
            "civil": twilight_window(&report.observation, TwilightKind::Civil, report.civil.as_ref()),
            "nautical": twilight_window(&report.observation, TwilightKind::Nautical, report.nautical.as_ref()),
            "astronomical": twilight_window(
                &report.observation,
                TwilightKind::Astronomical,
                report.astronomical.as_ref()
            ),
        })
    }

    /// `{name, description, endpoint}` index for this version
    pub fn index(&self, latest: &str) -> ApiIndex {
        let (description, endpoint) = match self {
            ContractVersion::V1 => (
                "Lunar and solar scheduling: positions, phase, rise and set.",
                "/api/v1".to_string(),
            ),
            ContractVersion::V2 => (
                "Lunar, solar and astronomical scheduling: rise, maximum and set with full properties, twilight and target transits.",
                format!("/api/{}", latest),
            ),
        };
        ApiIndex {
            name: API_NAME,
            description,
            endpoint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub name: &'static str,
    pub description: &'static str,
    pub endpoint: String,
}

#[derive(Debug, Serialize)]
struct TwilightBody {
    from: String,
    until: String,
    /// hours
    duration: f64,
    location: String,
    horizon: f64,
}

fn twilight_window(observation: &Observation, kind: TwilightKind, window: Option<&TwilightWindow>) -> Value {
    window
        .map(|w| TwilightBody {
            from: format_local(&w.from.local()),
            until: format_local(&w.until.local()),
            duration: w.duration_hours(),
            location: observation.zone.name(),
            horizon: kind.horizon(),
        })
        .map_or(Value::Null, |body| serde_json::json!(body))
}

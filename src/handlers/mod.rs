/// HTTP request handlers
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::{Health, Target};
use crate::ephemeris::Ephemeris;
use crate::errors::ApiResult;
use crate::query::QueryResolver;
use crate::responses::{ApiIndex, ContractVersion};
use crate::services::{SkyService, TwilightService};
use crate::utils::format_wire_datetime;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sky_service: Arc<SkyService>,
    pub twilight_service: Arc<TwilightService>,
    pub latest_version: Arc<str>,
}

impl AppState {
    pub fn new(ephemeris: Arc<dyn Ephemeris>, latest_version: &str) -> Self {
        Self {
            sky_service: Arc::new(SkyService::new(ephemeris.clone())),
            twilight_service: Arc::new(TwilightService::new(ephemeris)),
            latest_version: Arc::from(latest_version),
        }
    }

    pub fn latest_path(&self) -> String {
        format!("/api/{}", self.latest_version)
    }
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub latest: String,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Path of the latest API version
pub async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        latest: state.latest_path(),
    })
}

pub async fn api_index(
    State(state): State<AppState>,
    Extension(contract): Extension<ContractVersion>,
) -> Json<ApiIndex> {
    Json(contract.index(&state.latest_version))
}

#[derive(Debug, Clone, Copy)]
enum SkyRoute {
    Sun,
    Moon,
    Transit,
}

fn sky_report(
    state: &AppState,
    contract: ContractVersion,
    route: SkyRoute,
    params: &HashMap<String, String>,
) -> ApiResult<Json<Value>> {
    let resolver = QueryResolver::new(contract.policy());
    let now = Utc::now();

    let (target, observer) = match route {
        SkyRoute::Sun => (Target::Sun, resolver.observer(params, now)?),
        SkyRoute::Moon => (Target::Moon, resolver.observer(params, now)?),
        SkyRoute::Transit => {
            let q = resolver.target(params, now)?;
            (Target::Fixed(q.coordinate), q.observer)
        }
    };

    info!(
        contract = contract.name(),
        target = %target,
        datetime = %format_wire_datetime(&observer.instant),
        longitude = observer.location.longitude,
        latitude = observer.location.latitude,
        "sky request"
    );

    let report = state
        .sky_service
        .report(target, observer.location, observer.instant)?;
    Ok(Json(contract.sky(&report)))
}

/// Sun position and events
pub async fn sun(
    State(state): State<AppState>,
    Extension(contract): Extension<ContractVersion>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    sky_report(&state, contract, SkyRoute::Sun, &params)
}

/// Moon position, phase and events
pub async fn moon(
    State(state): State<AppState>,
    Extension(contract): Extension<ContractVersion>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    sky_report(&state, contract, SkyRoute::Moon, &params)
}

/// Fixed equatorial target: events, Moon separation and day path
pub async fn transit(
    State(state): State<AppState>,
    Extension(contract): Extension<ContractVersion>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    sky_report(&state, contract, SkyRoute::Transit, &params)
}

/// Civil, nautical and astronomical twilight
pub async fn twilight(
    State(state): State<AppState>,
    Extension(contract): Extension<ContractVersion>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let observer = QueryResolver::new(contract.policy()).observer(&params, Utc::now())?;

    info!(
        contract = contract.name(),
        datetime = %format_wire_datetime(&observer.instant),
        longitude = observer.location.longitude,
        latitude = observer.location.latitude,
        "twilight request"
    );

    let report = state
        .twilight_service
        .report(observer.location, observer.instant)?;
    Ok(Json(contract.twilight(&report)))
}

/// Application routes configuration
use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use std::any::Any;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::error;

use crate::config::AppConfig;
use crate::handlers::{api_index, health, moon, sun, transit, twilight, version, AppState};
use crate::responses::ContractVersion;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", "default-src 'self'"),
    ("cross-origin-opener-policy", "same-origin"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("strict-transport-security", "max-age=5184000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-download-options", "noopen"),
    ("x-dns-prefetch-control", "off"),
    ("x-frame-options", "Deny"),
    ("x-xss-protection", "1; mode=block"),
];

/// One contract version's endpoints, mounted under `/api/<version>`
fn versioned(contract: ContractVersion) -> Router<AppState> {
    Router::new()
        .route("/", get(api_index))
        .route("/sun", get(sun))
        .route("/moon", get(moon))
        .route("/transit", get(transit))
        .route("/twilight", get(twilight))
        .layer(Extension(contract))
}

/// Build the application router with all routes
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health))
        .route("/version", get(version))
        .nest("/api/v1", versioned(ContractVersion::V1))
        .nest("/api/v2", versioned(ContractVersion::V2))
        .fallback(redirect_to_latest)
        .layer(CatchPanicLayer::custom(handle_panic));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        ));
    }

    router
        .layer(cors(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ORIGIN])
        .expose_headers([
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60))
}

/// Unknown paths land on the latest API index
async fn redirect_to_latest(State(state): State<AppState>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, state.latest_path())]).into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%message, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

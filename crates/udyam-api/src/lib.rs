//! # udyam-api: Axum API Service for Udyam Registration
//!
//! HTTP surface of the two-step MSME registration wizard. The browser
//! client fetches the form schema, submits each step for validation, and
//! looks up PIN codes to auto-fill city and state.
//!
//! ## API Surface
//!
//! | Path | Module | Purpose |
//! |------|--------|---------|
//! | `GET /api/test` | [`routes::health`] | Connectivity check |
//! | `GET /api/form-schema` | [`routes::schema`] | Static wizard schema |
//! | `POST /api/validate-step1` | [`routes::registration`] | Aadhaar + OTP |
//! | `POST /api/validate-step2` | [`routes::registration`] | PAN, registration number |
//! | `POST /api/submit-form` | [`routes::registration`] | Echo final payload |
//! | `GET /api/pincode/{pin}` | [`routes::pincode`] | City/state lookup |
//! | `GET /health/liveness`, `/health/readiness` | this module | Probes |
//! | `GET /metrics` | this module | Prometheus scrape |
//! | `GET /openapi.json` | [`openapi`] | OpenAPI 3.1 document |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → DefaultBodyLimit → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod step_order;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::{AppConfig, AppState};

/// Request body cap.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// CORS wraps everything, probes included, so preflight requests are
/// answered for every path.
pub fn app(state: AppState) -> Router {
    let metrics_on = state.config.metrics_enabled;

    let mut api = Router::new()
        .merge(routes::health::router())
        .merge(routes::schema::router())
        .merge(routes::registration::router())
        .merge(routes::pincode::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(state.metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if metrics_on {
        probes = probes.route("/metrics", get(prometheus_metrics));
    }

    Router::new()
        .merge(probes.with_state(state.clone()))
        .merge(api)
        .layer(cors_layer(&state.config))
}

/// Single allow-listed origin with credentials.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.allowed_origin.clone())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// GET /metrics: Prometheus metrics scrape endpoint.
///
/// Refreshes the pending-submissions gauge from the step-order registry,
/// then encodes every metric in Prometheus text exposition format.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let pending = state.step_order.as_ref().map_or(0, |r| r.len());
    state.metrics.set_pending_submissions(pending);

    match state.metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe: 200 whenever the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready", or 503 if the step-order registry lock
/// stays held past [`step_order::READINESS_LOCK_WAIT`].
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(registry) = &state.step_order {
        if !registry.is_available() {
            return (StatusCode::SERVICE_UNAVAILABLE, "step order registry locked").into_response();
        }
    }
    (StatusCode::OK, "ready").into_response()
}

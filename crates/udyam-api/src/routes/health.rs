//! Connectivity check used by the browser client on startup.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Response of `GET /api/test`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TestResponse {
    pub message: String,
    /// RFC 3339 UTC timestamp with milliseconds.
    pub timestamp: String,
    pub environment: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/test", get(api_test))
}

#[utoipa::path(
    get,
    path = "/api/test",
    responses((status = 200, description = "Backend is reachable", body = TestResponse)),
    tag = "health"
)]
pub async fn api_test(State(state): State<AppState>) -> Json<TestResponse> {
    Json(TestResponse {
        message: "Backend server is working!".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.config.environment.as_str().to_string(),
    })
}

//! PIN code to city/state lookup for auto-filling step 2.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use udyam_postal_client::{LocationResult, LookupError};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Resolved location.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationData {
    pub city: String,
    pub state: String,
    pub area: String,
    pub pincode: String,
}

impl From<LocationResult> for LocationData {
    fn from(loc: LocationResult) -> Self {
        Self {
            city: loc.city,
            state: loc.state,
            area: loc.area,
            pincode: loc.pincode,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PincodeResponse {
    pub success: bool,
    pub data: LocationData,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/pincode/{pin}", get(lookup_pincode))
}

fn lookup_outcome(result: &Result<LocationResult, LookupError>) -> &'static str {
    match result {
        Ok(_) => "found",
        Err(LookupError::InvalidFormat(_)) => "invalid_format",
        Err(LookupError::NotFound { .. }) => "not_found",
        Err(_) => "upstream_error",
    }
}

#[utoipa::path(
    get,
    path = "/api/pincode/{pin}",
    params(("pin" = String, Path, description = "Six-digit PIN code")),
    responses(
        (status = 200, description = "Location resolved", body = PincodeResponse),
        (status = 400, description = "Invalid PIN code format", body = ErrorBody),
        (status = 404, description = "PIN code not found", body = ErrorBody),
        (status = 500, description = "Unable to fetch location data", body = ErrorBody),
    ),
    tag = "location"
)]
pub async fn lookup_pincode(
    State(state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<PincodeResponse>, AppError> {
    let result = state.resolver.resolve(&pin).await;
    let outcome = lookup_outcome(&result);
    state.metrics.record_lookup(outcome);
    tracing::debug!(
        resolver = state.resolver.resolver_name(),
        outcome,
        "PIN code lookup"
    );

    let location = result?;
    Ok(Json(PincodeResponse {
        success: true,
        data: location.into(),
    }))
}

//! Static form schema.

use axum::routing::get;
use axum::{Json, Router};
use udyam_core::schema::udyam_form;
use udyam_core::FormSchema;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/form-schema", get(form_schema))
}

/// The schema is built once per process; every call serializes the same
/// value.
#[utoipa::path(
    get,
    path = "/api/form-schema",
    responses((status = 200, description = "Ordered wizard steps with their field descriptors")),
    tag = "registration"
)]
pub async fn form_schema() -> Json<&'static FormSchema> {
    Json(udyam_form())
}

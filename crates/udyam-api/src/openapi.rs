//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Udyam Registration API",
        description = "Backend for the two-step Udyam (MSME) registration wizard.\n\n- **Step 1** checks the Aadhaar number and the demo OTP\n- **Step 2** checks the PAN and issues a registration number\n- **PIN code lookup** resolves city and state for auto-fill\n\nHealth probes live under `/health/*` and Prometheus metrics at `/metrics`.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server"),
    ),
    paths(
        crate::routes::health::api_test,
        crate::routes::schema::form_schema,
        crate::routes::registration::validate_step1,
        crate::routes::registration::validate_step2,
        crate::routes::registration::submit_form,
        crate::routes::pincode::lookup_pincode,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::FieldErrorDetail,
        crate::routes::health::TestResponse,
        crate::routes::registration::Step1Request,
        crate::routes::registration::Step1Response,
        crate::routes::registration::Step2Request,
        crate::routes::registration::Step2Data,
        crate::routes::registration::Step2Response,
        crate::routes::registration::SubmitFormResponse,
        crate::routes::pincode::LocationData,
        crate::routes::pincode::PincodeResponse,
    )),
    tags(
        (name = "health", description = "Connectivity check"),
        (name = "registration", description = "Form schema and wizard steps"),
        (name = "location", description = "PIN code lookup"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/test",
            "/api/form-schema",
            "/api/validate-step1",
            "/api/validate-step2",
            "/api/submit-form",
            "/api/pincode/{pin}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_registers_error_body_schema() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components present");
        assert!(components.schemas.contains_key("ErrorBody"));
        assert!(components.schemas.contains_key("Step2Response"));
    }
}

//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/v1/openapi.json`. The document route is mounted outside the
//! auth middleware so integrators can read the contract without a token.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vigil API — Statutory Timeline Compliance",
        version = "0.3.4",
        description = "Operator API for the Vigil deadline compliance stack: case registration, countdown assessment, stakeholder alerts, the append-only audit timeline, and monitoring scheduler control.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Cases
        crate::routes::cases::register_case,
        crate::routes::cases::list_cases,
        crate::routes::cases::get_case,
        crate::routes::cases::check_case,
        crate::routes::cases::get_alerts,
        crate::routes::cases::get_timeline,
        crate::routes::cases::close_case,
        // Scheduler
        crate::routes::scheduler::scheduler_status,
        crate::routes::scheduler::start_scheduler,
        crate::routes::scheduler::stop_scheduler,
    ),
    components(schemas(
        // Case DTOs
        crate::routes::cases::RegisterCaseRequest,
        crate::routes::cases::CaseAssessmentResponse,
        crate::routes::cases::CheckCaseResponse,
        crate::routes::cases::CaseAlertResponse,
        crate::routes::cases::TimelineEventResponse,
        // Scheduler DTOs
        crate::routes::scheduler::SchedulerStatusResponse,
        crate::routes::scheduler::TickSummaryResponse,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "cases", description = "Case registration, assessment, and audit trail"),
        (name = "scheduler", description = "Background monitoring loop control"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/v1/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/openapi.json", get(openapi_json))
}

/// GET /v1/openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

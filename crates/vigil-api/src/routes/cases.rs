//! # Case Compliance API
//!
//! Registration and lifecycle endpoints for tracked cases: every handler
//! delegates to the enforcement service, so the statutory semantics live
//! in one place and the API stays a thin authenticated shell.
//!
//! ## Endpoints
//!
//! - `POST /v1/cases` — register a case and start its countdown
//! - `GET /v1/cases` — assessments for every open case
//! - `GET /v1/cases/:id` — one case's current assessment
//! - `POST /v1/cases/:id/check` — manual out-of-cycle evaluation
//! - `GET /v1/cases/:id/alerts` — alerts warranted right now
//! - `GET /v1/cases/:id/timeline` — append-only audit trail
//! - `POST /v1/cases/:id/close` — archive the case

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use vigil_core::{CaseId, JurisdictionId};
use vigil_engine::{
    CaseRegistration, ComplianceAssessment, ComplianceStatus, DeadlineAlert, StakeholderRole,
    TimelineEvent, TimelineEventKind,
};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to register a case for deadline tracking.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterCaseRequest {
    /// Case identifier. Generated when omitted.
    pub case_id: Option<Uuid>,
    /// Date the death was officially registered. The statutory countdown
    /// starts here.
    pub trigger_date: NaiveDate,
    /// Jurisdiction whose burial law governs the case (e.g., "NL").
    pub jurisdiction: Option<String>,
    /// Whether the deceased's identity has been formally verified.
    pub identity_verified: Option<bool>,
}

impl Validate for RegisterCaseRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref jurisdiction) = self.jurisdiction {
            if jurisdiction.trim().is_empty() {
                return Err("jurisdiction must not be empty if provided".to_string());
            }
        }
        Ok(())
    }
}

/// One case's standing against its statutory deadline.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseAssessmentResponse {
    pub case_id: Uuid,
    /// Date the countdown started.
    pub trigger_date: NaiveDate,
    /// Last day by which arrangements must be complete.
    pub deadline: NaiveDate,
    /// Statutory working-day allowance the deadline was projected from.
    pub required_working_days: u32,
    /// Current severity tier (pending, in_progress, at_risk, emergency).
    #[schema(value_type = String)]
    pub status: ComplianceStatus,
    /// Whole calendar days until the deadline; negative once breached.
    pub days_remaining: i64,
    /// Whether the one-shot emergency protocol has latched.
    pub emergency_protocol_active: bool,
    #[schema(value_type = Option<String>)]
    pub jurisdiction: Option<JurisdictionId>,
    pub identity_verified: Option<bool>,
    pub registered_at: DateTime<Utc>,
    pub evaluated_at: DateTime<Utc>,
    /// Set once the case has been archived.
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<ComplianceAssessment> for CaseAssessmentResponse {
    fn from(assessment: ComplianceAssessment) -> Self {
        let context = assessment.context;
        Self {
            case_id: *context.case_id.as_uuid(),
            trigger_date: context.trigger_date,
            deadline: context.deadline,
            required_working_days: context.required_working_days,
            status: context.status,
            days_remaining: assessment.days_remaining,
            emergency_protocol_active: context.emergency_protocol_active,
            jurisdiction: context.jurisdiction,
            identity_verified: context.identity_verified,
            registered_at: context.registered_at,
            evaluated_at: assessment.evaluated_at,
            closed_at: context.closed_at,
        }
    }
}

/// Result of a manual out-of-cycle check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckCaseResponse {
    /// The case's standing after the check.
    pub assessment: CaseAssessmentResponse,
    /// Stakeholder notifications delivered by this check.
    pub alerts_dispatched: usize,
    /// Whether this check activated the emergency protocol.
    pub emergency_triggered: bool,
}

/// A stakeholder alert for a case's current tier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseAlertResponse {
    pub case_id: Uuid,
    /// Severity tier the alert was generated for.
    #[schema(value_type = String)]
    pub status: ComplianceStatus,
    /// Display countdown in hours, clamped at zero.
    pub hours_remaining: i64,
    /// Notification body.
    pub message: String,
    /// Ordered action checklist.
    pub actions: Vec<String>,
    /// Audience, in escalation order.
    #[schema(value_type = Vec<String>)]
    pub notify: Vec<StakeholderRole>,
}

impl From<DeadlineAlert> for CaseAlertResponse {
    fn from(alert: DeadlineAlert) -> Self {
        Self {
            case_id: *alert.case_id.as_uuid(),
            status: alert.status,
            hours_remaining: alert.hours_remaining,
            message: alert.message,
            actions: alert.actions,
            notify: alert.notify,
        }
    }
}

/// One entry of a case's audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelineEventResponse {
    pub event_id: Uuid,
    pub case_id: Uuid,
    /// Event kind (registration, status_tier_change, alert_issued,
    /// emergency_triggered).
    #[schema(value_type = String)]
    pub kind: TimelineEventKind,
    pub at: DateTime<Utc>,
    pub description: String,
    /// Structured payload for machine consumers.
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
}

impl From<TimelineEvent> for TimelineEventResponse {
    fn from(event: TimelineEvent) -> Self {
        Self {
            event_id: event.event_id,
            case_id: *event.case_id.as_uuid(),
            kind: event.kind,
            at: event.at,
            description: event.description,
            metadata: event.metadata,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the cases router with all lifecycle endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/cases", get(list_cases).post(register_case))
        .route("/v1/cases/:id", get(get_case))
        .route("/v1/cases/:id/check", post(check_case))
        .route("/v1/cases/:id/alerts", get(get_alerts))
        .route("/v1/cases/:id/timeline", get(get_timeline))
        .route("/v1/cases/:id/close", post(close_case))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/cases — Register a case and start its statutory countdown.
#[utoipa::path(
    post,
    path = "/v1/cases",
    request_body = RegisterCaseRequest,
    responses(
        (status = 201, description = "Case registered", body = CaseAssessmentResponse),
        (status = 409, description = "Case already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn register_case(
    State(state): State<AppState>,
    body: Result<Json<RegisterCaseRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<CaseAssessmentResponse>), AppError> {
    let req = extract_validated_json(body)?;

    let case_id = req.case_id.map(CaseId::from_uuid).unwrap_or_else(CaseId::new);
    let mut registration = CaseRegistration::default();
    if let Some(jurisdiction) = req.jurisdiction {
        registration = registration.with_jurisdiction(JurisdictionId::new(jurisdiction)?);
    }
    if let Some(verified) = req.identity_verified {
        registration = registration.with_identity_verified(verified);
    }

    let assessment = state
        .service
        .initialize_compliance(case_id, req.trigger_date, registration)?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CaseAssessmentResponse::from(assessment)),
    ))
}

/// GET /v1/cases — Assessments for every open case.
#[utoipa::path(
    get,
    path = "/v1/cases",
    responses(
        (status = 200, description = "Open case assessments", body = Vec<CaseAssessmentResponse>),
    ),
    tag = "cases"
)]
async fn list_cases(
    State(state): State<AppState>,
) -> Result<Json<Vec<CaseAssessmentResponse>>, AppError> {
    let mut assessments = Vec::new();
    for case_id in state.service.open_case_ids()? {
        assessments.push(CaseAssessmentResponse::from(
            state.service.assess(&case_id)?,
        ));
    }
    Ok(Json(assessments))
}

/// GET /v1/cases/:id — One case's current assessment.
#[utoipa::path(
    get,
    path = "/v1/cases/{id}",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case assessment", body = CaseAssessmentResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseAssessmentResponse>, AppError> {
    let assessment = state.service.assess(&CaseId::from_uuid(id))?;
    Ok(Json(CaseAssessmentResponse::from(assessment)))
}

/// POST /v1/cases/:id/check — Manual out-of-cycle evaluation.
///
/// Runs the same evaluate-dispatch-escalate cycle a scheduler sweep would,
/// for one case, and works while the scheduler is stopped.
#[utoipa::path(
    post,
    path = "/v1/cases/{id}/check",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Check completed", body = CheckCaseResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorBody),
        (status = 409, description = "Case is closed", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn check_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckCaseResponse>, AppError> {
    let case_id = CaseId::from_uuid(id);

    let assessment = state.service.monitor_compliance(&case_id)?;
    let alerts_dispatched = state.service.dispatch_alerts(&assessment)?;

    let mut emergency_triggered = false;
    if assessment.status().is_breached() && !assessment.context.emergency_protocol_active {
        state.service.trigger_emergency_response(&case_id)?;
        emergency_triggered = true;
    }

    // Re-read so the response shows the post-escalation context.
    let assessment = state.service.assess(&case_id)?;
    Ok(Json(CheckCaseResponse {
        assessment: CaseAssessmentResponse::from(assessment),
        alerts_dispatched,
        emergency_triggered,
    }))
}

/// GET /v1/cases/:id/alerts — Alerts warranted by the current assessment.
#[utoipa::path(
    get,
    path = "/v1/cases/{id}/alerts",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Current alerts", body = Vec<CaseAlertResponse>),
        (status = 404, description = "Case not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn get_alerts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CaseAlertResponse>>, AppError> {
    let assessment = state.service.assess(&CaseId::from_uuid(id))?;
    let alerts = state
        .service
        .generate_alerts(&assessment)
        .into_iter()
        .map(CaseAlertResponse::from)
        .collect();
    Ok(Json(alerts))
}

/// GET /v1/cases/:id/timeline — The case's append-only audit trail.
#[utoipa::path(
    get,
    path = "/v1/cases/{id}/timeline",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Audit trail", body = Vec<TimelineEventResponse>),
        (status = 404, description = "Case not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TimelineEventResponse>>, AppError> {
    let events = state
        .service
        .timeline(&CaseId::from_uuid(id))?
        .into_iter()
        .map(TimelineEventResponse::from)
        .collect();
    Ok(Json(events))
}

/// POST /v1/cases/:id/close — Archive a case.
///
/// Enforcement stops; the context and timeline remain queryable. Closing
/// an already-closed case keeps the original closure timestamp.
#[utoipa::path(
    post,
    path = "/v1/cases/{id}/close",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case closed", body = CaseAssessmentResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn close_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseAssessmentResponse>, AppError> {
    let case_id = CaseId::from_uuid(id);
    state.service.close_case(&case_id)?;
    let assessment = state.service.assess(&case_id)?;
    Ok(Json(CaseAssessmentResponse::from(assessment)))
}

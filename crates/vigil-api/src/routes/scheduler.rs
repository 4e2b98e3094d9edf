//! # Scheduler Control API
//!
//! Status and start/stop control for the background monitoring loop.
//! Start and stop are strict: requesting a state the scheduler is already
//! in returns a conflict, so operator scripts notice double-submission.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vigil_monitor::{MonitorStatus, TickSummary};

use crate::error::AppError;
use crate::state::AppState;

// ── Response DTOs ───────────────────────────────────────────────────

/// Outcome counters for one sweep over the open cases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct TickSummaryResponse {
    /// Cases that completed the full evaluate-and-dispatch cycle.
    pub evaluated: usize,
    /// Stakeholder notifications delivered across all cases.
    pub alerts_dispatched: usize,
    /// Emergency protocol activations initiated by the sweep.
    pub emergencies_triggered: usize,
    /// Cases whose evaluation or dispatch failed.
    pub failures: usize,
}

impl From<TickSummary> for TickSummaryResponse {
    fn from(summary: TickSummary) -> Self {
        Self {
            evaluated: summary.evaluated,
            alerts_dispatched: summary.alerts_dispatched,
            emergencies_triggered: summary.emergencies_triggered,
            failures: summary.failures,
        }
    }
}

/// Point-in-time report of the monitoring loop.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchedulerStatusResponse {
    /// Whether the background loop is live.
    pub running: bool,
    /// Configured sweep interval, in seconds.
    pub poll_interval_secs: u64,
    /// Sweeps completed so far, background and manual alike.
    pub ticks_completed: u64,
    /// Counters from the most recent sweep, if any has run.
    pub last_tick: Option<TickSummaryResponse>,
}

impl From<MonitorStatus> for SchedulerStatusResponse {
    fn from(status: MonitorStatus) -> Self {
        Self {
            running: status.running,
            poll_interval_secs: status.poll_interval_secs,
            ticks_completed: status.ticks_completed,
            last_tick: status.last_tick.map(TickSummaryResponse::from),
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the scheduler control router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/scheduler", get(scheduler_status))
        .route("/v1/scheduler/start", post(start_scheduler))
        .route("/v1/scheduler/stop", post(stop_scheduler))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/scheduler — Monitoring loop status and last tick summary.
#[utoipa::path(
    get,
    path = "/v1/scheduler",
    responses(
        (status = 200, description = "Scheduler status", body = SchedulerStatusResponse),
    ),
    tag = "scheduler"
)]
async fn scheduler_status(State(state): State<AppState>) -> Json<SchedulerStatusResponse> {
    Json(SchedulerStatusResponse::from(state.monitor.status()))
}

/// POST /v1/scheduler/start — Start the background monitoring loop.
#[utoipa::path(
    post,
    path = "/v1/scheduler/start",
    responses(
        (status = 200, description = "Scheduler started", body = SchedulerStatusResponse),
        (status = 409, description = "Already running", body = crate::error::ErrorBody),
    ),
    tag = "scheduler"
)]
async fn start_scheduler(
    State(state): State<AppState>,
) -> Result<Json<SchedulerStatusResponse>, AppError> {
    state.monitor.start()?;
    Ok(Json(SchedulerStatusResponse::from(state.monitor.status())))
}

/// POST /v1/scheduler/stop — Stop the background monitoring loop.
///
/// Waits for any in-flight sweep to finish before returning.
#[utoipa::path(
    post,
    path = "/v1/scheduler/stop",
    responses(
        (status = 200, description = "Scheduler stopped", body = SchedulerStatusResponse),
        (status = 409, description = "Not running", body = crate::error::ErrorBody),
    ),
    tag = "scheduler"
)]
async fn stop_scheduler(
    State(state): State<AppState>,
) -> Result<Json<SchedulerStatusResponse>, AppError> {
    state.monitor.stop().await?;
    Ok(Json(SchedulerStatusResponse::from(state.monitor.status())))
}

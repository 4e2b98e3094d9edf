//! # Enforcement Errors

use chrono::{DateTime, Utc};
use thiserror::Error;
use vigil_calendar::CalendarError;
use vigil_core::CaseId;

use crate::status::ComplianceStatus;
use crate::store::StoreError;

/// Failures surfaced by the enforcement service and the emergency handler.
#[derive(Error, Debug)]
pub enum EnforcementError {
    /// The case has no registered compliance context.
    #[error("no compliance context registered for case {case_id}")]
    CaseNotFound {
        /// The case that was looked up.
        case_id: CaseId,
    },

    /// A context for this case already exists; registration is one-shot.
    #[error("case {case_id} is already registered")]
    DuplicateCase {
        /// The case that was registered twice.
        case_id: CaseId,
    },

    /// Emergency protocol requested for a case that has not breached.
    #[error("case {case_id} is {status}, not emergency; protocol refused")]
    NotInEmergency {
        /// The case whose escalation was refused.
        case_id: CaseId,
        /// The status the case actually holds.
        status: ComplianceStatus,
    },

    /// The case was archived; evaluation no longer applies.
    #[error("case {case_id} was closed at {closed_at}")]
    CaseClosed {
        /// The archived case.
        case_id: CaseId,
        /// When the case was closed.
        closed_at: DateTime<Utc>,
    },

    /// Working-day arithmetic failed, usually an uncovered calendar year.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// The context store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

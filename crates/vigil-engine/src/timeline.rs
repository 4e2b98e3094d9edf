//! # Case Timeline — Append-Only Audit Trail
//!
//! Records every compliance-relevant thing that happens to a tracked case,
//! for regulatory review and operator forensics.
//!
//! ## Security Invariant
//!
//! The trail is append-only: no event is ever mutated or removed once
//! written. Ordering is total by timestamp, with ties broken by append
//! order. The store exposes append and read, nothing else.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use vigil_core::CaseId;

use crate::status::ComplianceStatus;

// ---------------------------------------------------------------------------
// TimelineEventKind
// ---------------------------------------------------------------------------

/// The kind of timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    /// A case entered compliance tracking.
    Registration,
    /// The severity tier moved (always upward) between evaluations.
    StatusTierChange,
    /// Alerts were generated and handed to the notifier.
    AlertIssued,
    /// The emergency protocol latched for the case.
    EmergencyTriggered,
}

impl TimelineEventKind {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::StatusTierChange => "status_tier_change",
            Self::AlertIssued => "alert_issued",
            Self::EmergencyTriggered => "emergency_triggered",
        }
    }
}

impl std::fmt::Display for TimelineEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TimelineEvent
// ---------------------------------------------------------------------------

/// A single entry in a case's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// The case this event belongs to.
    pub case_id: CaseId,
    /// What happened.
    pub kind: TimelineEventKind,
    /// UTC timestamp when the event occurred.
    pub at: DateTime<Utc>,
    /// Human-readable description for operators.
    pub description: String,
    /// Structured payload for machine consumers.
    pub metadata: serde_json::Value,
}

impl TimelineEvent {
    /// Create a new event.
    pub fn new(
        case_id: CaseId,
        kind: TimelineEventKind,
        at: DateTime<Utc>,
        description: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            case_id,
            kind,
            at,
            description: description.into(),
            metadata,
        }
    }

    /// Event recorded when a case enters tracking.
    pub fn registration(
        case_id: CaseId,
        at: DateTime<Utc>,
        trigger_date: NaiveDate,
        deadline: NaiveDate,
        required_working_days: u32,
        initial_status: ComplianceStatus,
    ) -> Self {
        Self::new(
            case_id,
            TimelineEventKind::Registration,
            at,
            format!(
                "case registered; statutory deadline {deadline} \
                 ({required_working_days} working days after {trigger_date})"
            ),
            json!({
                "trigger_date": trigger_date,
                "deadline": deadline,
                "required_working_days": required_working_days,
                "initial_status": initial_status,
            }),
        )
    }

    /// Event recorded when the severity tier moves.
    pub fn tier_change(
        case_id: CaseId,
        at: DateTime<Utc>,
        from: ComplianceStatus,
        to: ComplianceStatus,
        days_remaining: i64,
    ) -> Self {
        Self::new(
            case_id,
            TimelineEventKind::StatusTierChange,
            at,
            format!("status escalated from {from} to {to} ({days_remaining} days remaining)"),
            json!({
                "from": from,
                "to": to,
                "days_remaining": days_remaining,
            }),
        )
    }

    /// Event recorded when alerts are handed to the notifier.
    pub fn alert_issued(
        case_id: CaseId,
        at: DateTime<Utc>,
        status: ComplianceStatus,
        hours_remaining: i64,
        notifications_dispatched: usize,
    ) -> Self {
        Self::new(
            case_id,
            TimelineEventKind::AlertIssued,
            at,
            format!("{status} alert issued ({hours_remaining} hours remaining)"),
            json!({
                "status": status,
                "hours_remaining": hours_remaining,
                "notifications_dispatched": notifications_dispatched,
            }),
        )
    }

    /// Event recorded the one time the emergency protocol latches.
    pub fn emergency_triggered(
        case_id: CaseId,
        at: DateTime<Utc>,
        days_overdue: i64,
        next_review_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            case_id,
            TimelineEventKind::EmergencyTriggered,
            at,
            format!(
                "emergency protocol activated; {days_overdue} days past the statutory deadline"
            ),
            json!({
                "days_overdue": days_overdue,
                "next_review_at": next_review_at,
            }),
        )
    }
}

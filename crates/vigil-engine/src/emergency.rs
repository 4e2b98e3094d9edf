//! # Emergency Protocol — Breach Escalation
//!
//! When a case reaches the emergency tier the protocol handler activates
//! the emergency response: it latches `emergency_protocol_active` on the
//! context, notifies the full emergency audience, records the activation in
//! the timeline, and schedules the next mandatory review.
//!
//! ## Security Invariant
//!
//! Activation is one-shot. The latch is set inside the store's atomic
//! update, and only the invocation that flips it from inactive dispatches
//! notifications and writes the audit event. Repeat triggers return the
//! current response with zero dispatches; they never duplicate the audit
//! record or re-page stakeholders.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use vigil_calendar::days_remaining;
use vigil_core::{CaseId, Clock};

use crate::alert::build_alert;
use crate::context::ComplianceAssessment;
use crate::error::EnforcementError;
use crate::notify::Notifier;
use crate::status::ComplianceStatus;
use crate::store::ContextStore;
use crate::timeline::TimelineEvent;

// ---------------------------------------------------------------------------
// EmergencyResponse
// ---------------------------------------------------------------------------

/// Outcome of an emergency protocol trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyResponse {
    /// The breached case.
    pub case_id: CaseId,
    /// Always `true` after a successful trigger; the latch never clears.
    pub emergency_protocol_active: bool,
    /// Stakeholder notifications delivered by *this* trigger. Zero when the
    /// protocol was already active.
    pub notifications_dispatched: usize,
    /// Whole days past the statutory deadline, clamped at zero on the
    /// deadline day itself.
    pub days_overdue: i64,
    /// Escalation level of the emergency tier.
    pub escalation_level: u8,
    /// When the case must next be reviewed by an operator.
    pub next_review_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// EmergencyProtocolHandler
// ---------------------------------------------------------------------------

/// Activates and re-reports the emergency protocol for breached cases.
#[derive(Debug)]
pub struct EmergencyProtocolHandler {
    store: Arc<dyn ContextStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    review_interval: Duration,
}

impl EmergencyProtocolHandler {
    /// Wire a handler over shared collaborators. Reviews default to hourly.
    pub fn new(
        store: Arc<dyn ContextStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            review_interval: Duration::hours(1),
        }
    }

    /// Override the interval between mandatory emergency reviews.
    pub fn with_review_interval(mut self, interval: Duration) -> Self {
        self.review_interval = interval;
        self
    }

    /// Activate the emergency protocol for a breached case.
    ///
    /// The case must already hold the emergency tier; triggering the
    /// protocol on a case that has not breached is refused rather than
    /// quietly escalated.
    pub fn trigger(&self, case_id: &CaseId) -> Result<EmergencyResponse, EnforcementError> {
        let context = self
            .store
            .get(case_id)?
            .ok_or_else(|| EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            })?;

        if context.status != ComplianceStatus::Emergency {
            return Err(EnforcementError::NotInEmergency {
                case_id: case_id.clone(),
                status: context.status,
            });
        }

        let now = self.clock.now();
        let remaining = days_remaining(context.deadline, self.clock.today());
        let days_overdue = (-remaining).max(0);

        // The flag is decided at the top of the closure so that a store
        // which re-runs the closure on contention still reports the latch
        // exactly once, from the invocation that committed.
        let mut latched = false;
        let updated = self
            .store
            .update(case_id, &mut |ctx| {
                latched = !ctx.emergency_protocol_active;
                ctx.emergency_protocol_active = true;
            })?
            .ok_or_else(|| EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            })?;

        let next_review_at = now + self.review_interval;
        let mut notifications_dispatched = 0;

        if latched {
            let assessment = ComplianceAssessment {
                context: updated,
                days_remaining: remaining,
                evaluated_at: now,
            };
            let alert = build_alert(&assessment);
            for role in &alert.notify {
                match self.notifier.notify(*role, case_id, &alert) {
                    Ok(()) => notifications_dispatched += 1,
                    Err(err) => {
                        tracing::warn!(
                            case_id = %case_id,
                            role = %role,
                            error = %err,
                            "emergency notification failed"
                        );
                    }
                }
            }

            self.store.append_event(TimelineEvent::emergency_triggered(
                case_id.clone(),
                now,
                days_overdue,
                next_review_at,
            ))?;

            tracing::error!(
                case_id = %case_id,
                days_overdue,
                notifications_dispatched,
                "emergency protocol activated"
            );
        }

        Ok(EmergencyResponse {
            case_id: case_id.clone(),
            emergency_protocol_active: true,
            notifications_dispatched,
            days_overdue,
            escalation_level: ComplianceStatus::Emergency.escalation_level(),
            next_review_at,
        })
    }
}

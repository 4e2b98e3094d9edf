//! # Timeline Enforcement Service — Case Lifecycle Orchestration
//!
//! [`TimelineEnforcementService`] is the single entry point for everything a
//! case goes through: registration with deadline projection, countdown
//! re-evaluation, alert dispatch, emergency escalation, and archival. The
//! HTTP layer and the background monitor both drive this type; neither
//! touches the store or the notifier directly.
//!
//! ## Design
//!
//! - **Collaborators are injected.** Store, notifier, and clock arrive as
//!   `Arc<dyn Trait>`, so tests swap in [`crate::MemoryStore`],
//!   [`crate::RecordingNotifier`], and `FixedClock` without feature flags.
//! - **The deadline is computed once.** Registration projects it from the
//!   trigger date and the context never changes it; every later evaluation
//!   recomputes only the countdown against the injected clock.
//! - **Status writes go through the severity guard.** The classifier's
//!   observation is merged into the stored status with
//!   [`max_severity`](crate::ComplianceStatus::max_severity) inside the
//!   store's atomic update,
//!   so a stale clock or a delayed tick can never walk a case back down.
//!
//! ## Security Invariant
//!
//! Re-evaluation never triggers the emergency protocol on its own. Breach
//! detection marks the case `emergency`; activation is an explicit call so
//! the audit trail attributes it to the scheduler tick or operator request
//! that made it.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use vigil_calendar::{days_remaining, WorkingDayCalculator};
use vigil_core::{CaseId, Clock};

use crate::alert::{build_alert, DeadlineAlert};
use crate::context::{CaseRegistration, ComplianceAssessment, ComplianceContext};
use crate::emergency::{EmergencyProtocolHandler, EmergencyResponse};
use crate::error::EnforcementError;
use crate::notify::Notifier;
use crate::status::{classify, StatusThresholds};
use crate::store::{ContextStore, StoreError};
use crate::timeline::TimelineEvent;

// ---------------------------------------------------------------------------
// EnforcementConfig
// ---------------------------------------------------------------------------

/// Tunable policy for the enforcement service.
#[derive(Debug, Clone, Copy)]
pub struct EnforcementConfig {
    /// Working days allowed between trigger and deadline.
    pub required_working_days: u32,
    /// Day counts at which the severity tiers begin.
    pub thresholds: StatusThresholds,
    /// Interval between mandatory emergency reviews.
    pub review_interval: Duration,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            required_working_days: 6,
            thresholds: StatusThresholds::default(),
            review_interval: Duration::hours(1),
        }
    }
}

impl EnforcementConfig {
    /// Override the statutory working-day allowance.
    pub fn with_required_working_days(mut self, days: u32) -> Self {
        self.required_working_days = days;
        self
    }

    /// Override the severity tier thresholds.
    pub fn with_thresholds(mut self, thresholds: StatusThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Override the emergency review interval.
    pub fn with_review_interval(mut self, interval: Duration) -> Self {
        self.review_interval = interval;
        self
    }
}

// ---------------------------------------------------------------------------
// TimelineEnforcementService
// ---------------------------------------------------------------------------

/// Orchestrates the statutory deadline lifecycle for every tracked case.
#[derive(Debug)]
pub struct TimelineEnforcementService {
    store: Arc<dyn ContextStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    calculator: WorkingDayCalculator,
    config: EnforcementConfig,
    emergency: EmergencyProtocolHandler,
}

impl TimelineEnforcementService {
    /// Wire a service over shared collaborators.
    pub fn new(
        store: Arc<dyn ContextStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        calculator: WorkingDayCalculator,
        config: EnforcementConfig,
    ) -> Self {
        let emergency = EmergencyProtocolHandler::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        )
        .with_review_interval(config.review_interval);

        Self {
            store,
            notifier,
            clock,
            calculator,
            config,
            emergency,
        }
    }

    /// The policy this service enforces.
    pub fn config(&self) -> &EnforcementConfig {
        &self.config
    }

    /// Register a case and start its statutory countdown.
    ///
    /// Projects the deadline from the trigger date, classifies the opening
    /// tier, persists the context, and records the registration in the
    /// timeline. A case registered after its deadline has already passed is
    /// escalated into the emergency protocol before this returns.
    ///
    /// # Errors
    ///
    /// [`EnforcementError::DuplicateCase`] when the case is already
    /// registered; [`EnforcementError::Calendar`] when the trigger date or
    /// the projected deadline falls outside calendar coverage.
    pub fn initialize_compliance(
        &self,
        case_id: CaseId,
        trigger_date: NaiveDate,
        registration: CaseRegistration,
    ) -> Result<ComplianceAssessment, EnforcementError> {
        let deadline = self
            .calculator
            .calculate_deadline(trigger_date, self.config.required_working_days)?;

        let now = self.clock.now();
        let remaining = days_remaining(deadline, self.clock.today());
        let status = classify(remaining, self.config.thresholds);

        let context = ComplianceContext {
            case_id: case_id.clone(),
            trigger_date,
            deadline,
            required_working_days: self.config.required_working_days,
            status,
            emergency_protocol_active: false,
            jurisdiction: registration.jurisdiction,
            identity_verified: registration.identity_verified,
            registered_at: now,
            last_evaluated_at: now,
            closed_at: None,
        };

        self.store.insert(context.clone()).map_err(|err| match err {
            StoreError::DuplicateContext { case_id } => EnforcementError::DuplicateCase { case_id },
            other => EnforcementError::Store(other),
        })?;

        self.store.append_event(TimelineEvent::registration(
            case_id.clone(),
            now,
            trigger_date,
            deadline,
            self.config.required_working_days,
            status,
        ))?;

        tracing::info!(
            case_id = %case_id,
            %trigger_date,
            %deadline,
            days_remaining = remaining,
            status = %status,
            "case registered"
        );

        // Late registrations can open already breached. The protocol fires
        // here so the case is never tracked-but-unescalated.
        let context = if status.is_breached() {
            self.emergency.trigger(&case_id)?;
            self.store
                .get(&case_id)?
                .ok_or_else(|| EnforcementError::CaseNotFound {
                    case_id: case_id.clone(),
                })?
        } else {
            context
        };

        Ok(ComplianceAssessment {
            context,
            days_remaining: remaining,
            evaluated_at: now,
        })
    }

    /// Re-evaluate the countdown and escalate the stored tier if needed.
    ///
    /// Computes days remaining against the injected clock, classifies the
    /// observation, and merges it into the stored status under the severity
    /// guard. A tier change is appended to the timeline; an unchanged tier
    /// touches only `last_evaluated_at`.
    ///
    /// Detecting a breach marks the case `emergency` but does not activate
    /// the protocol; see the module docs.
    pub fn monitor_compliance(
        &self,
        case_id: &CaseId,
    ) -> Result<ComplianceAssessment, EnforcementError> {
        let context = self
            .store
            .get(case_id)?
            .ok_or_else(|| EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            })?;

        if let Some(closed_at) = context.closed_at {
            return Err(EnforcementError::CaseClosed {
                case_id: case_id.clone(),
                closed_at,
            });
        }

        let now = self.clock.now();
        // The deadline is immutable after registration, so the countdown
        // and the observed tier can be computed outside the store's lock.
        let remaining = days_remaining(context.deadline, self.clock.today());
        let observed = classify(remaining, self.config.thresholds);

        let mut previous = context.status;
        let updated = self
            .store
            .update(case_id, &mut |ctx| {
                previous = ctx.status;
                ctx.status = ctx.status.max_severity(observed);
                ctx.last_evaluated_at = now;
            })?
            .ok_or_else(|| EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            })?;

        if updated.status != previous {
            self.store.append_event(TimelineEvent::tier_change(
                case_id.clone(),
                now,
                previous,
                updated.status,
                remaining,
            ))?;
            tracing::info!(
                case_id = %case_id,
                from = %previous,
                to = %updated.status,
                days_remaining = remaining,
                "status tier escalated"
            );
        }

        Ok(ComplianceAssessment {
            context: updated,
            days_remaining: remaining,
            evaluated_at: now,
        })
    }

    /// Read-only view of a case: stored context plus a fresh countdown.
    ///
    /// Never writes. Works on closed cases, whose countdown keeps moving
    /// for reporting purposes even though enforcement has stopped.
    pub fn assess(&self, case_id: &CaseId) -> Result<ComplianceAssessment, EnforcementError> {
        let context = self
            .store
            .get(case_id)?
            .ok_or_else(|| EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            })?;

        let remaining = days_remaining(context.deadline, self.clock.today());
        Ok(ComplianceAssessment {
            context,
            days_remaining: remaining,
            evaluated_at: self.clock.now(),
        })
    }

    /// Alerts warranted by the given assessment.
    pub fn generate_alerts(&self, assessment: &ComplianceAssessment) -> Vec<DeadlineAlert> {
        vec![build_alert(assessment)]
    }

    /// Dispatch the assessment's alerts to their stakeholder audiences.
    ///
    /// Each delivery failure is logged and skipped; one unreachable channel
    /// must not starve the rest of the audience. Every issued alert is
    /// recorded in the timeline with its delivered count. Returns the number
    /// of notifications that went out.
    pub fn dispatch_alerts(
        &self,
        assessment: &ComplianceAssessment,
    ) -> Result<usize, EnforcementError> {
        let now = self.clock.now();
        let mut total_dispatched = 0;

        for alert in self.generate_alerts(assessment) {
            let mut dispatched = 0;
            for role in &alert.notify {
                match self.notifier.notify(*role, assessment.case_id(), &alert) {
                    Ok(()) => dispatched += 1,
                    Err(err) => {
                        tracing::warn!(
                            case_id = %assessment.case_id(),
                            role = %role,
                            error = %err,
                            "alert notification failed"
                        );
                    }
                }
            }

            self.store.append_event(TimelineEvent::alert_issued(
                assessment.case_id().clone(),
                now,
                alert.status,
                alert.hours_remaining,
                dispatched,
            ))?;
            total_dispatched += dispatched;
        }

        Ok(total_dispatched)
    }

    /// The append-ordered audit trail for a case.
    pub fn timeline(&self, case_id: &CaseId) -> Result<Vec<TimelineEvent>, EnforcementError> {
        if self.store.get(case_id)?.is_none() {
            return Err(EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            });
        }
        Ok(self.store.events(case_id)?)
    }

    /// Archive a case. Enforcement stops; the context and timeline remain.
    ///
    /// Idempotent: closing a closed case keeps the original `closed_at`.
    pub fn close_case(&self, case_id: &CaseId) -> Result<ComplianceContext, EnforcementError> {
        let now = self.clock.now();
        let updated = self
            .store
            .update(case_id, &mut |ctx| {
                if ctx.closed_at.is_none() {
                    ctx.closed_at = Some(now);
                }
            })?
            .ok_or_else(|| EnforcementError::CaseNotFound {
                case_id: case_id.clone(),
            })?;

        tracing::info!(case_id = %case_id, "case closed");
        Ok(updated)
    }

    /// Ids of every case still under enforcement.
    pub fn open_case_ids(&self) -> Result<Vec<CaseId>, EnforcementError> {
        let mut open = Vec::new();
        for case_id in self.store.case_ids()? {
            if let Some(context) = self.store.get(&case_id)? {
                if !context.is_closed() {
                    open.push(case_id);
                }
            }
        }
        Ok(open)
    }

    /// Activate the emergency protocol for a breached case.
    pub fn trigger_emergency_response(
        &self,
        case_id: &CaseId,
    ) -> Result<EmergencyResponse, EnforcementError> {
        self.emergency.trigger(case_id)
    }
}

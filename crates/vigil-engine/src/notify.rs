//! # Notifier Collaborator
//!
//! Outbound notification is an integration concern (SMS, email, chat); the
//! engine's obligation ends at handing a [`DeadlineAlert`] to a
//! [`Notifier`] per stakeholder. Delivery failures are logged and absorbed:
//! an evaluation always completes, and the alert counts as generated even
//! when delivery failed.

use parking_lot::Mutex;
use thiserror::Error;
use vigil_core::CaseId;

use crate::alert::{DeadlineAlert, StakeholderRole};

/// Notification delivery failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The transport reported a delivery failure.
    #[error("delivery failed: {reason}")]
    Delivery {
        /// Transport-specific failure description.
        reason: String,
    },
}

/// Dispatches one alert to one stakeholder.
///
/// Implementations must return promptly — enqueue for transport rather than
/// blocking on it, so a slow channel cannot stall a monitoring tick.
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Deliver `alert` for `case_id` to the given stakeholder.
    fn notify(
        &self,
        role: StakeholderRole,
        case_id: &CaseId,
        alert: &DeadlineAlert,
    ) -> Result<(), NotifyError>;
}

/// Notifier that writes structured log lines instead of delivering.
///
/// The default wiring until a real transport is configured: every dispatch
/// is visible to operators, none leaves the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(
        &self,
        role: StakeholderRole,
        case_id: &CaseId,
        alert: &DeadlineAlert,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            case_id = %case_id,
            role = %role,
            status = %alert.status,
            hours_remaining = alert.hours_remaining,
            "deadline alert dispatched"
        );
        Ok(())
    }
}

/// Notifier that silently accepts everything. For dry-runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(
        &self,
        _role: StakeholderRole,
        _case_id: &CaseId,
        _alert: &DeadlineAlert,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Notifier that records every dispatch, optionally failing on demand.
///
/// Public (not test-gated) so downstream crates can assert on dispatches in
/// their own tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<(StakeholderRole, CaseId)>>,
    fail_reason: Mutex<Option<String>>,
}

impl RecordingNotifier {
    /// A recorder that accepts every dispatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent dispatch fail with the given reason, or accept
    /// again when `None`.
    pub fn set_failing(&self, reason: Option<String>) {
        *self.fail_reason.lock() = reason;
    }

    /// Every `(role, case)` pair dispatched so far, in order.
    pub fn deliveries(&self) -> Vec<(StakeholderRole, CaseId)> {
        self.deliveries.lock().clone()
    }

    /// Number of dispatches recorded so far.
    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        role: StakeholderRole,
        case_id: &CaseId,
        _alert: &DeadlineAlert,
    ) -> Result<(), NotifyError> {
        if let Some(reason) = self.fail_reason.lock().clone() {
            return Err(NotifyError::Delivery { reason });
        }
        self.deliveries.lock().push((role, case_id.clone()));
        Ok(())
    }
}

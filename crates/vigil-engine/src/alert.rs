//! # Deadline Alerts
//!
//! Pure mapping from a case's current severity tier to a structured alert:
//! who to notify, what to tell them, and what to do next.
//!
//! ## Regeneration
//!
//! Alerts are ephemeral value objects, rebuilt fresh on every evaluation and
//! never diffed against a prior alert. Re-issuing an identical alert for an
//! unchanged tier is an accepted idempotent cost.

use serde::{Deserialize, Serialize};
use vigil_core::CaseId;

use crate::context::ComplianceAssessment;
use crate::status::ComplianceStatus;

// ---------------------------------------------------------------------------
// StakeholderRole
// ---------------------------------------------------------------------------

/// The parties a deadline alert can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderRole {
    /// Next of kin of the deceased.
    Family,
    /// The funeral director responsible for the case.
    FuneralDirector,
    /// Coordinator of the booked ceremony venue.
    VenueCoordinator,
    /// The municipal registry office — the regulating authority for the
    /// statutory deadline.
    Municipality,
    /// Funeral-home management, looped in once the deadline is breached.
    Management,
}

impl StakeholderRole {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::FuneralDirector => "funeral_director",
            Self::VenueCoordinator => "venue_coordinator",
            Self::Municipality => "municipality",
            Self::Management => "management",
        }
    }
}

impl std::fmt::Display for StakeholderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience for a tier, in escalation order. Each tier notifies everyone the
/// previous one did; nobody is ever dropped as severity rises.
fn stakeholders_for(status: ComplianceStatus) -> Vec<StakeholderRole> {
    use StakeholderRole::*;
    match status {
        ComplianceStatus::Pending | ComplianceStatus::InProgress => {
            vec![Family, FuneralDirector]
        }
        ComplianceStatus::AtRisk => vec![Family, FuneralDirector, VenueCoordinator],
        ComplianceStatus::Emergency => vec![
            Family,
            FuneralDirector,
            VenueCoordinator,
            Municipality,
            Management,
        ],
    }
}

// ---------------------------------------------------------------------------
// DeadlineAlert
// ---------------------------------------------------------------------------

/// A structured, regenerable alert for one case at one severity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineAlert {
    /// The case the alert concerns.
    pub case_id: CaseId,
    /// Severity tier the alert was generated for.
    pub status: ComplianceStatus,
    /// Display countdown in hours: `max(0, days_remaining) * 24`. Never
    /// negative, even when the underlying countdown is.
    pub hours_remaining: i64,
    /// Human-readable summary for the notification body.
    pub message: String,
    /// Ordered action checklist for the receiving stakeholder.
    pub actions: Vec<String>,
    /// Who to notify, in escalation order.
    pub notify: Vec<StakeholderRole>,
}

/// Build the alert for an assessment's current tier.
pub fn build_alert(assessment: &ComplianceAssessment) -> DeadlineAlert {
    let status = assessment.status();
    let deadline = assessment.context.deadline;
    let days = assessment.days_remaining;
    let hours_remaining = days.max(0) * 24;

    let (message, actions) = match status {
        ComplianceStatus::Pending => (
            format!(
                "Statutory deadline {deadline} is {days} days away; arrangements on schedule."
            ),
            vec![
                "confirm burial or cremation choice with the family".to_owned(),
                "collect the death certificate from the registry office".to_owned(),
                "schedule the service date and venue".to_owned(),
            ],
        ),
        ComplianceStatus::InProgress => (
            format!(
                "Statutory deadline {deadline} is {days} days away; arrangements must be underway."
            ),
            vec![
                "finalize the venue booking".to_owned(),
                "verify all filings with the registry office".to_owned(),
                "confirm transport and ceremony logistics".to_owned(),
            ],
        ),
        ComplianceStatus::AtRisk => (
            format!(
                "Only {hours_remaining} hours remain before the statutory deadline {deadline}."
            ),
            vec![
                "escalate to the funeral director today".to_owned(),
                "secure an expedited venue slot".to_owned(),
                "prepare all outstanding documents for same-day filing".to_owned(),
            ],
        ),
        ComplianceStatus::Emergency => (
            if days < 0 {
                format!(
                    "Statutory deadline {deadline} breached {} days ago; emergency handling required.",
                    -days
                )
            } else {
                format!(
                    "Statutory deadline {deadline} is today; emergency handling required."
                )
            },
            vec![
                "contact the municipality immediately".to_owned(),
                "activate the emergency protocol".to_owned(),
                "arrange the earliest possible service slot".to_owned(),
                "document the cause of delay for the regulator".to_owned(),
            ],
        ),
    };

    DeadlineAlert {
        case_id: assessment.case_id().clone(),
        status,
        hours_remaining,
        message,
        actions,
        notify: stakeholders_for(status),
    }
}

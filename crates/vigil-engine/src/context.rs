//! # Compliance Context
//!
//! The central record per tracked case, plus the assessment value returned
//! by every evaluation path.
//!
//! ## Derived, never stored
//!
//! The countdown (`days_remaining`) is a function of the current clock and
//! the immutable deadline. It is deliberately absent from
//! [`ComplianceContext`] so a stale copy can never masquerade as truth;
//! read paths return a [`ComplianceAssessment`] pairing the persisted
//! record with a countdown derived at evaluation time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::{CaseId, JurisdictionId};

use crate::status::ComplianceStatus;

// ---------------------------------------------------------------------------
// ComplianceContext
// ---------------------------------------------------------------------------

/// Persisted compliance state for one tracked case.
///
/// `trigger_date` and `deadline` are immutable once set; `status` and
/// `emergency_protocol_active` only ever move toward higher severity (the
/// store's update path enforces the guard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceContext {
    /// The tracked case.
    pub case_id: CaseId,
    /// Date the death was officially registered; starts the statutory clock.
    pub trigger_date: NaiveDate,
    /// Computed legal deadline: the last day of the statutory allowance.
    pub deadline: NaiveDate,
    /// The working-day allowance the deadline was computed from.
    pub required_working_days: u32,
    /// Current severity tier, as of `last_evaluated_at`.
    pub status: ComplianceStatus,
    /// Latches true when the emergency protocol fires; never resets.
    pub emergency_protocol_active: bool,
    /// Jurisdiction whose burial law governs the case, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<JurisdictionId>,
    /// Whether the deceased's identity has been formally verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_verified: Option<bool>,
    /// When the case entered compliance tracking.
    pub registered_at: DateTime<Utc>,
    /// When the case was last evaluated against the clock.
    pub last_evaluated_at: DateTime<Utc>,
    /// Set when the external archival process closes the case. The engine
    /// never deletes contexts; closed cases simply drop out of monitoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl ComplianceContext {
    /// Whether the external archival process has closed this case.
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

// ---------------------------------------------------------------------------
// CaseRegistration
// ---------------------------------------------------------------------------

/// Optional attributes supplied by the case registry at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRegistration {
    /// Governing jurisdiction, if the registry knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<JurisdictionId>,
    /// Identity-verification flag, if the registry tracked it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_verified: Option<bool>,
}

impl CaseRegistration {
    /// Set the governing jurisdiction.
    pub fn with_jurisdiction(mut self, jurisdiction: JurisdictionId) -> Self {
        self.jurisdiction = Some(jurisdiction);
        self
    }

    /// Set the identity-verification flag.
    pub fn with_identity_verified(mut self, verified: bool) -> Self {
        self.identity_verified = Some(verified);
        self
    }
}

// ---------------------------------------------------------------------------
// ComplianceAssessment
// ---------------------------------------------------------------------------

/// A context paired with the countdown derived at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    /// The persisted record backing this assessment.
    pub context: ComplianceContext,
    /// Whole calendar days until the deadline; negative once breached.
    pub days_remaining: i64,
    /// Clock reading the countdown was derived from.
    pub evaluated_at: DateTime<Utc>,
}

impl ComplianceAssessment {
    /// The case this assessment is for.
    pub fn case_id(&self) -> &CaseId {
        &self.context.case_id
    }

    /// Severity tier of the underlying context.
    pub fn status(&self) -> ComplianceStatus {
        self.context.status
    }
}

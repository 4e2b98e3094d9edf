//! # Compliance Status & Classification
//!
//! Defines [`ComplianceStatus`] — the four severity tiers a tracked case
//! moves through as its statutory deadline approaches — and the pure
//! [`classify`] function mapping a days-remaining countdown onto a tier.
//!
//! ## Ordering
//!
//! Tiers form a strict severity order:
//!
//! ```text
//! pending < in_progress < at_risk < emergency
//! ```
//!
//! Because the deadline is immutable and time only moves forward, the tier
//! observed for a fixed case is monotonically non-decreasing across
//! successive evaluations. The store's write guard relies on this order:
//! [`ComplianceStatus::max_severity`] picks the tier that may be persisted
//! when two evaluations race.
//!
//! ## Thresholds
//!
//! The day cutoffs are configuration ([`StatusThresholds`]), validated at
//! construction. The defaults reproduce the statutory urgency bands:
//! breached at 0 days, at risk within 1, in progress within 2.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ComplianceStatus
// ---------------------------------------------------------------------------

/// Severity tier of a tracked case relative to its statutory deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Comfortable margin; routine planning.
    Pending,
    /// The deadline is near enough that arrangements should be underway.
    InProgress,
    /// One day of slack or less; active intervention required.
    AtRisk,
    /// The deadline is today or has passed; the statutory clock is breached.
    Emergency,
}

impl ComplianceStatus {
    /// Severity rank. Higher is more urgent.
    fn severity(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::AtRisk => 2,
            Self::Emergency => 3,
        }
    }

    /// The more severe of two tiers.
    ///
    /// # Security Invariant
    ///
    /// This is the write guard's comparator: a persisted status may only be
    /// replaced by `max_severity(persisted, computed)`, so a stale
    /// evaluation can never downgrade a record.
    pub fn max_severity(self, other: Self) -> Self {
        if self.severity() >= other.severity() {
            self
        } else {
            other
        }
    }

    /// Rung on the stakeholder escalation ladder (0..=3).
    ///
    /// Matches the alert audience for the tier: 0 and 1 notify the family
    /// and the funeral director, 2 adds the venue, 3 adds the municipality
    /// and management.
    pub fn escalation_level(self) -> u8 {
        self.severity()
    }

    /// Whether this tier means the statutory deadline is breached.
    pub fn is_breached(self) -> bool {
        matches!(self, Self::Emergency)
    }

    /// Return the string representation of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::AtRisk => "at_risk",
            Self::Emergency => "emergency",
        }
    }
}

impl PartialOrd for ComplianceStatus {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplianceStatus {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatusThresholds
// ---------------------------------------------------------------------------

/// Day cutoffs for [`classify`], in calendar days remaining.
///
/// A countdown value is compared against the cutoffs from most to least
/// severe; validation guarantees the bands cannot overlap out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// At or below this many days remaining the case is `emergency`.
    pub emergency_at: i64,
    /// At or below this many days remaining the case is `at_risk`.
    pub at_risk_within: i64,
    /// At or below this many days remaining the case is `in_progress`.
    pub in_progress_within: i64,
}

impl StatusThresholds {
    /// Build validated thresholds.
    ///
    /// # Errors
    ///
    /// [`ThresholdsError::OutOfOrder`] unless
    /// `emergency_at < at_risk_within < in_progress_within`.
    pub fn new(
        emergency_at: i64,
        at_risk_within: i64,
        in_progress_within: i64,
    ) -> Result<Self, ThresholdsError> {
        if !(emergency_at < at_risk_within && at_risk_within < in_progress_within) {
            return Err(ThresholdsError::OutOfOrder {
                emergency_at,
                at_risk_within,
                in_progress_within,
            });
        }
        Ok(Self {
            emergency_at,
            at_risk_within,
            in_progress_within,
        })
    }
}

impl Default for StatusThresholds {
    /// The statutory bands: breached at 0, at risk within 1, in progress
    /// within 2 days remaining.
    fn default() -> Self {
        Self {
            emergency_at: 0,
            at_risk_within: 1,
            in_progress_within: 2,
        }
    }
}

/// Invalid threshold configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThresholdsError {
    /// Cutoffs must be strictly increasing from emergency to in-progress.
    #[error(
        "status thresholds must satisfy emergency < at_risk < in_progress, \
         got {emergency_at} / {at_risk_within} / {in_progress_within}"
    )]
    OutOfOrder {
        /// Configured emergency cutoff.
        emergency_at: i64,
        /// Configured at-risk cutoff.
        at_risk_within: i64,
        /// Configured in-progress cutoff.
        in_progress_within: i64,
    },
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Map a calendar-day countdown onto a severity tier.
///
/// Pure: the only inputs are the countdown and the cutoffs. Monotone:
/// a smaller `days_remaining` never yields a less severe tier.
pub fn classify(days_remaining: i64, thresholds: StatusThresholds) -> ComplianceStatus {
    if days_remaining <= thresholds.emergency_at {
        ComplianceStatus::Emergency
    } else if days_remaining <= thresholds.at_risk_within {
        ComplianceStatus::AtRisk
    } else if days_remaining <= thresholds.in_progress_within {
        ComplianceStatus::InProgress
    } else {
        ComplianceStatus::Pending
    }
}

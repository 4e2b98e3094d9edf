//! # vigil-engine — Statutory Deadline Compliance Engine
//!
//! The core of the stack: given the date a death was officially registered,
//! burial law allows a fixed number of working days to complete the funeral
//! arrangements. This crate tracks each case against that clock — severity
//! classification, stakeholder alerts, an append-only audit timeline, and a
//! one-shot emergency protocol once the deadline is breached.
//!
//! ## Design
//!
//! Everything stateful flows through [`TimelineEnforcementService`], which
//! is constructed with explicit collaborators (persistence, notifier,
//! clock, calculator) — no ambient singletons, so tests run deterministic
//! and parallel. The pure pieces ([`classify`], [`build_alert`]) are free
//! functions over value objects.
//!
//! ## Security Invariant
//!
//! Observed severity for a fixed case never decreases: the deadline is
//! immutable and time moves forward. The persistence path enforces this as
//! a write guard — a stale evaluation can never downgrade a persisted
//! status — and `emergency_protocol_active` latches true exactly once.

pub mod alert;
pub mod context;
pub mod emergency;
pub mod error;
pub mod notify;
pub mod service;
pub mod status;
pub mod store;
pub mod timeline;

pub use alert::{build_alert, DeadlineAlert, StakeholderRole};
pub use context::{CaseRegistration, ComplianceAssessment, ComplianceContext};
pub use emergency::{EmergencyProtocolHandler, EmergencyResponse};
pub use error::EnforcementError;
pub use notify::{LogNotifier, Notifier, NotifyError, NullNotifier, RecordingNotifier};
pub use service::{EnforcementConfig, TimelineEnforcementService};
pub use status::{classify, ComplianceStatus, StatusThresholds, ThresholdsError};
pub use store::{ContextStore, MemoryStore, StoreError};
pub use timeline::{TimelineEvent, TimelineEventKind};

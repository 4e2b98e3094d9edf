//! # Domain Primitive Validation Errors
//!
//! Structured error types for newtype construction, built with `thiserror`.
//! Subsystem-specific errors (calendar configuration, enforcement, monitor
//! control) live in their own crates; this module only covers the shared
//! primitives.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Jurisdiction identifier was empty or whitespace-only.
    #[error("invalid jurisdiction ID: must be non-empty")]
    InvalidJurisdictionId,
}

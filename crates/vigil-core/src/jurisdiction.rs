//! # Jurisdiction Identifier
//!
//! Newtype for the jurisdiction whose burial law governs a case. The
//! statutory working-day rule and the public-holiday calendar both key off
//! this identifier.
//!
//! ## Validation
//!
//! [`JurisdictionId`] is validated to be non-empty at construction time.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A jurisdiction identifier, typically an ISO 3166-1 code, optionally with
/// a regional suffix (e.g., "NL" for the Netherlands, "NL-ZH" for
/// Zuid-Holland municipalities with deviating holiday observance).
///
/// # Validation
///
/// Must be a non-empty string. No further format restrictions are imposed
/// because municipal registration offices use a mix of national and local
/// coding schemes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JurisdictionId(String);

impl JurisdictionId {
    /// Create a jurisdiction identifier from a string, validating
    /// non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdictionId`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidJurisdictionId);
        }
        Ok(Self(s))
    }

    /// Access the jurisdiction identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JurisdictionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

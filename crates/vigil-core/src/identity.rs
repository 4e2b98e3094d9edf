//! # Case Identifier
//!
//! Newtype for the identifier of a tracked funeral case. The case itself
//! (deceased details, booking, documents) lives in the external case
//! registry; the compliance engine only ever addresses it by this id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tracked funeral case.
///
/// UUID-based and always valid by construction. The external case registry
/// allocates these; the engine treats them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(Uuid);

impl CaseId {
    /// Create a new random case identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a case identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_id_unique() {
        let a = CaseId::new();
        let b = CaseId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn case_id_from_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = CaseId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn case_id_serde_is_plain_uuid() {
        let id = CaseId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: CaseId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

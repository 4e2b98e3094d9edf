//! # Context Store — Persistence Collaborator
//!
//! The engine is storage-agnostic: everything it persists goes through the
//! [`ContextStore`] trait. [`MemoryStore`] is the reference implementation,
//! a `parking_lot`-guarded map with closure-based atomic read-modify-write.
//!
//! ## Atomicity contract
//!
//! `update` runs the caller's closure while holding the record's write
//! serialization, so read-modify-write cycles on one case never interleave.
//! Implementations backed by optimistic concurrency may invoke the closure
//! more than once on retry; closures must therefore be idempotent, and only
//! the final invocation's effects are committed.
//!
//! ## Append-only events
//!
//! The trait exposes append and read for timeline events, nothing else. No
//! implementation can be asked to mutate or delete an event.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;
use vigil_core::CaseId;

use crate::context::ComplianceContext;
use crate::timeline::TimelineEvent;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Persistence failures. Surfaced to callers, never swallowed: a lost
/// context write would desynchronize observed status from the audit trail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert for a case that already has a context.
    #[error("context for case {case_id} already exists")]
    DuplicateContext {
        /// The case that was registered twice.
        case_id: CaseId,
    },

    /// The backing store is unreachable or failed an operation.
    ///
    /// Unused by [`MemoryStore`]; external implementations (SQL, KV) map
    /// their transport errors here.
    #[error("store backend failure: {reason}")]
    Backend {
        /// Backend-specific failure description.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// ContextStore
// ---------------------------------------------------------------------------

/// Persistence operations the enforcement service depends on.
pub trait ContextStore: Send + Sync + std::fmt::Debug {
    /// Persist a new context. Fails if the case already has one.
    fn insert(&self, context: ComplianceContext) -> Result<(), StoreError>;

    /// Fetch the current context for a case, if any.
    fn get(&self, case_id: &CaseId) -> Result<Option<ComplianceContext>, StoreError>;

    /// Atomic read-modify-write. Runs `f` under the record's write
    /// serialization and returns the updated snapshot, or `None` when the
    /// case has no context.
    fn update(
        &self,
        case_id: &CaseId,
        f: &mut dyn FnMut(&mut ComplianceContext),
    ) -> Result<Option<ComplianceContext>, StoreError>;

    /// All tracked case ids, open and closed.
    fn case_ids(&self) -> Result<Vec<CaseId>, StoreError>;

    /// Append one event to the audit trail.
    fn append_event(&self, event: TimelineEvent) -> Result<(), StoreError>;

    /// The audit trail for one case, in append order.
    fn events(&self, case_id: &CaseId) -> Result<Vec<TimelineEvent>, StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory reference store.
///
/// A single `RwLock` over the context map serializes every
/// read-modify-write; the event log is a separate append-only vector.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contexts: RwLock<HashMap<CaseId, ComplianceContext>>,
    events: RwLock<Vec<TimelineEvent>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked contexts.
    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    /// Whether the store tracks no contexts.
    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }
}

impl ContextStore for MemoryStore {
    fn insert(&self, context: ComplianceContext) -> Result<(), StoreError> {
        let mut contexts = self.contexts.write();
        if contexts.contains_key(&context.case_id) {
            return Err(StoreError::DuplicateContext {
                case_id: context.case_id,
            });
        }
        contexts.insert(context.case_id.clone(), context);
        Ok(())
    }

    fn get(&self, case_id: &CaseId) -> Result<Option<ComplianceContext>, StoreError> {
        Ok(self.contexts.read().get(case_id).cloned())
    }

    fn update(
        &self,
        case_id: &CaseId,
        f: &mut dyn FnMut(&mut ComplianceContext),
    ) -> Result<Option<ComplianceContext>, StoreError> {
        let mut contexts = self.contexts.write();
        Ok(contexts.get_mut(case_id).map(|ctx| {
            f(ctx);
            ctx.clone()
        }))
    }

    fn case_ids(&self) -> Result<Vec<CaseId>, StoreError> {
        Ok(self.contexts.read().keys().cloned().collect())
    }

    fn append_event(&self, event: TimelineEvent) -> Result<(), StoreError> {
        self.events.write().push(event);
        Ok(())
    }

    fn events(&self, case_id: &CaseId) -> Result<Vec<TimelineEvent>, StoreError> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|event| &event.case_id == case_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ComplianceStatus;
    use crate::timeline::TimelineEventKind;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_context(case_id: CaseId) -> ComplianceContext {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        ComplianceContext {
            case_id,
            trigger_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
            required_working_days: 6,
            status: ComplianceStatus::Pending,
            emergency_protocol_active: false,
            jurisdiction: None,
            identity_verified: None,
            registered_at: now,
            last_evaluated_at: now,
            closed_at: None,
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let store = MemoryStore::new();
        let case_id = CaseId::new();
        store.insert(make_context(case_id.clone())).unwrap();
        let fetched = store.get(&case_id).unwrap().unwrap();
        assert_eq!(fetched.case_id, case_id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let case_id = CaseId::new();
        store.insert(make_context(case_id.clone())).unwrap();
        let err = store.insert(make_context(case_id.clone())).unwrap_err();
        assert_eq!(err, StoreError::DuplicateContext { case_id });
    }

    #[test]
    fn get_unknown_case_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(&CaseId::new()).unwrap().is_none());
    }

    #[test]
    fn update_returns_the_modified_snapshot() {
        let store = MemoryStore::new();
        let case_id = CaseId::new();
        store.insert(make_context(case_id.clone())).unwrap();

        let updated = store
            .update(&case_id, &mut |ctx| {
                ctx.status = ComplianceStatus::AtRisk;
            })
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ComplianceStatus::AtRisk);
        assert_eq!(
            store.get(&case_id).unwrap().unwrap().status,
            ComplianceStatus::AtRisk
        );
    }

    #[test]
    fn update_unknown_case_is_none() {
        let store = MemoryStore::new();
        let result = store.update(&CaseId::new(), &mut |_| {}).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn events_filter_by_case_and_keep_append_order() {
        let store = MemoryStore::new();
        let a = CaseId::new();
        let b = CaseId::new();
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();

        store
            .append_event(TimelineEvent::tier_change(
                a.clone(),
                at,
                ComplianceStatus::Pending,
                ComplianceStatus::InProgress,
                2,
            ))
            .unwrap();
        store
            .append_event(TimelineEvent::emergency_triggered(b.clone(), at, 1, at))
            .unwrap();
        store
            .append_event(TimelineEvent::tier_change(
                a.clone(),
                at,
                ComplianceStatus::InProgress,
                ComplianceStatus::AtRisk,
                1,
            ))
            .unwrap();

        let for_a = store.events(&a).unwrap();
        assert_eq!(for_a.len(), 2);
        assert!(for_a
            .iter()
            .all(|e| e.kind == TimelineEventKind::StatusTierChange));
        assert_eq!(for_a[0].metadata["to"], "in_progress");
        assert_eq!(for_a[1].metadata["to"], "at_risk");

        assert_eq!(store.events(&b).unwrap().len(), 1);
        assert!(store.events(&CaseId::new()).unwrap().is_empty());
    }

    #[test]
    fn concurrent_updates_serialize_without_lost_writes() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let case_id = CaseId::new();
        store.insert(make_context(case_id.clone())).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let case_id = case_id.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store
                        .update(&case_id, &mut |ctx| {
                            ctx.required_working_days += 1;
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let ctx = store.get(&case_id).unwrap().unwrap();
        assert_eq!(ctx.required_working_days, 6 + 800);
    }
}

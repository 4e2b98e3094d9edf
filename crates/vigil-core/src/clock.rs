//! # Clock — Injectable Time Source
//!
//! The compliance engine is a countdown machine: everything it computes is a
//! function of a fixed deadline and the current time. To keep that function
//! testable, "now" is always obtained through the [`Clock`] trait, injected
//! at construction. Domain code never calls `Utc::now()` directly.
//!
//! ## Calendar-day granularity
//!
//! Statutory deadlines are civil dates. [`Clock::today`] is the engine's
//! notion of the current calendar day, derived from the instant in UTC.
//! Deployments in jurisdictions where the local civil date diverges from the
//! UTC date around midnight can supply a `Clock` implementation applying the
//! local offset; the engine itself stays timezone-naive.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

/// An injectable source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, derived from [`Clock::now`].
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually-advanced clock for deterministic tests.
///
/// Interior-mutable: a service holding this clock behind `Arc<dyn Clock>`
/// observes every `set`/`advance` a test performs on its own handle.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    /// Create a clock pinned at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Replace the current instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    /// Advance the clock by the given duration. Negative durations move the
    /// clock backwards, which tests use to simulate stale readers.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.write();
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

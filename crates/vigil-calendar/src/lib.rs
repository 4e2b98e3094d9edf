//! # vigil-calendar — Statutory Working-Day Arithmetic
//!
//! Burial law counts in *working days*: calendar days that are neither
//! weekend days nor listed public holidays. This crate owns that calculus —
//! holiday calendars with explicit year coverage, day classification,
//! inclusive-range statistics, and deadline projection from a trigger date.
//!
//! ## Design
//!
//! - **Calendar-day granularity.** All arithmetic operates on
//!   `chrono::NaiveDate`. Sub-day precision is deliberately discarded so a
//!   deadline never flips by a few hours around midnight.
//! - **Coverage is explicit.** A [`HolidayCalendar`] declares which years it
//!   has data for. Asking about a date outside that span is a configuration
//!   error, never a silent "no holidays, all days working" answer — that
//!   would under-count risk on a statutory clock.
//! - **Weekend-first classification.** A public holiday that falls on a
//!   Saturday or Sunday is classified as weekend; the two buckets never
//!   double-count a date.

pub mod error;
pub mod holiday;
pub mod workdays;

pub use error::CalendarError;
pub use holiday::HolidayCalendar;
pub use workdays::{days_remaining, DayKind, WorkingDayCalculator, WorkingDaysCalculation};

//! # Calendar Errors
//!
//! Structured errors for holiday-calendar configuration and working-day
//! arithmetic. Configuration problems are fatal at load time: the engine
//! refuses to compute a statutory deadline from incomplete holiday data.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from calendar loading and working-day arithmetic.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// A queried date falls outside the calendar's covered years.
    #[error(
        "no holiday data for {date} (calendar \"{jurisdiction}\" covers {first}..={last}); \
         refusing to treat the year as holiday-free"
    )]
    UncoveredYear {
        /// The date that was queried.
        date: NaiveDate,
        /// Jurisdiction of the calendar that was asked.
        jurisdiction: String,
        /// First covered year.
        first: i32,
        /// Last covered year.
        last: i32,
    },

    /// An inclusive date range had its start after its end.
    #[error("inverted date range: start {start} is after end {end}")]
    InvertedRange {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// Deadline projection was asked for zero working days.
    #[error("required working days must be at least 1")]
    InvalidRequiredDays,

    /// A calendar definition failed validation.
    #[error("invalid calendar definition: {errors:?}")]
    InvalidDefinition {
        /// Every validation failure found, so operators can fix the file in
        /// one pass.
        errors: Vec<String>,
    },

    /// A calendar file could not be read.
    #[error("failed to read calendar file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A calendar file could not be parsed as YAML.
    #[error("failed to parse calendar file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

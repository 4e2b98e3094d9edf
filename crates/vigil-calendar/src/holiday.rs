//! # Holiday Calendar
//!
//! An immutable set of public holidays for one jurisdiction across an
//! explicit span of years. Lookups are exact-date and O(1); dates are never
//! shifted by time-of-day.
//!
//! ## Coverage
//!
//! The calendar knows which years it has data for. [`HolidayCalendar::ensure_covers`]
//! is the fail-fast guard the working-day calculator applies to every date
//! it visits: a year with no loaded holiday data must never be treated as
//! holiday-free.
//!
//! ## Sources
//!
//! Calendars are data, not code. They load from a YAML file
//! ([`HolidayCalendar::from_file`]), from inline YAML
//! ([`HolidayCalendar::from_yaml_str`]), or from entries built in code
//! ([`HolidayCalendar::from_entries`]). A compiled-in Dutch national set
//! ([`HolidayCalendar::netherlands`]) covers the default jurisdiction.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use vigil_core::JurisdictionId;

use crate::error::CalendarError;

// ---------------------------------------------------------------------------
// Compiled-in national calendar
// ---------------------------------------------------------------------------

/// Dutch national holidays, 2024 through 2027.
///
/// Koningsdag moves to 26 April when the 27th falls on a Sunday (2025).
/// Easter-derived dates (Goede Vrijdag, Paasdagen, Hemelvaart, Pinksteren)
/// are precomputed. Entries that fall on a weekend are still listed; the
/// day classifier buckets them as weekend.
const NL_HOLIDAYS: &[(i32, u32, u32, &str)] = &[
    (2024, 1, 1, "Nieuwjaarsdag"),
    (2024, 3, 29, "Goede Vrijdag"),
    (2024, 3, 31, "Eerste Paasdag"),
    (2024, 4, 1, "Tweede Paasdag"),
    (2024, 4, 27, "Koningsdag"),
    (2024, 5, 5, "Bevrijdingsdag"),
    (2024, 5, 9, "Hemelvaartsdag"),
    (2024, 5, 19, "Eerste Pinksterdag"),
    (2024, 5, 20, "Tweede Pinksterdag"),
    (2024, 12, 25, "Eerste Kerstdag"),
    (2024, 12, 26, "Tweede Kerstdag"),
    (2025, 1, 1, "Nieuwjaarsdag"),
    (2025, 4, 18, "Goede Vrijdag"),
    (2025, 4, 20, "Eerste Paasdag"),
    (2025, 4, 21, "Tweede Paasdag"),
    (2025, 4, 26, "Koningsdag"), // 27 April 2025 is a Sunday
    (2025, 5, 5, "Bevrijdingsdag"),
    (2025, 5, 29, "Hemelvaartsdag"),
    (2025, 6, 8, "Eerste Pinksterdag"),
    (2025, 6, 9, "Tweede Pinksterdag"),
    (2025, 12, 25, "Eerste Kerstdag"),
    (2025, 12, 26, "Tweede Kerstdag"),
    (2026, 1, 1, "Nieuwjaarsdag"),
    (2026, 4, 3, "Goede Vrijdag"),
    (2026, 4, 5, "Eerste Paasdag"),
    (2026, 4, 6, "Tweede Paasdag"),
    (2026, 4, 27, "Koningsdag"),
    (2026, 5, 5, "Bevrijdingsdag"),
    (2026, 5, 14, "Hemelvaartsdag"),
    (2026, 5, 24, "Eerste Pinksterdag"),
    (2026, 5, 25, "Tweede Pinksterdag"),
    (2026, 12, 25, "Eerste Kerstdag"),
    (2026, 12, 26, "Tweede Kerstdag"),
    (2027, 1, 1, "Nieuwjaarsdag"),
    (2027, 3, 26, "Goede Vrijdag"),
    (2027, 3, 28, "Eerste Paasdag"),
    (2027, 3, 29, "Tweede Paasdag"),
    (2027, 4, 27, "Koningsdag"),
    (2027, 5, 5, "Bevrijdingsdag"),
    (2027, 5, 6, "Hemelvaartsdag"),
    (2027, 5, 16, "Eerste Pinksterdag"),
    (2027, 5, 17, "Tweede Pinksterdag"),
    (2027, 12, 25, "Eerste Kerstdag"),
    (2027, 12, 26, "Tweede Kerstdag"),
];

// ---------------------------------------------------------------------------
// HolidayCalendar
// ---------------------------------------------------------------------------

/// Immutable public-holiday set for one jurisdiction and an explicit year
/// span.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    jurisdiction: JurisdictionId,
    years: RangeInclusive<i32>,
    holidays: HashMap<NaiveDate, String>,
}

impl HolidayCalendar {
    /// Build a calendar from named holiday entries.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDefinition`] listing every problem
    /// found: inverted year span, entries outside the span, duplicate dates,
    /// unnamed entries.
    pub fn from_entries(
        jurisdiction: JurisdictionId,
        years: RangeInclusive<i32>,
        entries: impl IntoIterator<Item = (NaiveDate, String)>,
    ) -> Result<Self, CalendarError> {
        let mut errors = Vec::new();
        if years.start() > years.end() {
            errors.push(format!(
                "year span {}..={} is inverted",
                years.start(),
                years.end()
            ));
        }

        let mut holidays: HashMap<NaiveDate, String> = HashMap::new();
        for (date, name) in entries {
            if name.trim().is_empty() {
                errors.push(format!("holiday on {date} has an empty name"));
            }
            if !years.contains(&date.year()) {
                errors.push(format!(
                    "holiday \"{name}\" on {date} falls outside the declared span {}..={}",
                    years.start(),
                    years.end()
                ));
            }
            if let Some(previous) = holidays.insert(date, name) {
                errors.push(format!("duplicate holiday entry for {date} (\"{previous}\")"));
            }
        }

        if !errors.is_empty() {
            return Err(CalendarError::InvalidDefinition { errors });
        }
        Ok(Self {
            jurisdiction,
            years,
            holidays,
        })
    }

    /// The compiled-in Dutch national calendar, 2024 through 2027.
    ///
    /// The Netherlands is the reference jurisdiction for the statutory
    /// six-working-day rule; deployments elsewhere load their own calendar
    /// file.
    pub fn netherlands() -> Self {
        let jurisdiction =
            JurisdictionId::new("NL").expect("static jurisdiction code is non-empty");
        let entries = NL_HOLIDAYS.iter().map(|&(y, m, d, name)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)
                .expect("compiled-in holiday table contains valid dates");
            (date, name.to_owned())
        });
        Self::from_entries(jurisdiction, 2024..=2027, entries)
            .expect("compiled-in holiday table is a valid calendar")
    }

    /// Load and validate a calendar from a YAML file.
    ///
    /// # Errors
    ///
    /// [`CalendarError::Io`] if the file cannot be read,
    /// [`CalendarError::Parse`] if it is not valid YAML, or
    /// [`CalendarError::InvalidDefinition`] if the contents fail validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CalendarError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CalendarError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw, &path.display().to_string())
    }

    /// Parse and validate a calendar from inline YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CalendarError> {
        Self::from_yaml(yaml, "<inline>")
    }

    fn from_yaml(yaml: &str, origin: &str) -> Result<Self, CalendarError> {
        let file: CalendarFile =
            serde_yaml::from_str(yaml).map_err(|source| CalendarError::Parse {
                path: origin.to_owned(),
                source,
            })?;
        let jurisdiction = JurisdictionId::new(file.jurisdiction).map_err(|_| {
            CalendarError::InvalidDefinition {
                errors: vec!["jurisdiction must be non-empty".to_owned()],
            }
        })?;
        Self::from_entries(
            jurisdiction,
            file.years.first..=file.years.last,
            file.holidays.into_iter().map(|h| (h.date, h.name)),
        )
    }

    /// Jurisdiction this calendar applies to.
    pub fn jurisdiction(&self) -> &JurisdictionId {
        &self.jurisdiction
    }

    /// The span of years the calendar has data for.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.years.clone()
    }

    /// Whether the calendar has data for the given year.
    pub fn covers(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Fail-fast guard: error unless the date's year is covered.
    ///
    /// # Errors
    ///
    /// [`CalendarError::UncoveredYear`] when the date falls outside the
    /// loaded span.
    pub fn ensure_covers(&self, date: NaiveDate) -> Result<(), CalendarError> {
        if self.covers(date.year()) {
            return Ok(());
        }
        Err(CalendarError::UncoveredYear {
            date,
            jurisdiction: self.jurisdiction.to_string(),
            first: *self.years.start(),
            last: *self.years.end(),
        })
    }

    /// Exact-date holiday lookup. O(1).
    ///
    /// Callers that have not established coverage should pair this with
    /// [`HolidayCalendar::ensure_covers`]; a bare `false` for an uncovered
    /// year is indistinguishable from "working day".
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// Name of the holiday on the given date, if any.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// All holidays, sorted by date.
    pub fn holidays(&self) -> Vec<(NaiveDate, &str)> {
        let mut entries: Vec<(NaiveDate, &str)> = self
            .holidays
            .iter()
            .map(|(date, name)| (*date, name.as_str()))
            .collect();
        entries.sort_by_key(|(date, _)| *date);
        entries
    }

    /// Number of loaded holiday entries.
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

// ---------------------------------------------------------------------------
// YAML file format
// ---------------------------------------------------------------------------

/// On-disk calendar format:
///
/// ```yaml
/// jurisdiction: NL
/// years:
///   first: 2024
///   last: 2027
/// holidays:
///   - date: 2024-01-01
///     name: Nieuwjaarsdag
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct CalendarFile {
    jurisdiction: String,
    years: YearSpan,
    holidays: Vec<HolidayEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct YearSpan {
    first: i32,
    last: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct HolidayEntry {
    date: NaiveDate,
    name: String,
}

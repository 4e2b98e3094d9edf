//! # Working-Day Calculator
//!
//! Pure arithmetic over calendar dates and a shared [`HolidayCalendar`]:
//! day classification, inclusive-range statistics, and statutory deadline
//! projection.
//!
//! ## Classification order
//!
//! Weekend first, holiday second. A public holiday on a Saturday is a
//! weekend day; the buckets of a [`WorkingDaysCalculation`] partition the
//! range, they never overlap.
//!
//! ## The statutory rule
//!
//! "Within N working days after registration" means the trigger date itself
//! is never consumed: the clock starts the day *after*. The projected
//! deadline is therefore always strictly after the trigger date.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::holiday::HolidayCalendar;

// ---------------------------------------------------------------------------
// Day classification
// ---------------------------------------------------------------------------

/// Classification of a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Counts toward the statutory allowance.
    Working,
    /// Saturday or Sunday.
    Weekend,
    /// Listed public holiday on a weekday.
    Holiday,
}

impl DayKind {
    /// Return the string representation of this day kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Weekend => "weekend",
            Self::Holiday => "holiday",
        }
    }
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkingDaysCalculation
// ---------------------------------------------------------------------------

/// Day-by-day breakdown of a closed date interval `[start, end]`.
///
/// Every date in the interval lands in exactly one bucket:
/// `total_days == working_days + weekend_days.len() + holiday_dates.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDaysCalculation {
    /// Interval start (inclusive).
    pub start: NaiveDate,
    /// Interval end (inclusive).
    pub end: NaiveDate,
    /// Total calendar days in the interval.
    pub total_days: u32,
    /// Days that count toward the statutory allowance.
    pub working_days: u32,
    /// Dates skipped as weekend, in order.
    pub weekend_days: Vec<NaiveDate>,
    /// Dates skipped as weekday holidays, in order.
    pub holiday_dates: Vec<NaiveDate>,
}

// ---------------------------------------------------------------------------
// WorkingDayCalculator
// ---------------------------------------------------------------------------

/// Date arithmetic bound to one holiday calendar.
///
/// The calendar is shared read-only; cloning the calculator is cheap and
/// concurrent use needs no locking.
#[derive(Debug, Clone)]
pub struct WorkingDayCalculator {
    calendar: Arc<HolidayCalendar>,
}

impl WorkingDayCalculator {
    /// Create a calculator over the given calendar.
    pub fn new(calendar: Arc<HolidayCalendar>) -> Self {
        Self { calendar }
    }

    /// The calendar this calculator consults.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Classify one calendar day. Weekend first, holiday second.
    ///
    /// # Errors
    ///
    /// [`CalendarError::UncoveredYear`] when the date falls outside the
    /// calendar's loaded span.
    pub fn classify_day(&self, date: NaiveDate) -> Result<DayKind, CalendarError> {
        self.calendar.ensure_covers(date)?;
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(DayKind::Weekend);
        }
        if self.calendar.is_holiday(date) {
            return Ok(DayKind::Holiday);
        }
        Ok(DayKind::Working)
    }

    /// Walk the inclusive interval `[start, end]` and bucket every day.
    ///
    /// # Errors
    ///
    /// [`CalendarError::InvertedRange`] if `start > end`;
    /// [`CalendarError::UncoveredYear`] if any visited date lacks holiday
    /// data.
    pub fn calculate_working_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WorkingDaysCalculation, CalendarError> {
        if start > end {
            return Err(CalendarError::InvertedRange { start, end });
        }

        let mut working_days = 0u32;
        let mut weekend_days = Vec::new();
        let mut holiday_dates = Vec::new();

        let mut day = start;
        while day <= end {
            match self.classify_day(day)? {
                DayKind::Working => working_days += 1,
                DayKind::Weekend => weekend_days.push(day),
                DayKind::Holiday => holiday_dates.push(day),
            }
            day = day
                .succ_opt()
                .expect("covered calendar years end well before chrono's maximum date");
        }

        let total_days = (end.signed_duration_since(start).num_days() + 1) as u32;
        Ok(WorkingDaysCalculation {
            start,
            end,
            total_days,
            working_days,
            weekend_days,
            holiday_dates,
        })
    }

    /// Project the statutory deadline: the date on which the
    /// `required_working_days`-th working day after `trigger_date` falls.
    ///
    /// The trigger date is never consumed, so the result is strictly after
    /// it.
    ///
    /// # Errors
    ///
    /// [`CalendarError::InvalidRequiredDays`] for a zero requirement;
    /// [`CalendarError::UncoveredYear`] when the projection runs past the
    /// calendar's loaded span.
    pub fn calculate_deadline(
        &self,
        trigger_date: NaiveDate,
        required_working_days: u32,
    ) -> Result<NaiveDate, CalendarError> {
        if required_working_days == 0 {
            return Err(CalendarError::InvalidRequiredDays);
        }

        let mut day = trigger_date;
        let mut counted = 0u32;
        while counted < required_working_days {
            day = day
                .succ_opt()
                .expect("covered calendar years end well before chrono's maximum date");
            if self.classify_day(day)? == DayKind::Working {
                counted += 1;
            }
        }
        Ok(day)
    }
}

/// Signed whole calendar days from `today` until `deadline`.
///
/// Calendar days, not working days: this is the human-urgency countdown.
/// Negative once the deadline has passed. Zero on the deadline date itself.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    deadline.signed_duration_since(today).num_days()
}

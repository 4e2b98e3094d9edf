//! # Deadline Subcommand
//!
//! Projects the statutory deadline for a trigger date over a working-day
//! calendar and prints the interval breakdown: which days were consumed,
//! which were skipped as weekend or holiday, and how many calendar days
//! remain as of today.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use vigil_calendar::{
    days_remaining, HolidayCalendar, WorkingDayCalculator, WorkingDaysCalculation,
};
use vigil_core::{Clock, SystemClock};

/// Arguments for the `vigil deadline` subcommand.
#[derive(Args, Debug)]
pub struct DeadlineArgs {
    /// Registration date that starts the statutory clock (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub trigger_date: NaiveDate,

    /// Working days allowed after the trigger date.
    #[arg(long, value_name = "N", default_value_t = 6)]
    pub required_days: u32,

    /// Holiday calendar file. Defaults to the compiled-in NL calendar.
    #[arg(long, value_name = "PATH")]
    pub calendar: Option<PathBuf>,
}

/// Projection output: the deadline plus the interval that produced it.
#[derive(Debug)]
struct DeadlineReport {
    deadline: NaiveDate,
    window: WorkingDaysCalculation,
    days_remaining: i64,
}

/// Execute the deadline subcommand.
///
/// Returns exit code 0 on success; calendar load and projection failures
/// propagate as errors and exit 1.
pub fn run_deadline(args: &DeadlineArgs) -> Result<u8> {
    let calendar = match &args.calendar {
        Some(path) => HolidayCalendar::from_file(path)
            .with_context(|| format!("failed to load calendar from {}", path.display()))?,
        None => HolidayCalendar::netherlands(),
    };

    tracing::info!(
        jurisdiction = %calendar.jurisdiction(),
        holidays = calendar.holiday_count(),
        "loaded holiday calendar"
    );

    let calculator = WorkingDayCalculator::new(Arc::new(calendar));
    let report = project(&calculator, args.trigger_date, args.required_days, SystemClock.today())?;
    print_report(&calculator, args, &report);
    Ok(0)
}

/// Project the deadline and audit the window that produced it.
fn project(
    calculator: &WorkingDayCalculator,
    trigger_date: NaiveDate,
    required_days: u32,
    today: NaiveDate,
) -> Result<DeadlineReport> {
    let deadline = calculator
        .calculate_deadline(trigger_date, required_days)
        .context("deadline projection failed")?;

    // The statutory clock starts the day after the trigger.
    let window_start = trigger_date
        .succ_opt()
        .context("trigger date is out of range")?;
    let window = calculator
        .calculate_working_days(window_start, deadline)
        .context("window breakdown failed")?;

    Ok(DeadlineReport {
        deadline,
        window,
        days_remaining: days_remaining(deadline, today),
    })
}

/// Print the projection in the fixed-column report format.
fn print_report(calculator: &WorkingDayCalculator, args: &DeadlineArgs, report: &DeadlineReport) {
    println!(
        "Trigger date:    {} ({})",
        args.trigger_date,
        args.trigger_date.format("%A")
    );
    println!("Required:        {} working days", args.required_days);
    println!(
        "Deadline:        {} ({})",
        report.deadline,
        report.deadline.format("%A")
    );
    println!();
    println!(
        "Window {} .. {}: {} calendar days — {} working, {} weekend, {} holiday",
        report.window.start,
        report.window.end,
        report.window.total_days,
        report.window.working_days,
        report.window.weekend_days.len(),
        report.window.holiday_dates.len()
    );

    for date in &report.window.holiday_dates {
        let name = calculator.calendar().holiday_name(*date).unwrap_or("holiday");
        println!("  skipped: {date}  {name}");
    }

    println!();
    println!("Days remaining:  {} calendar days", report.days_remaining);
}

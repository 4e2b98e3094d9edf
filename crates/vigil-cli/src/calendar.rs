//! # Calendar Subcommand
//!
//! Validates and inspects holiday calendar files. A calendar that fails to
//! load here will also refuse to load at server bootstrap, so `validate`
//! doubles as a pre-deployment check.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use vigil_calendar::HolidayCalendar;

/// Arguments for the `vigil calendar` subcommand.
#[derive(Args, Debug)]
pub struct CalendarArgs {
    #[command(subcommand)]
    pub command: CalendarCommand,
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    /// Parse and validate a calendar file.
    Validate {
        /// Calendar file to check.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the holidays a calendar file loads.
    Show {
        /// Calendar file to inspect.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only list holidays falling in this year.
        #[arg(long, value_name = "YEAR")]
        year: Option<i32>,
    },
}

/// Execute the calendar subcommand.
///
/// Returns exit code: 0 on success, 1 when the file fails validation or
/// the requested year has no coverage.
pub fn run_calendar(args: &CalendarArgs) -> Result<u8> {
    match &args.command {
        CalendarCommand::Validate { file } => validate_file(file),
        CalendarCommand::Show { file, year } => show_file(file, *year),
    }
}

/// Load a calendar file and report the outcome.
fn validate_file(file: &Path) -> Result<u8> {
    match HolidayCalendar::from_file(file) {
        Ok(calendar) => {
            println!(
                "OK: {} — jurisdiction {}, years {}..={}, {} holidays",
                file.display(),
                calendar.jurisdiction(),
                calendar.years().start(),
                calendar.years().end(),
                calendar.holiday_count()
            );
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {} — {e}", file.display());
            Ok(1)
        }
    }
}

/// Load a calendar file and list its holidays, optionally for one year.
fn show_file(file: &Path, year: Option<i32>) -> Result<u8> {
    let calendar = match HolidayCalendar::from_file(file) {
        Ok(calendar) => calendar,
        Err(e) => {
            println!("FAIL: {} — {e}", file.display());
            return Ok(1);
        }
    };

    if let Some(year) = year {
        if !calendar.covers(year) {
            println!(
                "WARN: year {year} outside coverage {}..={}",
                calendar.years().start(),
                calendar.years().end()
            );
            return Ok(1);
        }
    }

    println!(
        "Calendar {} — jurisdiction {}, years {}..={}",
        file.display(),
        calendar.jurisdiction(),
        calendar.years().start(),
        calendar.years().end()
    );

    let mut shown = 0usize;
    for (date, name) in calendar.holidays() {
        if let Some(year) = year {
            if chrono::Datelike::year(&date) != year {
                continue;
            }
        }
        println!("  {date}  {name}");
        shown += 1;
    }

    println!("{shown} holiday(s)");
    Ok(0)
}

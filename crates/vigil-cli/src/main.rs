//! # vigil CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vigil_cli::calendar::{run_calendar, CalendarArgs};
use vigil_cli::classify::{run_classify, ClassifyArgs};
use vigil_cli::deadline::{run_deadline, DeadlineArgs};

/// Vigil — statutory timeline compliance tooling.
///
/// Projects statutory deadlines over working-day calendars, validates and
/// inspects holiday calendar files, and classifies countdown values into
/// severity tiers. Offline counterpart to the vigil-api server.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Project the statutory deadline for a trigger date.
    Deadline(DeadlineArgs),

    /// Validate or inspect a holiday calendar file.
    Calendar(CalendarArgs),

    /// Map a days-remaining countdown onto a severity tier.
    Classify(ClassifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Deadline(args) => run_deadline(&args),
        Commands::Calendar(args) => run_calendar(&args),
        Commands::Classify(args) => run_classify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

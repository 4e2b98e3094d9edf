//! # Classify Subcommand
//!
//! Maps a days-remaining countdown onto a severity tier using the default
//! threshold bands. Useful for checking what the engine would decide for a
//! given countdown without registering a case.

use anyhow::Result;
use clap::Args;

use vigil_engine::{classify, StatusThresholds};

/// Arguments for the `vigil classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Calendar days remaining until the deadline. Negative once passed.
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub days_remaining: i64,
}

/// Execute the classify subcommand. Always exits 0; every countdown value
/// classifies to some tier.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    let thresholds = StatusThresholds::default();
    let status = classify(args.days_remaining, thresholds);

    println!("Days remaining:    {}", args.days_remaining);
    println!("Tier:              {status}");
    println!("Escalation level:  {}", status.escalation_level());
    println!(
        "Deadline breached: {}",
        if status.is_breached() { "yes" } else { "no" }
    );
    println!(
        "Cutoffs:           emergency <= {}, at_risk <= {}, in_progress <= {}",
        thresholds.emergency_at, thresholds.at_risk_within, thresholds.in_progress_within
    );

    Ok(0)
}

//! # vigil-cli — Offline Tooling for the Vigil Stack
//!
//! Provides the `vigil` command-line interface for working with statutory
//! deadlines without a running server: deadline projection, holiday
//! calendar validation and inspection, and countdown classification.
//!
//! ## Subcommands
//!
//! - `vigil deadline` — Project the statutory deadline for a trigger date.
//! - `vigil calendar validate` — Parse and validate a calendar file.
//! - `vigil calendar show` — List the holidays a calendar file loads.
//! - `vigil classify` — Map a days-remaining countdown onto a severity tier.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from command logic.
//! - Handler functions delegate to the domain crates; the date arithmetic
//!   and tier cutoffs live in `vigil-calendar` and `vigil-engine`, never
//!   here.
//! - Handlers return a process exit code: 0 success, 1 operational or
//!   validation failure. Usage errors exit 2 via clap.

pub mod calendar;
pub mod classify;
pub mod deadline;

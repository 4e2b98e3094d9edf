//! # Monitor Errors

use thiserror::Error;

/// Lifecycle failures of the monitoring loop.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// `start` was called while the loop is already live.
    #[error("monitor is already running")]
    AlreadyRunning,

    /// `stop` was called while no loop is live.
    #[error("monitor is not running")]
    NotRunning,
}

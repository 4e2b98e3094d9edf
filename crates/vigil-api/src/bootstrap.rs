//! # Server Bootstrap
//!
//! Wires the enforcement stack at startup.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load Calendar** — from `VIGIL_CALENDAR_PATH`, or the compiled-in
//!    Netherlands calendar when the variable is unset.
//! 2. **Read Policy** — statutory working-day allowance
//!    (`VIGIL_REQUIRED_WORKING_DAYS`) and sweep interval
//!    (`VIGIL_POLL_INTERVAL_SECS`).
//! 3. **Wire Collaborators** — in-memory store, tracing notifier, system
//!    clock, enforcement service, monitoring scheduler.
//! 4. **Log Startup Banner** — structured summary of the loaded policy.
//!
//! Environment validation is fatal: a server with a half-understood
//! statutory policy must not come up.

use std::sync::Arc;
use std::time::Duration;

use vigil_calendar::{CalendarError, HolidayCalendar, WorkingDayCalculator};
use vigil_core::SystemClock;
use vigil_engine::{EnforcementConfig, LogNotifier, MemoryStore, TimelineEnforcementService};
use vigil_monitor::{ComplianceMonitor, MonitorConfig};

use crate::state::{AppConfig, AppState};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during server bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Holiday calendar could not be loaded or validated.
    #[error("calendar bootstrap failed: {0}")]
    Calendar(#[from] CalendarError),

    /// An environment variable held an unparseable value.
    #[error("invalid {name}: {value:?} ({reason})")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Bootstrap the application state from the environment.
///
/// Loads the holiday calendar, reads the enforcement policy, and wires the
/// service and monitor over shared collaborators. Returns the AppState
/// ready for [`crate::app`].
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let calendar = load_calendar()?;
    let enforcement = enforcement_config_from_env()?;
    let monitor_config = monitor_config_from_env()?;

    log_startup_banner(&config, &calendar, &enforcement, &monitor_config);

    let calculator = WorkingDayCalculator::new(Arc::new(calendar));
    let service = Arc::new(TimelineEnforcementService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(LogNotifier),
        Arc::new(SystemClock),
        calculator,
        enforcement,
    ));
    let monitor = Arc::new(ComplianceMonitor::new(
        Arc::clone(&service),
        monitor_config,
    ));

    Ok(AppState::new(service, monitor, config))
}

// ---------------------------------------------------------------------------
// Phase 1: Load Calendar
// ---------------------------------------------------------------------------

fn load_calendar() -> Result<HolidayCalendar, BootstrapError> {
    match std::env::var("VIGIL_CALENDAR_PATH") {
        Ok(path) => {
            let calendar = HolidayCalendar::from_file(&path)?;
            tracing::info!(
                path = %path,
                jurisdiction = %calendar.jurisdiction(),
                "holiday calendar loaded from file"
            );
            Ok(calendar)
        }
        Err(_) => {
            tracing::info!("VIGIL_CALENDAR_PATH not set — using compiled-in NL calendar");
            Ok(HolidayCalendar::netherlands())
        }
    }
}

// ---------------------------------------------------------------------------
// Phase 2: Read Policy
// ---------------------------------------------------------------------------

fn enforcement_config_from_env() -> Result<EnforcementConfig, BootstrapError> {
    let mut config = EnforcementConfig::default();
    if let Ok(raw) = std::env::var("VIGIL_REQUIRED_WORKING_DAYS") {
        let days: u32 = raw.parse().map_err(|e| BootstrapError::InvalidEnv {
            name: "VIGIL_REQUIRED_WORKING_DAYS",
            value: raw.clone(),
            reason: format!("{e}"),
        })?;
        if days == 0 {
            return Err(BootstrapError::InvalidEnv {
                name: "VIGIL_REQUIRED_WORKING_DAYS",
                value: raw,
                reason: "must be at least 1".to_string(),
            });
        }
        config = config.with_required_working_days(days);
    }
    Ok(config)
}

fn monitor_config_from_env() -> Result<MonitorConfig, BootstrapError> {
    let mut config = MonitorConfig::default();
    if let Ok(raw) = std::env::var("VIGIL_POLL_INTERVAL_SECS") {
        let secs: u64 = raw.parse().map_err(|e| BootstrapError::InvalidEnv {
            name: "VIGIL_POLL_INTERVAL_SECS",
            value: raw.clone(),
            reason: format!("{e}"),
        })?;
        if secs == 0 {
            return Err(BootstrapError::InvalidEnv {
                name: "VIGIL_POLL_INTERVAL_SECS",
                value: raw,
                reason: "must be at least 1".to_string(),
            });
        }
        config = config.with_poll_interval(Duration::from_secs(secs));
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Phase 3: Startup Banner
// ---------------------------------------------------------------------------

fn log_startup_banner(
    config: &AppConfig,
    calendar: &HolidayCalendar,
    enforcement: &EnforcementConfig,
    monitor_config: &MonitorConfig,
) {
    tracing::info!(
        port = config.port,
        auth = if config.auth_token.is_some() {
            "bearer"
        } else {
            "disabled"
        },
        jurisdiction = %calendar.jurisdiction(),
        calendar_years = ?calendar.years(),
        holidays = calendar.holiday_count(),
        required_working_days = enforcement.required_working_days,
        poll_interval_secs = monitor_config.poll_interval.as_secs(),
        "vigil-api starting"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var driven paths are covered indirectly: mutating the process
    // environment would race other tests in this binary. The parse guards
    // are exercised through their building blocks instead.

    #[test]
    fn default_bootstrap_uses_nl_calendar() {
        let calendar = load_calendar().unwrap();
        assert_eq!(calendar.jurisdiction().as_str(), "NL");
    }

    #[test]
    fn invalid_env_error_names_the_variable() {
        let err = BootstrapError::InvalidEnv {
            name: "VIGIL_POLL_INTERVAL_SECS",
            value: "ninety".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("VIGIL_POLL_INTERVAL_SECS"));
        assert!(rendered.contains("ninety"));
    }
}

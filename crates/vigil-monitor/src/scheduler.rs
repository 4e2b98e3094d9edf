//! # Compliance Monitor — Interval Sweep Loop
//!
//! [`ComplianceMonitor`] owns the background task that re-evaluates every
//! open case on a fixed interval. The sweep logic itself lives in
//! [`ComplianceMonitor::run_tick`], which is public so operators can force
//! an out-of-cycle sweep and tests can drive the loop without a runtime
//! clock.
//!
//! ## Design
//!
//! The spawned task is a `tokio::select!` between the shutdown watch
//! channel and the interval ticker. The tick body runs inside the interval
//! branch, so a shutdown signal that arrives mid-sweep is observed only
//! after the sweep completes — a tick is never cut off halfway through a
//! case list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use vigil_core::CaseId;
use vigil_engine::{EnforcementError, TimelineEnforcementService};

use crate::error::MonitorError;

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Tunable policy for the monitoring loop.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Time between sweeps. The first sweep runs immediately on start.
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3600),
        }
    }
}

impl MonitorConfig {
    /// Override the sweep interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

// ---------------------------------------------------------------------------
// TickSummary
// ---------------------------------------------------------------------------

/// Outcome counters for one sweep over the open cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Cases that completed the full evaluate-and-dispatch cycle.
    pub evaluated: usize,
    /// Stakeholder notifications delivered across all cases.
    pub alerts_dispatched: usize,
    /// Emergency protocol activations initiated by this sweep.
    pub emergencies_triggered: usize,
    /// Cases whose evaluation or dispatch failed. The sweep continues past
    /// every failure.
    pub failures: usize,
}

/// Point-in-time report of the monitoring loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    /// Whether the background task is live.
    pub running: bool,
    /// Configured sweep interval, in seconds.
    pub poll_interval_secs: u64,
    /// Sweeps completed since construction, background and manual alike.
    pub ticks_completed: u64,
    /// Counters from the most recent sweep, if any has run.
    pub last_tick: Option<TickSummary>,
}

// ---------------------------------------------------------------------------
// ComplianceMonitor
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct RunningHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Sweep state shared between the public handle and the spawned task.
#[derive(Debug)]
struct SweepState {
    service: Arc<TimelineEnforcementService>,
    ticks: AtomicU64,
    last_tick: Mutex<Option<TickSummary>>,
}

/// Recurring sweep over every open case.
#[derive(Debug)]
pub struct ComplianceMonitor {
    state: Arc<SweepState>,
    config: MonitorConfig,
    running: Mutex<Option<RunningHandle>>,
}

impl ComplianceMonitor {
    /// Wire a monitor over the shared enforcement service.
    pub fn new(service: Arc<TimelineEnforcementService>, config: MonitorConfig) -> Self {
        Self {
            state: Arc::new(SweepState {
                service,
                ticks: AtomicU64::new(0),
                last_tick: Mutex::new(None),
            }),
            config,
            running: Mutex::new(None),
        }
    }

    /// Spawn the background sweep loop.
    ///
    /// The first sweep runs immediately; subsequent sweeps follow the
    /// configured interval. A sweep that overruns the interval delays the
    /// next tick rather than bursting to catch up.
    ///
    /// # Errors
    ///
    /// [`MonitorError::AlreadyRunning`] if the loop is live.
    pub fn start(&self) -> Result<(), MonitorError> {
        let mut slot = self.running.lock();
        if slot.is_some() {
            return Err(MonitorError::AlreadyRunning);
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let state = Arc::clone(&self.state);
        let poll_interval = self.config.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let summary = state.run_tick();
                        tracing::debug!(
                            evaluated = summary.evaluated,
                            alerts_dispatched = summary.alerts_dispatched,
                            emergencies_triggered = summary.emergencies_triggered,
                            failures = summary.failures,
                            "monitor sweep complete"
                        );
                    }
                }
            }
            tracing::info!("compliance monitor stopped");
        });

        *slot = Some(RunningHandle {
            shutdown_tx,
            handle,
        });
        tracing::info!(
            poll_interval_secs = poll_interval.as_secs(),
            "compliance monitor started"
        );
        Ok(())
    }

    /// Signal the loop to exit and wait for it to finish.
    ///
    /// An in-flight sweep completes before the task exits.
    ///
    /// # Errors
    ///
    /// [`MonitorError::NotRunning`] if no loop is live.
    pub async fn stop(&self) -> Result<(), MonitorError> {
        let running = self.running.lock().take().ok_or(MonitorError::NotRunning)?;
        let _ = running.shutdown_tx.send(true);
        if let Err(err) = running.handle.await {
            tracing::warn!(error = %err, "monitor task did not shut down cleanly");
        }
        Ok(())
    }

    /// Whether the background task is live.
    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Report the loop state and the most recent sweep's counters.
    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            running: self.is_running(),
            poll_interval_secs: self.config.poll_interval.as_secs(),
            ticks_completed: self.state.ticks.load(Ordering::Relaxed),
            last_tick: *self.state.last_tick.lock(),
        }
    }

    /// Sweep every open case once, outside the background cadence.
    pub fn run_tick(&self) -> TickSummary {
        self.state.run_tick()
    }
}

impl SweepState {
    /// Each case is re-evaluated, its alerts are dispatched, and a case
    /// observed in the emergency tier with the protocol not yet active has
    /// the protocol triggered. Per-case failures are logged and counted;
    /// they never abort the sweep.
    fn run_tick(&self) -> TickSummary {
        let mut summary = TickSummary::default();

        let case_ids = match self.service.open_case_ids() {
            Ok(ids) => ids,
            Err(err) => {
                tracing::error!(error = %err, "sweep could not enumerate open cases");
                summary.failures += 1;
                self.finish_tick(summary);
                return summary;
            }
        };

        for case_id in case_ids {
            match self.evaluate_case(&case_id) {
                Ok(outcome) => {
                    summary.evaluated += 1;
                    summary.alerts_dispatched += outcome.alerts_dispatched;
                    if outcome.emergency_triggered {
                        summary.emergencies_triggered += 1;
                    }
                }
                // Closed between enumeration and evaluation; not a failure.
                Err(EnforcementError::CaseClosed { .. }) => {}
                Err(err) => {
                    tracing::warn!(case_id = %case_id, error = %err, "case evaluation failed");
                    summary.failures += 1;
                }
            }
        }

        self.finish_tick(summary);
        summary
    }

    fn evaluate_case(&self, case_id: &CaseId) -> Result<CaseOutcome, EnforcementError> {
        let assessment = self.service.monitor_compliance(case_id)?;
        let alerts_dispatched = self.service.dispatch_alerts(&assessment)?;

        let mut emergency_triggered = false;
        if assessment.status().is_breached() && !assessment.context.emergency_protocol_active {
            self.service.trigger_emergency_response(case_id)?;
            emergency_triggered = true;
        }

        Ok(CaseOutcome {
            alerts_dispatched,
            emergency_triggered,
        })
    }

    fn finish_tick(&self, summary: TickSummary) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        *self.last_tick.lock() = Some(summary);
    }
}

struct CaseOutcome {
    alerts_dispatched: usize,
    emergency_triggered: bool,
}

//! # vigil-monitor — Background Compliance Monitoring
//!
//! The scheduler that keeps the statutory countdown honest between operator
//! requests. A tokio task wakes on a fixed interval, sweeps every open case
//! through the enforcement service, dispatches the resulting alerts, and
//! fires the emergency protocol for any case that breached since the last
//! sweep.
//!
//! ## Design
//!
//! One case's failure never aborts a sweep: evaluation errors are logged,
//! counted in the tick's [`TickSummary`], and the loop moves on. Shutdown
//! is graceful — the signal is observed between ticks, so an in-flight
//! sweep always completes before the task exits.

pub mod error;
pub mod scheduler;

pub use error::MonitorError;
pub use scheduler::{ComplianceMonitor, MonitorConfig, MonitorStatus, TickSummary};

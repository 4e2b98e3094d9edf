//! # API Route Modules
//!
//! Route modules for the Vigil operator API surface:
//!
//! - `cases` — case registration, assessment, manual checks, alerts, the
//!   audit timeline, and archival.
//! - `scheduler` — monitoring-loop status and start/stop control.

pub mod cases;
pub mod scheduler;

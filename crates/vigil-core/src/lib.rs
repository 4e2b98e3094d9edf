#![deny(missing_docs)]

//! # vigil-core — Foundational Types for the Vigil Compliance Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! `chrono`, `uuid`, and `parking_lot` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`JurisdictionId`] where a [`CaseId`]
//!    is expected.
//!
//! 2. **Time is injected, never ambient.** All date arithmetic and status
//!    classification flows through the [`Clock`] trait, so tests simulate
//!    the passage of time deterministically and production code never calls
//!    the wall clock directly from domain logic.
//!
//! 3. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod clock;
pub mod error;
pub mod identity;
pub mod jurisdiction;

// Re-export primary types at crate root for ergonomic imports.
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ValidationError;
pub use identity::CaseId;
pub use jurisdiction::JurisdictionId;

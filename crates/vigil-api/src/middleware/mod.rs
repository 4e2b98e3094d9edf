//! # HTTP Middleware
//!
//! Request metrics and trace-span configuration for the operator API.
//! Authentication lives in [`crate::auth`].

pub mod metrics;
pub mod tracing_layer;

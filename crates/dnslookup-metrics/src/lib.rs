//! # dnslookup Diagnostics
//!
//! Structured logging for the dnslookup client, with a runtime switch that
//! raises the resolver crates to `trace` level so every query, response and
//! record of a lookup is shown.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig, LogError, LogFormat, TraceToggle};

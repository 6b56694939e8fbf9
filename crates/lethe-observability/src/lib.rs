//! # lethe-observability
//!
//! Tracing subscriber setup, span macros shared by the other crates, and a
//! bounded query log with latency aggregates.

pub mod query_log;
pub mod tracing_setup;

pub use query_log::{LatencyStats, QueryLog, QueryLogEntry};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};

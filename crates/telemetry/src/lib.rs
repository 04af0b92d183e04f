//! Tracing setup and in-process job metrics.
//!
//! Both jobs run as short-lived invocations, so metrics are kept in memory
//! and logged as a snapshot when an invocation finishes.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;

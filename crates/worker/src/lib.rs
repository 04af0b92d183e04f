//! Table version cleanup jobs.
//!
//! - Planner (catalog tables → work queue)
//! - Cleanup (work items → version deletes + statistics)

pub mod cleanup;
pub mod config;
pub mod planner;

pub use cleanup::*;
pub use config::*;
pub use planner::*;

//! SQS work item producer and event decoding for table version cleanup.

pub mod config;
pub mod event;
pub mod producer;

pub use config::*;
pub use event::*;
pub use producer::*;

//! Core types, retention rule and settings for table version cleanup.

pub mod audit;
pub mod error;
pub mod retention;
pub mod settings;
pub mod work_item;

pub use audit::*;
pub use error::{Error, Result};
pub use retention::*;
pub use settings::Settings;
pub use work_item::*;

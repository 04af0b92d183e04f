//! Glue Data Catalog access for table version cleanup.

pub mod client;
pub mod config;
pub mod glue;
pub mod listing;
pub mod paging;

pub use client::*;
pub use config::*;
pub use glue::GlueCatalog;
pub use listing::*;
pub use paging::{paginate, Page};

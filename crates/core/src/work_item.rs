//! Cleanup work items exchanged between the planner and the cleanup worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message attribute carrying the planner's execution batch id.
pub const EXECUTION_BATCH_ID_ATTRIBUTE: &str = "ExecutionBatchId";

/// One table to clean, as carried in a queue message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(rename = "DatabaseName")]
    pub database_name: String,
    #[serde(rename = "TableName")]
    pub table_name: String,
}

impl WorkItem {
    pub fn new(database_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            table_name: table_name.into(),
        }
    }

    /// Serializes the item as a queue message body.
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a queue message body.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| Error::malformed_work_item(format!("{}: {}", e, body)))
    }
}

/// Milliseconds since the Unix epoch, used for execution and batch ids.
pub fn epoch_millis(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis()
}

//! Unified error types for table version cleanup.
//!
//! Errors fall into three buckets:
//! - configuration errors abort an invocation before any work is done
//! - per-version delete failures are not errors at all; they are reported
//!   back by the catalog and accumulated by the cleanup worker
//! - everything else aborts the invocation and is returned to the host

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the planner and cleanup jobs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing required setting: {0}")]
    MissingSetting(String),

    /// The retention threshold is below the enforced floor.
    #[error("number of versions to retain must be at least {minimum}, got {configured}")]
    RetentionBelowMinimum { configured: i64, minimum: i64 },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("malformed work item: {0}")]
    MalformedWorkItem(String),

    #[error("invalid table version id: {0}")]
    InvalidVersionId(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_setting(key: impl Into<String>) -> Self {
        Self::MissingSetting(key.into())
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub fn queue(msg: impl Into<String>) -> Self {
        Self::Queue(msg.into())
    }

    pub fn ledger(msg: impl Into<String>) -> Self {
        Self::Ledger(msg.into())
    }

    pub fn malformed_work_item(msg: impl Into<String>) -> Self {
        Self::MalformedWorkItem(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error was raised while validating configuration, before
    /// any external service was touched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingSetting(_) | Self::RetentionBelowMinimum { .. }
        )
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

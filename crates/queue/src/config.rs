//! Queue configuration.

use cleanup_core::{Result, Settings};
use serde::{Deserialize, Serialize};

/// SQS producer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue URL (FIFO queue)
    pub queue_url: String,
    /// Endpoint override, for local emulators
    pub endpoint_url: Option<String>,
}

impl QueueConfig {
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            endpoint_url: None,
        }
    }

    /// Reads `sqs_queue_url` (required) and `endpoint_url`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            queue_url: settings.required("sqs_queue_url")?,
            endpoint_url: settings.optional("endpoint_url")?,
        })
    }
}

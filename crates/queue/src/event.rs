//! Queue event delivered to the cleanup job.
//!
//! Mirrors the Lambda SQS event shape: `{"Records": [{"body": ..., "messageAttributes": {...}}]}`.
//! Only the fields the cleanup job reads are modelled.

use std::collections::HashMap;

use cleanup_core::{Result, WorkItem, EXECUTION_BATCH_ID_ATTRIBUTE};
use serde::{Deserialize, Serialize};

/// A batch of queue records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records")]
    pub records: Vec<QueueRecord>,
}

/// One queue message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRecord {
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub body: String,
    #[serde(rename = "messageAttributes", default)]
    pub message_attributes: HashMap<String, MessageAttribute>,
}

/// A message attribute as delivered to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttribute {
    #[serde(rename = "stringValue", default)]
    pub string_value: Option<String>,
    #[serde(rename = "dataType", default)]
    pub data_type: Option<String>,
}

impl QueueRecord {
    /// Builds a record the way the planner would have sent it.
    pub fn new(body: impl Into<String>, execution_batch_id: Option<&str>) -> Self {
        let mut message_attributes = HashMap::new();
        if let Some(id) = execution_batch_id {
            message_attributes.insert(
                EXECUTION_BATCH_ID_ATTRIBUTE.to_string(),
                MessageAttribute {
                    string_value: Some(id.to_string()),
                    data_type: Some("String".to_string()),
                },
            );
        }

        Self {
            message_id: None,
            body: body.into(),
            message_attributes,
        }
    }

    /// String value of the `ExecutionBatchId` attribute, matched ignoring case.
    pub fn execution_batch_id(&self) -> Option<&str> {
        self.message_attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(EXECUTION_BATCH_ID_ATTRIBUTE))
            .and_then(|(_, attribute)| attribute.string_value.as_deref())
    }

    /// Decodes the body as a work item.
    pub fn work_item(&self) -> Result<WorkItem> {
        WorkItem::from_body(&self.body)
    }
}

//! Work item producer.

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;
use cleanup_core::{Error, Result, WorkItem, EXECUTION_BATCH_ID_ATTRIBUTE};
use tracing::{debug, info};

use crate::config::QueueConfig;

/// A message ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub body: String,
    /// FIFO group; messages of one group are delivered in order.
    pub group_id: String,
    /// Value of the `ExecutionBatchId` string attribute.
    pub execution_batch_id: String,
}

impl OutgoingMessage {
    /// Builds the message for `item`, grouped by its database.
    pub fn for_work_item(item: &WorkItem, execution_batch_id: i64) -> Result<Self> {
        Ok(Self {
            body: item.to_body()?,
            group_id: item.database_name.clone(),
            execution_batch_id: execution_batch_id.to_string(),
        })
    }
}

/// Transport acknowledgement of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// HTTP status reported for the send.
    pub status: u16,
    pub message_id: Option<String>,
}

impl SendReceipt {
    pub fn accepted(message_id: Option<String>) -> Self {
        Self {
            status: 200,
            message_id,
        }
    }

    /// Only a 200 counts as delivered.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Queue the planner publishes work items to.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<SendReceipt>;
}

/// SQS producer.
#[derive(Clone)]
pub struct SqsProducer {
    client: Client,
    config: QueueConfig,
}

impl SqsProducer {
    /// Creates an SQS client from the shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: QueueConfig) -> Self {
        let mut builder = aws_sdk_sqs::config::Builder::from(sdk_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        info!(queue_url = %config.queue_url, "Created SQS producer");

        Self {
            client: Client::from_conf(builder.build()),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }
}

#[async_trait]
impl WorkQueue for SqsProducer {
    async fn send(&self, message: &OutgoingMessage) -> Result<SendReceipt> {
        let attribute = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(&message.execution_batch_id)
            .build()
            .map_err(|e| Error::queue(format!("invalid message attribute: {}", e)))?;

        let output = self
            .client
            .send_message()
            .queue_url(&self.config.queue_url)
            .message_body(&message.body)
            .message_group_id(&message.group_id)
            .message_attributes(EXECUTION_BATCH_ID_ATTRIBUTE, attribute)
            .send()
            .await
            .map_err(|e| Error::queue(format!("SendMessage failed: {}", DisplayErrorContext(&e))))?;

        debug!(
            group_id = %message.group_id,
            message_id = output.message_id().unwrap_or_default(),
            "Sent work item"
        );

        Ok(SendReceipt::accepted(output.message_id().map(str::to_string)))
    }
}

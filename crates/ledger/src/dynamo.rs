//! DynamoDB implementation of [`AuditLedger`].

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use cleanup_core::{Error, LedgerItem, LedgerValue, Result};
use tracing::{debug, info};

use crate::ledger::AuditLedger;

/// DynamoDB client wrapper.
#[derive(Clone)]
pub struct DynamoLedger {
    client: Client,
}

impl DynamoLedger {
    /// Creates a DynamoDB client from the shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint_url) = endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        info!(
            endpoint = endpoint_url.unwrap_or("default"),
            "Created DynamoDB ledger client"
        );

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

fn to_attribute(value: LedgerValue) -> AttributeValue {
    match value {
        LedgerValue::S(v) => AttributeValue::S(v),
        LedgerValue::N(v) => AttributeValue::N(v),
    }
}

#[async_trait]
impl AuditLedger for DynamoLedger {
    async fn put_item(&self, table_name: &str, item: LedgerItem) -> Result<()> {
        let attributes: HashMap<String, AttributeValue> = item
            .into_iter()
            .map(|(name, value)| (name, to_attribute(value)))
            .collect();

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| {
                Error::ledger(format!(
                    "PutItem failed for table {}: {}",
                    table_name,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(table = table_name, "Wrote audit item");
        Ok(())
    }
}

//! Audit ledger contract and the typed writer used by the jobs.

use std::sync::Arc;

use async_trait::async_trait;
use cleanup_core::{CleanupAuditRecord, LedgerItem, PlannerAuditRecord, Result};
use telemetry::metrics;
use tracing::debug;

use crate::config::LedgerConfig;

/// Key-value store receiving audit items.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    async fn put_item(&self, table_name: &str, item: LedgerItem) -> Result<()>;
}

/// Writes audit records to one ledger table.
#[derive(Clone)]
pub struct AuditTrail {
    ledger: Arc<dyn AuditLedger>,
    config: LedgerConfig,
}

impl AuditTrail {
    pub fn new(ledger: Arc<dyn AuditLedger>, config: LedgerConfig) -> Self {
        Self { ledger, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub async fn record_planner(&self, record: &PlannerAuditRecord) -> Result<()> {
        self.put(record.to_item(&self.config.keys)).await?;
        debug!(
            execution_batch_id = record.execution_batch_id,
            table = %record.table_key(),
            "Recorded enqueued work item"
        );
        Ok(())
    }

    pub async fn record_cleanup(&self, record: &CleanupAuditRecord) -> Result<()> {
        self.put(record.to_item(&self.config.keys)).await?;
        debug!(
            execution_id = record.execution_id,
            database = %record.database_name,
            table = %record.table_name,
            "Recorded cleanup statistics"
        );
        Ok(())
    }

    async fn put(&self, item: LedgerItem) -> Result<()> {
        self.ledger.put_item(&self.config.table_name, item).await?;
        metrics().audit_records_written.inc();
        Ok(())
    }
}

//! Planner job: fans catalog tables out to the cleanup queue.
//!
//! One work item is sent per table. An audit record is written only for the
//! items the queue accepted; a rejected send is logged and skipped so one bad
//! table never stops the rest of the run. Listing and ledger failures abort
//! the run.

use std::sync::Arc;

use audit_ledger::AuditTrail;
use chrono::{DateTime, Utc};
use cleanup_core::{epoch_millis, PlannerAuditRecord, Result, WorkItem};
use futures::TryStreamExt;
use glue_catalog::{local_databases, tables, TableCatalog};
use serde::{Deserialize, Serialize};
use sqs_queue::{OutgoingMessage, WorkQueue};
use telemetry::metrics;
use tracing::{debug, error, info, warn};

use crate::config::PlannerSettings;

/// Returned to the host after a successful planner run.
pub const PLANNER_SUCCESS: &str = "Planner execution succeeded";

/// Outcome of one planner run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerReport {
    pub execution_batch_id: i64,
    pub databases: usize,
    pub tables_found: usize,
    pub messages_sent: usize,
    pub send_failures: usize,
}

enum SendOutcome {
    Sent,
    Failed,
}

/// Enumerates tables and enqueues one cleanup work item per table.
pub struct Planner {
    catalog: Arc<dyn TableCatalog>,
    queue: Arc<dyn WorkQueue>,
    audit: AuditTrail,
    settings: PlannerSettings,
}

impl Planner {
    pub fn new(
        catalog: Arc<dyn TableCatalog>,
        queue: Arc<dyn WorkQueue>,
        audit: AuditTrail,
        settings: PlannerSettings,
    ) -> Self {
        Self {
            catalog,
            queue,
            audit,
            settings,
        }
    }

    /// Runs the planner with the current time as execution batch id.
    pub async fn run(&self) -> Result<PlannerReport> {
        self.run_at(Utc::now()).await
    }

    /// Runs the planner for a batch started at `started_at`.
    pub async fn run_at(&self, started_at: DateTime<Utc>) -> Result<PlannerReport> {
        let execution_batch_id = epoch_millis(started_at);
        info!(execution_batch_id, "Starting planner run");

        match self.plan(execution_batch_id).await {
            Ok(report) => {
                info!(
                    execution_batch_id,
                    databases = report.databases,
                    tables = report.tables_found,
                    sent = report.messages_sent,
                    failed = report.send_failures,
                    "Planner run complete"
                );
                Ok(report)
            }
            Err(e) => {
                error!(execution_batch_id, error = %e, "Planner run failed");
                Err(e)
            }
        }
    }

    async fn plan(&self, execution_batch_id: i64) -> Result<PlannerReport> {
        let databases = self.target_databases().await?;
        let mut report = PlannerReport {
            execution_batch_id,
            databases: databases.len(),
            ..Default::default()
        };

        for database in &databases {
            let mut table_names = tables(self.catalog.as_ref(), database);

            while let Some(table) = table_names.try_next().await? {
                report.tables_found += 1;
                metrics().tables_planned.inc();

                let item = WorkItem::new(database.as_str(), table);
                match self.enqueue(&item, execution_batch_id).await? {
                    SendOutcome::Sent => report.messages_sent += 1,
                    SendOutcome::Failed => report.send_failures += 1,
                }
            }
        }

        Ok(report)
    }

    async fn target_databases(&self) -> Result<Vec<String>> {
        match &self.settings.database_names {
            Some(names) => {
                debug!(count = names.len(), "Using configured database list");
                Ok(names.clone())
            }
            None => local_databases(self.catalog.as_ref()).await,
        }
    }

    async fn enqueue(&self, item: &WorkItem, execution_batch_id: i64) -> Result<SendOutcome> {
        let message = OutgoingMessage::for_work_item(item, execution_batch_id)?;

        match self.queue.send(&message).await {
            Ok(receipt) if receipt.is_success() => {
                let record = PlannerAuditRecord {
                    execution_batch_id,
                    database_name: item.database_name.clone(),
                    table_name: item.table_name.clone(),
                    message_sent_time: Utc::now(),
                };
                self.audit.record_planner(&record).await?;
                metrics().work_items_enqueued.inc();
                Ok(SendOutcome::Sent)
            }
            Ok(receipt) => {
                warn!(
                    database = %item.database_name,
                    table = %item.table_name,
                    status = receipt.status,
                    "Work item not accepted by queue"
                );
                metrics().enqueue_failures.inc();
                Ok(SendOutcome::Failed)
            }
            Err(e) => {
                warn!(
                    database = %item.database_name,
                    table = %item.table_name,
                    error = %e,
                    "Failed to send work item"
                );
                metrics().enqueue_failures.inc();
                Ok(SendOutcome::Failed)
            }
        }
    }
}

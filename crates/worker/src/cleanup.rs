//! Cleanup job: applies the retention policy to each queued table.
//!
//! Records are handled one at a time and delete batches are sent one at a
//! time. Versions the catalog refuses to delete are collected and reported;
//! any other failure aborts the whole invocation.

use std::sync::Arc;
use std::time::Instant;

use audit_ledger::AuditTrail;
use chrono::Utc;
use cleanup_core::{epoch_millis, CleanupAuditRecord, Result, RetentionPolicy, WorkItem};
use glue_catalog::{all_table_versions, TableCatalog, VersionDeleteError};
use serde::{Deserialize, Serialize};
use sqs_queue::{QueueEvent, QueueRecord};
use telemetry::metrics;
use tracing::{debug, error, info, warn};

use crate::config::CleanupSettings;

/// Returned to the host after a successful cleanup invocation.
pub const CLEANUP_SUCCESS: &str = "Cleanup execution succeeded";

/// Outcome of one cleanup invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub records: usize,
    pub tables_cleaned: usize,
    pub tables_skipped: usize,
    pub versions_deleted: usize,
    /// Every version the catalog reported as not deleted.
    pub not_deleted: Vec<VersionDeleteError>,
}

/// Applies the retention policy to the tables named in queue records.
pub struct CleanupWorker {
    catalog: Arc<dyn TableCatalog>,
    audit: AuditTrail,
    settings: CleanupSettings,
}

impl CleanupWorker {
    pub fn new(catalog: Arc<dyn TableCatalog>, audit: AuditTrail, settings: CleanupSettings) -> Self {
        Self {
            catalog,
            audit,
            settings,
        }
    }

    /// Processes every record of `event` in order.
    pub async fn handle(&self, event: &QueueEvent) -> Result<CleanupReport> {
        info!(records = event.records.len(), "Starting cleanup invocation");

        match self.process(event).await {
            Ok(report) => {
                if !report.not_deleted.is_empty() {
                    warn!(
                        count = report.not_deleted.len(),
                        "Some table versions could not be deleted"
                    );
                }
                info!(
                    records = report.records,
                    cleaned = report.tables_cleaned,
                    skipped = report.tables_skipped,
                    versions_deleted = report.versions_deleted,
                    "Cleanup invocation complete"
                );
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "Cleanup invocation failed");
                Err(e)
            }
        }
    }

    async fn process(&self, event: &QueueEvent) -> Result<CleanupReport> {
        // Validated before any record is touched.
        let policy = RetentionPolicy::new(self.settings.versions_to_retain)?;
        let mut report = CleanupReport::default();

        for record in &event.records {
            self.clean_record(&policy, record, &mut report).await?;
        }

        Ok(report)
    }

    async fn clean_record(
        &self,
        policy: &RetentionPolicy,
        record: &QueueRecord,
        report: &mut CleanupReport,
    ) -> Result<()> {
        let execution_id = epoch_millis(Utc::now());
        let execution_batch_id = record.execution_batch_id().unwrap_or_default().to_string();
        let item = record.work_item()?;

        report.records += 1;
        metrics().work_items_processed.inc();

        let versions =
            all_table_versions(self.catalog.as_ref(), &item.database_name, &item.table_name)
                .await?;

        if !policy.exceeds(versions.len()) {
            info!(
                database = %item.database_name,
                table = %item.table_name,
                versions = versions.len(),
                threshold = policy.versions_to_retain(),
                "Table within retention threshold, skipping"
            );
            report.tables_skipped += 1;
            metrics().tables_skipped.inc();
            return Ok(());
        }

        let partition = policy.partition(&versions)?;
        info!(
            database = %item.database_name,
            table = %item.table_name,
            versions = versions.len(),
            to_delete = partition.delete.len(),
            batches = partition.delete_batch_count(),
            "Cleaning table versions"
        );

        let mut not_deleted = Vec::new();
        for batch in partition.delete_batches() {
            not_deleted.extend(self.delete_batch(&item, batch).await?);
        }

        let versions_deleted = partition.delete.len().saturating_sub(not_deleted.len());
        metrics().versions_deleted.inc_by(versions_deleted as u64);
        metrics().versions_not_deleted.inc_by(not_deleted.len() as u64);

        let audit_record = CleanupAuditRecord {
            execution_id,
            execution_batch_id,
            database_name: item.database_name.clone(),
            table_name: item.table_name.clone(),
            versions_before_cleanup: versions.len(),
            versions_retained: policy.versions_to_retain(),
            versions_deleted,
        };
        self.audit.record_cleanup(&audit_record).await?;

        report.tables_cleaned += 1;
        report.versions_deleted += versions_deleted;
        report.not_deleted.extend(not_deleted);
        metrics().tables_cleaned.inc();

        Ok(())
    }

    async fn delete_batch(&self, item: &WorkItem, batch: &[i64]) -> Result<Vec<VersionDeleteError>> {
        let version_ids: Vec<String> = batch.iter().map(ToString::to_string).collect();
        let started = Instant::now();

        let errors = self
            .catalog
            .batch_delete_table_versions(&item.database_name, &item.table_name, version_ids)
            .await?;

        metrics()
            .delete_batch_latency_ms
            .observe(started.elapsed().as_millis() as u64);
        metrics().delete_batches.inc();

        debug!(
            database = %item.database_name,
            table = %item.table_name,
            requested = batch.len(),
            failed = errors.len(),
            "Deleted version batch"
        );

        Ok(errors)
    }
}

//! Audit records written to the planner and cleanup ledgers.
//!
//! Records are shaped into a flat attribute map so the ledger backend only
//! has to know about strings and numbers.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single ledger attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerValue {
    /// String attribute.
    S(String),
    /// Numeric attribute, kept in its decimal string form.
    N(String),
}

impl LedgerValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::S(value.into())
    }

    pub fn number(value: impl ToString) -> Self {
        Self::N(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::S(v) | Self::N(v) => v,
        }
    }
}

/// Attribute name to value, ordered for stable logging and tests.
pub type LedgerItem = BTreeMap<String, LedgerValue>;

/// Composite key attribute names of a ledger table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerKeys {
    pub hash_key: String,
    pub range_key: String,
}

impl LedgerKeys {
    pub fn new(hash_key: impl Into<String>, range_key: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
            range_key: range_key.into(),
        }
    }
}

/// Written by the planner for every work item the queue accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerAuditRecord {
    pub execution_batch_id: i64,
    pub database_name: String,
    pub table_name: String,
    pub message_sent_time: DateTime<Utc>,
}

impl PlannerAuditRecord {
    /// Range key value: `<database>|<table>`.
    pub fn table_key(&self) -> String {
        format!("{}|{}", self.database_name, self.table_name)
    }

    pub fn to_item(&self, keys: &LedgerKeys) -> LedgerItem {
        let mut item = LedgerItem::new();
        item.insert(
            keys.hash_key.clone(),
            LedgerValue::number(self.execution_batch_id),
        );
        item.insert(keys.range_key.clone(), LedgerValue::string(self.table_key()));
        item.insert(
            "database_name".to_string(),
            LedgerValue::string(&self.database_name),
        );
        item.insert("table_name".to_string(), LedgerValue::string(&self.table_name));
        item.insert(
            "message_sent_time".to_string(),
            LedgerValue::string(
                self.message_sent_time
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        );
        item
    }
}

/// Written by the cleanup worker for every table it cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupAuditRecord {
    pub execution_id: i64,
    /// Batch id from the message attribute; empty if the message had none.
    pub execution_batch_id: String,
    pub database_name: String,
    pub table_name: String,
    pub versions_before_cleanup: usize,
    /// The configured threshold, not the size of the retained set.
    pub versions_retained: usize,
    pub versions_deleted: usize,
}

impl CleanupAuditRecord {
    pub fn to_item(&self, keys: &LedgerKeys) -> LedgerItem {
        let mut item = LedgerItem::new();
        item.insert(keys.hash_key.clone(), LedgerValue::number(self.execution_id));

        // Planner batch ids are epoch millis; anything else is kept verbatim.
        let batch_id = match self.execution_batch_id.trim().parse::<i64>() {
            Ok(id) => LedgerValue::number(id),
            Err(_) => LedgerValue::string(&self.execution_batch_id),
        };
        item.insert(keys.range_key.clone(), batch_id);

        item.insert(
            "database_name".to_string(),
            LedgerValue::string(&self.database_name),
        );
        item.insert("table_name".to_string(), LedgerValue::string(&self.table_name));
        item.insert(
            "number_of_versions_before_cleanup".to_string(),
            LedgerValue::number(self.versions_before_cleanup),
        );
        item.insert(
            "number_of_versions_retained".to_string(),
            LedgerValue::number(self.versions_retained),
        );
        item.insert(
            "number_of_versions_deleted".to_string(),
            LedgerValue::number(self.versions_deleted),
        );
        item
    }
}

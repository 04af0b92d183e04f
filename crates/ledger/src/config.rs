//! Ledger configuration.

use cleanup_core::{LedgerKeys, Result, Settings};
use serde::{Deserialize, Serialize};

/// Default names for the planner ledger table.
pub const PLANNER_LEDGER_DEFAULTS: LedgerDefaults = LedgerDefaults {
    table_name: "glue_table_version_cleanup_planner",
    hash_key: "execution_batch_id",
    range_key: "database_name_table_name",
};

/// Default names for the cleanup statistics ledger table.
pub const CLEANUP_LEDGER_DEFAULTS: LedgerDefaults = LedgerDefaults {
    table_name: "glue_table_version_cleanup_statistics",
    hash_key: "execution_id",
    range_key: "execution_batch_id",
};

/// Fallback names used when a ledger setting is present but empty.
#[derive(Debug, Clone, Copy)]
pub struct LedgerDefaults {
    pub table_name: &'static str,
    pub hash_key: &'static str,
    pub range_key: &'static str,
}

/// Audit ledger table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// DynamoDB table name
    pub table_name: String,
    /// Composite key attribute names
    pub keys: LedgerKeys,
    /// Endpoint override, for local emulators
    pub endpoint_url: Option<String>,
}

impl LedgerConfig {
    /// Reads `ddb_table_name`, `hash_key` and `range_key` (all required,
    /// empty falls back to `defaults`) and the optional `endpoint_url`.
    pub fn from_settings(settings: &Settings, defaults: LedgerDefaults) -> Result<Self> {
        Ok(Self {
            table_name: settings.required_or("ddb_table_name", defaults.table_name)?,
            keys: LedgerKeys::new(
                settings.required_or("hash_key", defaults.hash_key)?,
                settings.required_or("range_key", defaults.range_key)?,
            ),
            endpoint_url: settings.optional("endpoint_url")?,
        })
    }
}

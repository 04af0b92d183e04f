//! Catalog access contract.
//!
//! The catalog is consumed page by page; see [`crate::listing`] for the
//! item streams built on top of these calls.

use async_trait::async_trait;
use cleanup_core::Result;
use serde::{Deserialize, Serialize};

use crate::paging::Page;

/// A catalog database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    /// Set when the database is a resource link to another account's catalog.
    pub target_catalog_id: Option<String>,
}

impl Database {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_catalog_id: None,
        }
    }

    pub fn linked(name: impl Into<String>, catalog_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_catalog_id: Some(catalog_id.into()),
        }
    }

    pub fn is_resource_link(&self) -> bool {
        self.target_catalog_id.is_some()
    }
}

/// A version the catalog refused to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDeleteError {
    pub database_name: String,
    pub table_name: String,
    pub version_id: String,
    pub error_code: Option<String>,
    pub message: Option<String>,
}

/// Page-level access to a table catalog.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// One page of databases.
    async fn get_databases_page(&self, next_token: Option<String>) -> Result<Page<Database>>;

    /// One page of table names in `database`.
    async fn get_tables_page(
        &self,
        database: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    /// One page of version ids of `database.table`.
    async fn get_table_versions_page(
        &self,
        database: &str,
        table: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    /// Deletes up to [`cleanup_core::MAX_DELETE_BATCH_SIZE`] versions.
    ///
    /// Returns the versions that could not be deleted; an empty list means
    /// every id in the batch was removed.
    async fn batch_delete_table_versions(
        &self,
        database: &str,
        table: &str,
        version_ids: Vec<String>,
    ) -> Result<Vec<VersionDeleteError>>;
}

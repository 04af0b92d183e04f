//! AWS Glue Data Catalog implementation of [`TableCatalog`].

use async_trait::async_trait;
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::Client;
use cleanup_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::client::{Database, TableCatalog, VersionDeleteError};
use crate::config::CatalogConfig;
use crate::paging::Page;

/// Glue client wrapper.
#[derive(Clone)]
pub struct GlueCatalog {
    client: Client,
    config: CatalogConfig,
}

impl GlueCatalog {
    /// Creates a Glue client from the shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: CatalogConfig) -> Self {
        let mut builder = aws_sdk_glue::config::Builder::from(sdk_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        info!(
            catalog_id = config.catalog_id.as_deref().unwrap_or("default"),
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "Created Glue catalog client"
        );

        Self {
            client: Client::from_conf(builder.build()),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[async_trait]
impl TableCatalog for GlueCatalog {
    async fn get_databases_page(&self, next_token: Option<String>) -> Result<Page<Database>> {
        let output = self
            .client
            .get_databases()
            .set_catalog_id(self.config.catalog_id.clone())
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                Error::catalog(format!("GetDatabases failed: {}", DisplayErrorContext(&e)))
            })?;

        let databases = output
            .database_list()
            .iter()
            .map(|db| Database {
                name: db.name().to_string(),
                target_catalog_id: db
                    .target_database()
                    .map(|target| target.catalog_id().unwrap_or_default().to_string()),
            })
            .collect();

        Ok(Page::new(databases, output.next_token().map(str::to_string)))
    }

    async fn get_tables_page(
        &self,
        database: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let output = self
            .client
            .get_tables()
            .set_catalog_id(self.config.catalog_id.clone())
            .database_name(database)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                Error::catalog(format!(
                    "GetTables failed for database {}: {}",
                    database,
                    DisplayErrorContext(&e)
                ))
            })?;

        let tables = output
            .table_list()
            .iter()
            .map(|table| table.name().to_string())
            .collect();

        Ok(Page::new(tables, output.next_token().map(str::to_string)))
    }

    async fn get_table_versions_page(
        &self,
        database: &str,
        table: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let output = self
            .client
            .get_table_versions()
            .set_catalog_id(self.config.catalog_id.clone())
            .database_name(database)
            .table_name(table)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                Error::catalog(format!(
                    "GetTableVersions failed for {}.{}: {}",
                    database,
                    table,
                    DisplayErrorContext(&e)
                ))
            })?;

        let versions = output
            .table_versions()
            .iter()
            .map(|version| {
                version.version_id().map(str::to_string).ok_or_else(|| {
                    Error::catalog(format!("version without id in {}.{}", database, table))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(versions, output.next_token().map(str::to_string)))
    }

    async fn batch_delete_table_versions(
        &self,
        database: &str,
        table: &str,
        version_ids: Vec<String>,
    ) -> Result<Vec<VersionDeleteError>> {
        let requested = version_ids.len();
        let output = self
            .client
            .batch_delete_table_version()
            .set_catalog_id(self.config.catalog_id.clone())
            .database_name(database)
            .table_name(table)
            .set_version_ids(Some(version_ids))
            .send()
            .await
            .map_err(|e| {
                Error::catalog(format!(
                    "BatchDeleteTableVersion failed for {}.{}: {}",
                    database,
                    table,
                    DisplayErrorContext(&e)
                ))
            })?;

        let errors: Vec<VersionDeleteError> = output
            .errors()
            .iter()
            .map(|err| {
                let detail = err.error_detail();
                VersionDeleteError {
                    database_name: database.to_string(),
                    table_name: err.table_name().unwrap_or(table).to_string(),
                    version_id: err.version_id().unwrap_or_default().to_string(),
                    error_code: detail.and_then(|d| d.error_code()).map(str::to_string),
                    message: detail.and_then(|d| d.error_message()).map(str::to_string),
                }
            })
            .collect();

        if errors.is_empty() {
            debug!(database, table, requested, "Deleted table versions");
        } else {
            warn!(
                database,
                table,
                requested,
                failed = errors.len(),
                "Some table versions were not deleted"
            );
        }

        Ok(errors)
    }
}

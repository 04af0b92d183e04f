//! Item streams over the paged catalog calls.

use cleanup_core::Result;
use futures::stream::{BoxStream, TryStreamExt};
use tracing::{debug, info};

use crate::client::{Database, TableCatalog};
use crate::paging::paginate;

/// Every database in the catalog, including resource links.
pub fn databases(catalog: &dyn TableCatalog) -> BoxStream<'_, Result<Database>> {
    paginate(move |token| catalog.get_databases_page(token))
}

/// Every table name in `database`.
pub fn tables<'a>(
    catalog: &'a dyn TableCatalog,
    database: &'a str,
) -> BoxStream<'a, Result<String>> {
    paginate(move |token| catalog.get_tables_page(database, token))
}

/// Every version id of `database.table`.
pub fn table_versions<'a>(
    catalog: &'a dyn TableCatalog,
    database: &'a str,
    table: &'a str,
) -> BoxStream<'a, Result<String>> {
    paginate(move |token| catalog.get_table_versions_page(database, table, token))
}

/// Names of the databases owned by this catalog.
///
/// Resource-linked databases belong to another account and are dropped.
pub async fn local_databases(catalog: &dyn TableCatalog) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut stream = databases(catalog);

    while let Some(database) = stream.try_next().await? {
        if let Some(owner) = &database.target_catalog_id {
            info!(
                database = %database.name,
                target_catalog_id = %owner,
                "Skipping resource-linked database"
            );
            continue;
        }
        names.push(database.name);
    }

    debug!(count = names.len(), "Listed local databases");
    Ok(names)
}

/// Materializes every version id of `database.table`.
pub async fn all_table_versions(
    catalog: &dyn TableCatalog,
    database: &str,
    table: &str,
) -> Result<Vec<String>> {
    table_versions(catalog, database, table).try_collect().await
}

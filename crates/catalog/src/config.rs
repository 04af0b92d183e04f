//! Catalog configuration.

use cleanup_core::{Result, Settings};
use serde::{Deserialize, Serialize};

/// Glue Data Catalog client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog id (account id); the caller's account when unset
    pub catalog_id: Option<String>,
    /// Endpoint override, for local emulators
    pub endpoint_url: Option<String>,
}

impl CatalogConfig {
    /// Reads `catalog_id` and `endpoint_url`, both optional.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            catalog_id: settings.optional("catalog_id")?,
            endpoint_url: settings.optional("endpoint_url")?,
        })
    }
}

//! Job settings.

use cleanup_core::{Result, Settings, DEFAULT_VERSIONS_TO_RETAIN};
use serde::{Deserialize, Serialize};

/// Separator used when `separator` is absent or empty.
pub const DEFAULT_DATABASE_SEPARATOR: &str = "$";

/// Cleanup job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupSettings {
    /// Unvalidated; the floor is checked when the job runs.
    pub versions_to_retain: i64,
}

impl CleanupSettings {
    pub fn new(versions_to_retain: i64) -> Self {
        Self { versions_to_retain }
    }

    /// Reads `number_of_versions_to_retain`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.required_i64_or(
            "number_of_versions_to_retain",
            DEFAULT_VERSIONS_TO_RETAIN,
        )?))
    }
}

/// Planner job settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Explicit databases to plan; `None` means every local database.
    pub database_names: Option<Vec<String>>,
}

impl PlannerSettings {
    pub fn all_databases() -> Self {
        Self {
            database_names: None,
        }
    }

    pub fn databases<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            database_names: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Reads `database_names_string_literal` and `separator`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let separator = settings.optional_or("separator", DEFAULT_DATABASE_SEPARATOR)?;
        let database_names = settings
            .optional("database_names_string_literal")?
            .map(|literal| split_database_names(&literal, &separator))
            .filter(|names| !names.is_empty());

        Ok(Self { database_names })
    }
}

/// Splits a database list literal, trimming names and dropping empty ones.
pub fn split_database_names(literal: &str, separator: &str) -> Vec<String> {
    literal
        .split(separator)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

//! Retention policy for catalog table versions.
//!
//! Version ids are unique, monotonically increasing integers per table, so
//! "newest" is simply "highest id". The policy keeps the N highest ids and
//! marks every other version for deletion.

use crate::error::{Error, Result};

/// Lowest accepted number of versions to retain.
pub const MIN_VERSIONS_TO_RETAIN: i64 = 50;

/// Used when `number_of_versions_to_retain` is set but empty.
pub const DEFAULT_VERSIONS_TO_RETAIN: i64 = 100;

/// The catalog rejects batch deletes of more than 100 versions.
pub const MAX_DELETE_BATCH_SIZE: usize = 100;

/// Validated retention threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    versions_to_retain: usize,
}

impl RetentionPolicy {
    /// Creates a policy, rejecting thresholds below [`MIN_VERSIONS_TO_RETAIN`].
    pub fn new(versions_to_retain: i64) -> Result<Self> {
        if versions_to_retain < MIN_VERSIONS_TO_RETAIN {
            return Err(Error::RetentionBelowMinimum {
                configured: versions_to_retain,
                minimum: MIN_VERSIONS_TO_RETAIN,
            });
        }

        let versions_to_retain = usize::try_from(versions_to_retain)
            .map_err(|_| Error::config(format!("threshold {} is too large", versions_to_retain)))?;

        Ok(Self { versions_to_retain })
    }

    pub fn versions_to_retain(&self) -> usize {
        self.versions_to_retain
    }

    /// Whether a table with `version_count` versions needs cleaning.
    pub fn exceeds(&self, version_count: usize) -> bool {
        version_count > self.versions_to_retain
    }

    /// Splits version ids into the retained (newest) and deleted (older) sets.
    ///
    /// Both sets are ordered newest first. Any id that is not an integer
    /// fails the whole partition.
    pub fn partition<S: AsRef<str>>(&self, version_ids: &[S]) -> Result<VersionPartition> {
        let mut ids = version_ids
            .iter()
            .map(|id| parse_version_id(id.as_ref()))
            .collect::<Result<Vec<i64>>>()?;

        ids.sort_unstable_by(|a, b| b.cmp(a));

        let split_at = self.versions_to_retain.min(ids.len());
        let delete = ids.split_off(split_at);

        Ok(VersionPartition { retain: ids, delete })
    }
}

/// Result of applying a [`RetentionPolicy`] to a table's versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPartition {
    /// Newest versions, kept.
    pub retain: Vec<i64>,
    /// Older versions, to be deleted.
    pub delete: Vec<i64>,
}

impl VersionPartition {
    /// Delete set in chunks the catalog accepts in a single call.
    pub fn delete_batches(&self) -> std::slice::Chunks<'_, i64> {
        self.delete.chunks(MAX_DELETE_BATCH_SIZE)
    }

    /// Number of batch-delete calls needed for the delete set.
    pub fn delete_batch_count(&self) -> usize {
        self.delete.len().div_ceil(MAX_DELETE_BATCH_SIZE)
    }
}

fn parse_version_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidVersionId(raw.to_string()))
}

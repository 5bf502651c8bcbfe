use crate::harvest::Record;
use crate::storage::traits::{StorageError, StorageResult};
use crate::storage::{list_cache_path, temp_path};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Per-region snapshot of the listing API response
///
/// A present cache file is authoritative for its region; it is never
/// refreshed or compared against the live listing.
#[derive(Debug, Clone)]
pub struct ListCache {
    directory: PathBuf,
}

impl ListCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Loads the cached records for a region, `None` if nothing is cached
    pub async fn load(&self, region_id: u32) -> StorageResult<Option<Vec<Record>>> {
        let path = list_cache_path(&self.directory, region_id);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(path, e)),
        };

        let records = serde_json::from_str(&content)
            .map_err(|source| StorageError::CorruptCache { path, source })?;

        Ok(Some(records))
    }

    /// Persists the raw listing response, pretty-printed
    ///
    /// The file is written under a temporary name and renamed into place, so
    /// an interrupted write never leaves a truncated cache behind.
    pub async fn store(&self, region_id: u32, listing: &Value) -> StorageResult<()> {
        let path = list_cache_path(&self.directory, region_id);
        let tmp = temp_path(&path);

        let json = serde_json::to_string_pretty(listing)?;

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        tracing::debug!("Cached listing at {}", path.display());
        Ok(())
    }
}

use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use crate::storage::{checkpoint_path, temp_path};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Checkpoints stored as zero-byte `region<R>.complete` marker files
#[derive(Debug, Clone)]
pub struct FileCheckpoints {
    directory: PathBuf,
}

impl FileCheckpoints {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpoints {
    async fn is_complete(&self, region_id: u32) -> StorageResult<bool> {
        let path = checkpoint_path(&self.directory, region_id);
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn mark_complete(&self, region_id: u32) -> StorageResult<()> {
        let path = checkpoint_path(&self.directory, region_id);
        let tmp = temp_path(&path);

        // The rename is what makes the marker visible
        tokio::fs::write(&tmp, b"")
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        tracing::debug!("Wrote checkpoint {}", path.display());
        Ok(())
    }
}

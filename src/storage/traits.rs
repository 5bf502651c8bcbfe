//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and the
//! error type shared by all on-disk state.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt list cache {path}: {source}")]
    CorruptCache {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable per-region completion flag
///
/// Once `mark_complete` has returned `Ok`, `is_complete` must report `true`
/// for that region in every later process. Implementations must never expose
/// a completed flag that was only partly written.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Returns true if the region was fully harvested by an earlier run
    async fn is_complete(&self, region_id: u32) -> StorageResult<bool>;

    /// Records that the region's output is complete
    async fn mark_complete(&self, region_id: u32) -> StorageResult<()>;
}

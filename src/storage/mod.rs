//! Storage module for resumable harvest state
//!
//! Everything a later run needs to pick up where an earlier one stopped lives
//! as plain files in the output directory:
//! - `region<R>.list.json` - cached listing response
//! - `region<R>.complete` - checkpoint marker
//!
//! The CSV files themselves are handled by the `output` module, but their
//! names are defined here alongside the other per-region files.

mod checkpoint;
mod list_cache;
mod traits;

pub use checkpoint::FileCheckpoints;
pub use list_cache::ListCache;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use std::path::{Path, PathBuf};

/// Path of a region's cached listing
pub fn list_cache_path(directory: &Path, region_id: u32) -> PathBuf {
    directory.join(format!("region{}.list.json", region_id))
}

/// Path of a region's CSV output
pub fn csv_path(directory: &Path, region_id: u32) -> PathBuf {
    directory.join(format!("churches-region{}.csv", region_id))
}

/// Path of a region's completion marker
pub fn checkpoint_path(directory: &Path, region_id: u32) -> PathBuf {
    directory.join(format!("region{}.complete", region_id))
}

/// Sibling path used while a file is being written
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

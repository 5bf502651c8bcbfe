//! Harvest module for fetching pages and scraping contacts
//!
//! This module contains the core harvesting logic, including:
//! - Email extraction from page text
//! - HTTP fetching with a bounded retry policy
//! - Listing retrieval backed by the list cache
//! - The per-region pipeline and the region runner

mod extractor;
mod fetcher;
mod list_loader;
mod pipeline;
mod record;
mod retry;
mod runner;

pub use extractor::{extract_emails, strip_inline_images};
pub use fetcher::{build_http_client, build_listing_client, Fetcher};
pub use list_loader::ListLoader;
pub use pipeline::{RegionOutcome, RegionPipeline};
pub use record::{Record, RecordId};
pub use retry::with_retry;
pub use runner::{RunSummary, Runner};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Create the output directory if needed
/// 2. Build the HTTP client and the region pipeline
/// 3. Process every selected region in ascending id order, skipping
///    regions that an earlier run completed
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every region was completed or skipped
/// * `Err(HarvestError)` - A region failed; later regions were not attempted
pub async fn harvest(config: Config) -> Result<RunSummary, HarvestError> {
    tokio::fs::create_dir_all(&config.output.directory).await?;

    let runner = Runner::from_config(&config)?;
    tracing::info!(
        "Harvesting {} regions into {}",
        runner.regions().len(),
        config.output.directory.display()
    );

    runner.run().await
}

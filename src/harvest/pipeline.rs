//! Per-region harvest pipeline
//!
//! One run of the pipeline takes a region from `NotStarted` to a terminal
//! state:
//! 1. Skip the region if its checkpoint exists
//! 2. Load the record list (cache or listing API)
//! 3. Open the region's CSV fresh
//! 4. Split the records into chunks and process the chunks concurrently:
//!    fetch each detail page, extract its emails, stream one row
//! 5. Close the CSV, then write the checkpoint
//!
//! A record whose page cannot be fetched is skipped. A listing or CSV failure
//! aborts the region before the checkpoint is written.

use crate::config::Config;
use crate::harvest::{
    build_http_client, build_listing_client, extract_emails, Fetcher, ListLoader, Record,
};
use crate::output::{ContactRow, CsvOutput};
use crate::regions::Region;
use crate::state::RegionState;
use crate::storage::{csv_path, CheckpointStore, FileCheckpoints, ListCache};
use crate::url::DirectoryUrls;
use crate::{HarvestError, Result};
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Mutex;

/// Result of running the pipeline for one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOutcome {
    /// The checkpoint already existed; nothing was done
    Skipped,

    /// The CSV was written and the checkpoint committed
    Completed {
        /// Records in the region's list
        records: usize,
        /// Rows written to the CSV
        rows_written: usize,
        /// Records skipped because their page could not be fetched
        records_failed: usize,
    },
}

/// Processes exactly one region end to end
pub struct RegionPipeline<C = FileCheckpoints> {
    urls: DirectoryUrls,
    fetcher: Fetcher,
    loader: ListLoader,
    checkpoints: C,
    output_dir: PathBuf,
    concurrency: usize,
}

impl RegionPipeline<FileCheckpoints> {
    /// Builds a pipeline writing to the configured output directory
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.harvest)?;
        let urls = DirectoryUrls::new(&config.harvest.base_url)?;
        let output_dir = config.output.directory.clone();

        let loader = ListLoader::new(
            build_listing_client(&config.harvest)?,
            urls.clone(),
            ListCache::new(output_dir.clone()),
        );
        let fetcher = Fetcher::new(client, config.harvest.max_attempts);

        Ok(Self::new(
            urls,
            fetcher,
            loader,
            FileCheckpoints::new(output_dir.clone()),
            output_dir,
            config.harvest.concurrency,
        ))
    }
}

impl<C: CheckpointStore> RegionPipeline<C> {
    pub fn new(
        urls: DirectoryUrls,
        fetcher: Fetcher,
        loader: ListLoader,
        checkpoints: C,
        output_dir: PathBuf,
        concurrency: usize,
    ) -> Self {
        Self {
            urls,
            fetcher,
            loader,
            checkpoints,
            output_dir,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs the pipeline for one region
    ///
    /// # Returns
    ///
    /// * `Ok(RegionOutcome::Skipped)` - The region was finished by an earlier run
    /// * `Ok(RegionOutcome::Completed { .. })` - CSV written and checkpoint committed
    /// * `Err(HarvestError)` - Listing, CSV or checkpoint failure; no checkpoint written
    pub async fn run(&self, region: Region) -> Result<RegionOutcome> {
        let mut state = RegionState::NotStarted;

        if self.checkpoints.is_complete(region.id).await? {
            advance(region, &mut state, RegionState::Skipped)?;
            tracing::info!("region {} already completed", region);
            return Ok(RegionOutcome::Skipped);
        }

        tracing::info!("starting region {}", region);

        let records = self.loader.load_list(region.id).await?;
        advance(region, &mut state, RegionState::ListLoaded)?;

        let path = csv_path(&self.output_dir, region.id);
        if path.exists() {
            tracing::warn!(
                "overwriting {} left by an earlier incomplete run",
                path.display()
            );
        }
        tracing::info!("writing to {}", path.display());
        let output = Mutex::new(CsvOutput::create(&path)?);
        advance(region, &mut state, RegionState::Processing)?;

        let size = chunk_size(records.len(), self.concurrency);
        let chunks = records
            .chunks(size)
            .map(|chunk| self.process_chunk(region, chunk, &output));
        let records_failed: usize = try_join_all(chunks).await?.into_iter().sum();

        let output = output
            .into_inner()
            .map_err(|_| HarvestError::Output("CSV writer lock poisoned".to_string()))?;
        let rows_written = output.finish_blocking().await?;

        self.checkpoints.mark_complete(region.id).await?;
        advance(region, &mut state, RegionState::Complete)?;

        tracing::info!(
            "region {} complete: {} records, {} rows written, {} failed",
            region,
            records.len(),
            rows_written,
            records_failed
        );

        Ok(RegionOutcome::Completed {
            records: records.len(),
            rows_written,
            records_failed,
        })
    }

    /// Processes one chunk sequentially, returning how many records failed
    async fn process_chunk(
        &self,
        region: Region,
        chunk: &[Record],
        output: &Mutex<CsvOutput>,
    ) -> Result<usize> {
        let mut failed = 0;

        for record in chunk {
            let url = self.urls.detail_url(record);

            let body = match self.fetcher.fetch(url.as_str()).await {
                Some(body) => body,
                None => {
                    tracing::error!(
                        "error while fetching html for record {} ({})",
                        record.id,
                        record.title
                    );
                    failed += 1;
                    continue;
                }
            };

            let emails = extract_emails(&body);
            tracing::info!("{} {:?}", record.title, emails);

            let row = ContactRow {
                region: region.name.to_string(),
                title: record.title.clone(),
                url: url.to_string(),
                emails,
            };

            output
                .lock()
                .map_err(|_| HarvestError::Output("CSV writer lock poisoned".to_string()))?
                .write_row(&row)?;
        }

        Ok(failed)
    }
}

/// Moves `state` to `next`, rejecting transitions the lifecycle forbids
fn advance(region: Region, state: &mut RegionState, next: RegionState) -> Result<()> {
    if !state.can_transition_to(next) {
        return Err(HarvestError::InvalidTransition {
            from: *state,
            to: next,
        });
    }

    tracing::debug!("region {}: {} -> {}", region.id, state, next);
    *state = next;
    Ok(())
}

/// Size of each contiguous chunk so that at most `concurrency` chunks exist
fn chunk_size(len: usize, concurrency: usize) -> usize {
    let concurrency = concurrency.max(1);
    ((len + concurrency - 1) / concurrency).max(1)
}

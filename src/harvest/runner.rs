use crate::config::Config;
use crate::harvest::{RegionOutcome, RegionPipeline};
use crate::regions::{select_regions, Region};
use crate::storage::{CheckpointStore, FileCheckpoints};
use crate::Result;
use std::time::Instant;

/// Totals for one invocation of the runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub regions_completed: usize,
    pub regions_skipped: usize,
    pub rows_written: usize,
    pub records_failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: RegionOutcome) {
        match outcome {
            RegionOutcome::Skipped => self.regions_skipped += 1,
            RegionOutcome::Completed {
                rows_written,
                records_failed,
                ..
            } => {
                self.regions_completed += 1;
                self.rows_written += rows_written;
                self.records_failed += records_failed;
            }
        }
    }
}

/// Drives the region pipeline over every selected region, one at a time
pub struct Runner<C = FileCheckpoints> {
    pipeline: RegionPipeline<C>,
    regions: Vec<Region>,
}

impl Runner<FileCheckpoints> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let pipeline = RegionPipeline::from_config(config)?;
        let regions = select_regions(config.harvest.regions.as_deref());
        Ok(Self::new(pipeline, regions))
    }
}

impl<C: CheckpointStore> Runner<C> {
    /// Creates a runner; regions are processed in ascending id order
    pub fn new(pipeline: RegionPipeline<C>, mut regions: Vec<Region>) -> Self {
        regions.sort_by_key(|region| region.id);
        regions.dedup_by_key(|region| region.id);
        Self { pipeline, regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Runs every region in order
    ///
    /// The first region error stops the run and is returned; regions after it
    /// are left for the next invocation, which skips the completed ones.
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        for region in &self.regions {
            match self.pipeline.run(*region).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    tracing::error!("region {} failed: {}", region, e);
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Harvest finished in {:?}: {} regions completed, {} skipped, {} rows written, {} records failed",
            start_time.elapsed(),
            summary.regions_completed,
            summary.regions_skipped,
            summary.rows_written,
            summary.records_failed
        );

        Ok(summary)
    }
}

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::app::ports::RankedOutputPort;
use crate::domain::{Profile, RawListing};
use crate::pipeline::pipeline::{RunSummary, SearchPipeline};
use crate::pipeline::processing::score::ScoredListing;

/// Use case for running the search pipeline over a batch of raw
/// listings and delivering the ranked results to an output port.
pub struct SearchUseCase {
    pipeline: SearchPipeline,
    output_port: Arc<dyn RankedOutputPort>,
}

impl SearchUseCase {
    pub fn new(pipeline: SearchPipeline, output_port: Arc<dyn RankedOutputPort>) -> Self {
        Self {
            pipeline,
            output_port,
        }
    }

    /// Process one batch. Records the pipeline's ranked output through
    /// the output port; a write failure for one record does not abort
    /// delivery of the rest.
    pub async fn run_search(
        &self,
        raw: Vec<RawListing>,
        profile: &Profile,
    ) -> Result<(Vec<ScoredListing>, RunSummary)> {
        info!(records = raw.len(), "starting scholarship search");

        let outcome = self.pipeline.run(raw, profile)?;

        let mut write_failures = 0usize;
        for record in &outcome.records {
            if let Err(e) = self.output_port.write_ranked_listing(record).await {
                write_failures += 1;
                error!("Failed to write ranked listing: {}", e);
            }
        }
        if write_failures > 0 {
            warn!(
                write_failures,
                delivered = outcome.records.len() - write_failures,
                "some ranked listings were not delivered"
            );
        }

        info!(
            ranked = outcome.summary.ranked,
            duplicates_merged = outcome.summary.duplicates_merged,
            "scholarship search complete"
        );

        Ok((outcome.records, outcome.summary))
    }
}

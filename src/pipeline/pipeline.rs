use std::sync::Arc;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::domain::{Listing, Profile, RawListing};
use crate::error::{PipelineError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::classify::{ClassifiedListing, FamilyClassifier};
use crate::pipeline::processing::deadline::{Clock, SystemClock};
use crate::pipeline::processing::rank::rank;
use crate::pipeline::processing::resolve::GroupResolver;
use crate::pipeline::processing::score::{MatchScorer, ScoredListing};
use crate::pipeline::processing::standardize::Standardizer;
use crate::pipeline::processing::validate::NoiseFilter;

/// Per-stage record counts from one pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub input: usize,
    pub validated: usize,
    pub rejected: usize,
    pub family_matched: usize,
    pub canonical: usize,
    pub duplicates_merged: usize,
    pub ranked: usize,
}

/// The ranked records of a run together with its stage counts.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub records: Vec<ScoredListing>,
    pub summary: RunSummary,
}

/// The full normalization, deduplication, and ranking pipeline.
///
/// Stages run strictly forward and each produces new values; nothing is
/// mutated once handed to a later stage. The only order-sensitive points
/// are the classifier's first-match rule and the documented tie-breaks
/// in group resolution and ranking, so callers wanting reproducible
/// tie-breaks must feed records in a deterministic order.
pub struct SearchPipeline {
    filter: NoiseFilter,
    classifier: FamilyClassifier,
    resolver: GroupResolver,
    standardizer: Standardizer,
    scorer: MatchScorer,
    clock: Arc<dyn Clock>,
}

impl SearchPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a pipeline with an explicit time source, used by tests and
    /// by callers replaying historical batches.
    pub fn with_clock(config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            filter: NoiseFilter::new(config.validation.clone()),
            classifier: FamilyClassifier::new(),
            resolver: GroupResolver::new(),
            standardizer: Standardizer::new(config.deadline.clone()),
            scorer: MatchScorer::new(),
            clock,
        }
    }

    /// Run all stages over one batch of raw listings.
    ///
    /// Individual malformed records are dropped or standardized to safe
    /// defaults; the only error is an invalid profile, which is a caller
    /// bug and is surfaced rather than swallowed.
    pub fn run(&self, raw: Vec<RawListing>, profile: &Profile) -> Result<RunOutcome> {
        let errors = profile.validate();
        if !errors.is_empty() {
            return Err(PipelineError::InvalidProfile(errors.join("; ")));
        }

        metrics::pipeline::run_started();
        let started = std::time::Instant::now();

        let mut summary = RunSummary {
            input: raw.len(),
            ..Default::default()
        };

        // Stage 1: validity/noise filter
        let mut validated: Vec<Listing> = Vec::with_capacity(raw.len());
        for record in raw {
            match self.filter.check(&record) {
                Some(reason) => {
                    summary.rejected += 1;
                    metrics::validate::record_rejected();
                    debug!(
                        title = record.title.as_deref().unwrap_or(""),
                        %reason,
                        "rejected listing"
                    );
                }
                None => {
                    metrics::validate::record_accepted();
                    validated.push(Listing::from(record));
                }
            }
        }
        summary.validated = validated.len();

        // Stages 2-3: family classification and sub-key derivation
        let classified: Vec<ClassifiedListing> = validated
            .into_iter()
            .map(|listing| {
                let classified = self.classifier.classify(listing);
                if classified.family.is_some() {
                    summary.family_matched += 1;
                    metrics::classify::family_matched();
                } else {
                    metrics::classify::unclassified();
                }
                classified
            })
            .collect();

        // Stages 4-5: group resolution and canonical selection
        let (canonical, resolution) = self.resolver.resolve(classified);
        summary.canonical = canonical.len();
        summary.duplicates_merged = resolution.duplicates_merged;
        metrics::resolve::family_groups(resolution.family_groups);
        metrics::resolve::signature_groups(resolution.signature_groups);
        metrics::resolve::duplicates_merged(resolution.duplicates_merged);

        // Stage 6: standardization
        let standardized: Vec<_> = canonical
            .into_iter()
            .map(|record| {
                if !record.alternate_urls.is_empty() {
                    metrics::resolve::alternate_urls(record.alternate_urls.len());
                }
                let (standardized, year_injected) =
                    self.standardizer.standardize(record, self.clock.as_ref());
                metrics::standardize::record_processed();
                if year_injected {
                    metrics::standardize::deadline_year_injected();
                }
                standardized
            })
            .collect();

        // Stage 7: scoring and ranking
        let scored: Vec<ScoredListing> = standardized
            .iter()
            .map(|record| {
                let scored = self.scorer.score(record, profile);
                metrics::score::record_scored();
                metrics::score::match_score(scored.match_score);
                scored
            })
            .collect();
        let ranked = rank(scored);
        summary.ranked = ranked.len();

        metrics::pipeline::records_ranked(ranked.len());
        metrics::pipeline::run_duration(started.elapsed().as_secs_f64());
        metrics::pipeline::run_completed();

        info!(
            input = summary.input,
            validated = summary.validated,
            rejected = summary.rejected,
            family_matched = summary.family_matched,
            canonical = summary.canonical,
            duplicates_merged = summary.duplicates_merged,
            ranked = summary.ranked,
            "pipeline run complete"
        );

        Ok(RunOutcome {
            records: ranked,
            summary,
        })
    }
}

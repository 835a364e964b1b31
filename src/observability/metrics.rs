//! Metrics catalog for the scholarship pipeline.
//!
//! Provides a straightforward API for recording metrics using standard
//! Prometheus naming conventions.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::fmt;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Enum representing all metric names used in the system.
/// This eliminates magic strings and provides compile-time safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Validity filter metrics
    ValidateRecordsAccepted,
    ValidateRecordsRejected,

    // Classifier metrics
    ClassifyFamilyMatched,
    ClassifyUnclassified,

    // Group resolver metrics
    ResolveFamilyGroups,
    ResolveSignatureGroups,
    ResolveDuplicatesMerged,
    ResolveAlternateUrls,

    // Standardizer metrics
    StandardizeRecordsProcessed,
    StandardizeDeadlineYearInjected,

    // Scoring metrics
    ScoreRecordsScored,
    ScoreMatchScore,

    // Pipeline metrics
    PipelineRunsStarted,
    PipelineRunsCompleted,
    PipelineRunDuration,
    PipelineRecordsRanked,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ValidateRecordsAccepted => "scholar_validate_records_accepted_total",
            MetricName::ValidateRecordsRejected => "scholar_validate_records_rejected_total",

            MetricName::ClassifyFamilyMatched => "scholar_classify_family_matched_total",
            MetricName::ClassifyUnclassified => "scholar_classify_unclassified_total",

            MetricName::ResolveFamilyGroups => "scholar_resolve_family_groups_total",
            MetricName::ResolveSignatureGroups => "scholar_resolve_signature_groups_total",
            MetricName::ResolveDuplicatesMerged => "scholar_resolve_duplicates_merged_total",
            MetricName::ResolveAlternateUrls => "scholar_resolve_alternate_urls_total",

            MetricName::StandardizeRecordsProcessed => {
                "scholar_standardize_records_processed_total"
            }
            MetricName::StandardizeDeadlineYearInjected => {
                "scholar_standardize_deadline_year_injected_total"
            }

            MetricName::ScoreRecordsScored => "scholar_score_records_scored_total",
            MetricName::ScoreMatchScore => "scholar_score_match_score",

            MetricName::PipelineRunsStarted => "scholar_pipeline_runs_started_total",
            MetricName::PipelineRunsCompleted => "scholar_pipeline_runs_completed_total",
            MetricName::PipelineRunDuration => "scholar_pipeline_run_duration_seconds",
            MetricName::PipelineRecordsRanked => "scholar_pipeline_records_ranked_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus recorder. Safe to call once per process;
/// subsequent calls return an error from the exporter.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROMETHEUS_HANDLE.set(handle);
    Ok(())
}

/// Render the current metrics in Prometheus exposition format, if the
/// recorder has been installed.
pub fn render() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

pub mod validate {
    use super::MetricName;

    /// Record that a raw listing passed the validity filter
    pub fn record_accepted() {
        ::metrics::counter!(MetricName::ValidateRecordsAccepted.as_str()).increment(1);
    }

    /// Record that a raw listing was rejected as noise
    pub fn record_rejected() {
        ::metrics::counter!(MetricName::ValidateRecordsRejected.as_str()).increment(1);
    }
}

pub mod classify {
    use super::MetricName;

    /// Record that a listing matched a known scholarship family
    pub fn family_matched() {
        ::metrics::counter!(MetricName::ClassifyFamilyMatched.as_str()).increment(1);
    }

    /// Record that a listing matched no family and was deferred to the
    /// title-similarity fallback
    pub fn unclassified() {
        ::metrics::counter!(MetricName::ClassifyUnclassified.as_str()).increment(1);
    }
}

pub mod resolve {
    use super::MetricName;

    /// Record the number of (family, sub_key) groups formed
    pub fn family_groups(count: usize) {
        ::metrics::counter!(MetricName::ResolveFamilyGroups.as_str()).increment(count as u64);
    }

    /// Record the number of title-signature groups formed
    pub fn signature_groups(count: usize) {
        ::metrics::counter!(MetricName::ResolveSignatureGroups.as_str()).increment(count as u64);
    }

    /// Record that duplicate listings were merged away
    pub fn duplicates_merged(count: usize) {
        ::metrics::counter!(MetricName::ResolveDuplicatesMerged.as_str()).increment(count as u64);
    }

    /// Record that alternate URLs were attached to a canonical listing
    pub fn alternate_urls(count: usize) {
        ::metrics::counter!(MetricName::ResolveAlternateUrls.as_str()).increment(count as u64);
    }
}

pub mod standardize {
    use super::MetricName;

    /// Record that a canonical listing was standardized
    pub fn record_processed() {
        ::metrics::counter!(MetricName::StandardizeRecordsProcessed.as_str()).increment(1);
    }

    /// Record that a deadline had a year inferred and injected
    pub fn deadline_year_injected() {
        ::metrics::counter!(MetricName::StandardizeDeadlineYearInjected.as_str()).increment(1);
    }
}

pub mod score {
    use super::MetricName;

    /// Record that a listing was scored against the profile
    pub fn record_scored() {
        ::metrics::counter!(MetricName::ScoreRecordsScored.as_str()).increment(1);
    }

    /// Record the computed match score
    pub fn match_score(value: f64) {
        ::metrics::histogram!(MetricName::ScoreMatchScore.as_str()).record(value);
    }
}

pub mod pipeline {
    use super::MetricName;

    /// Record that a pipeline run started
    pub fn run_started() {
        ::metrics::counter!(MetricName::PipelineRunsStarted.as_str()).increment(1);
    }

    /// Record that a pipeline run completed
    pub fn run_completed() {
        ::metrics::counter!(MetricName::PipelineRunsCompleted.as_str()).increment(1);
    }

    /// Record total wall time of a pipeline run
    pub fn run_duration(seconds: f64) {
        ::metrics::histogram!(MetricName::PipelineRunDuration.as_str()).record(seconds);
    }

    /// Record the number of ranked records produced
    pub fn records_ranked(count: usize) {
        ::metrics::counter!(MetricName::PipelineRecordsRanked.as_str()).increment(count as u64);
    }
}

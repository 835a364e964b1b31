use std::cmp::Ordering;

use crate::pipeline::processing::score::ScoredListing;

/// Stable sort by descending match score. Equal scores keep the order
/// the standardizer produced, which itself preserves group-resolution
/// order, so ties are reproducible for a deterministic input.
pub fn rank(mut records: Vec<ScoredListing>) -> Vec<ScoredListing> {
    records.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    records
}

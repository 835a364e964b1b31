use async_trait::async_trait;

use crate::pipeline::processing::score::ScoredListing;

/// Output port for ranked results. Implementations decide where ranked
/// records go (file, stdout, in-memory for tests); the pipeline does not
/// care.
#[async_trait]
pub trait RankedOutputPort: Send + Sync {
    async fn write_ranked_listing(&self, record: &ScoredListing) -> anyhow::Result<()>;
}

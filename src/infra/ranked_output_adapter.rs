use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::app::ports::RankedOutputPort;
use crate::pipeline::processing::score::ScoredListing;

/// File-based implementation of RankedOutputPort.
/// Writes ranked listings as NDJSON, one record per line, best match
/// first.
pub struct FileRankedOutputAdapter {
    file: Mutex<std::io::BufWriter<std::fs::File>>,
}

impl FileRankedOutputAdapter {
    pub fn new(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let target = Path::new(path);
        if let Some(dir) = target.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        info!("Writing ranked listings to {}", target.display());

        let file = std::io::BufWriter::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(target)?,
        );

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

#[async_trait::async_trait]
impl RankedOutputPort for FileRankedOutputAdapter {
    async fn write_ranked_listing(&self, record: &ScoredListing) -> anyhow::Result<()> {
        let line = serde_json::to_string(record)? + "\n";
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("ranked output file lock poisoned"))?;
        file.write_all(line.as_bytes())
            .map_err(|e| anyhow::anyhow!("write ranked listing failed: {}", e))?;
        file.flush()
            .map_err(|e| anyhow::anyhow!("flush ranked listing failed: {}", e))?;
        Ok(())
    }
}

/// Stdout implementation of RankedOutputPort, used when no output file
/// is requested.
pub struct StdoutRankedOutputAdapter;

#[async_trait::async_trait]
impl RankedOutputPort for StdoutRankedOutputAdapter {
    async fn write_ranked_listing(&self, record: &ScoredListing) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string(record)?);
        Ok(())
    }
}

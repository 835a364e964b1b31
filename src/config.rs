use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::error::{PipelineError, Result};

/// Pipeline configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub deadline: DeadlineConfig,
    pub validation: ValidationConfig,
}

/// Settings for deadline year inference.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeadlineConfig {
    /// Years strictly before this cutoff are rewritten to it; it is also
    /// the year injected into year-less deadlines.
    pub cutoff_year: i32,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self { cutoff_year: 2025 }
    }
}

/// Settings for the validity/noise filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum title length for a listing to be considered usable.
    pub min_title_chars: usize,
    /// Titles shorter than this with a single word are treated as
    /// navigation fragments.
    pub short_fragment_chars: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_title_chars: 5,
            short_fragment_chars: 15,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        let config: PipelineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is
    /// absent or unreadable.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default pipeline config: {}", e);
                Self::default()
            }
        }
    }
}

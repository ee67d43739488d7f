//! Top-level configuration, loadable from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssayError, Result};
use crate::input::ParserConfig;
use crate::pipeline::PipelineConfig;
use crate::profile::ProfilerConfig;
use crate::quality::QualityConfig;
use crate::suggestion::LlmConfig;

/// Smallest accepted `max_exact_distinct`.
pub const MIN_DISTINCT_SKETCH: usize = 16;

/// Every configurable part of Assay. Missing sections take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssayConfig {
    pub parser: ParserConfig,
    pub profiler: ProfilerConfig,
    pub quality: QualityConfig,
    pub pipeline: PipelineConfig,
    pub llm: LlmConfig,
}

impl AssayConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AssayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| AssayError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.quality.null_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(AssayError::Config(format!(
                "quality.nullThreshold must be between 0 and 100, got {threshold}"
            )));
        }

        if let Some(limit) = self.profiler.max_exact_distinct {
            if limit < MIN_DISTINCT_SKETCH {
                return Err(AssayError::Config(format!(
                    "profiler.maxExactDistinct must be at least {MIN_DISTINCT_SKETCH}, got {limit}"
                )));
            }
        }

        if self.parser.delimiter == Some(self.parser.quote) {
            return Err(AssayError::Config(
                "parser delimiter and quote must differ".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AssayError::Config(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }

        if self.pipeline.output_location.trim().is_empty() {
            return Err(AssayError::Config(
                "pipeline.outputLocation must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

//! Pipeline: profile, check, persist, then optionally ask for transformations.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::AssayConfig;
use crate::error::{AssayError, Result};
use crate::input::{Parser, RecordStream, SourceMetadata};
use crate::profile::{Profile, StreamProfiler};
use crate::quality::{QualityEngine, QualityReport};
use crate::store::{MetadataStore, ProfileId, TransformationMetadata};
use crate::suggestion::TransformationSuggester;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Input file (the CLI argument takes precedence).
    pub input: Option<PathBuf>,
    /// Where transformed output is reported to go.
    pub output_location: String,
    /// Metadata database location.
    pub metadata_db: PathBuf,
    /// Skip the transformation step when any quality rule fails.
    pub halt_on_quality_failure: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_location: "transformed".to_string(),
            metadata_db: PathBuf::from("data/metadata.db"),
            halt_on_quality_failure: true,
        }
    }
}

/// What happened at the transformation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TransformationOutcome {
    /// No suggester was configured.
    NotConfigured,
    /// The step was skipped because the quality gate failed.
    Skipped { reason: String },
    /// The service returned directives.
    Suggested { directives: Value },
    /// The service call failed or its reply was not usable.
    Failed {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub source: SourceMetadata,
    pub profile: Profile,
    pub profile_id: ProfileId,
    pub report: QualityReport,
    pub transformation_id: i64,
    pub output_location: String,
    pub transformation: TransformationOutcome,
}

impl RunOutcome {
    /// Whether every quality rule passed.
    pub fn passed(&self) -> bool {
        self.report.passed
    }
}

/// Explicitly wired composition of profiler, rule engine, store and an
/// optional suggester.
pub struct Pipeline {
    parser: Parser,
    profiler: StreamProfiler,
    engine: QualityEngine,
    store: MetadataStore,
    suggester: Option<Box<dyn TransformationSuggester>>,
    output_location: String,
    halt_on_quality_failure: bool,
}

impl Pipeline {
    /// Create a pipeline with default parsing and output settings.
    pub fn new(profiler: StreamProfiler, engine: QualityEngine, store: MetadataStore) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            parser: Parser::new(),
            profiler,
            engine,
            store,
            suggester: None,
            output_location: defaults.output_location,
            halt_on_quality_failure: defaults.halt_on_quality_failure,
        }
    }

    /// Build every component from configuration, opening the metadata store.
    pub fn from_config(config: &AssayConfig) -> Result<Self> {
        config.validate()?;
        let store = MetadataStore::initialize(&config.pipeline.metadata_db)?;

        Ok(Self::new(
            StreamProfiler::with_config(config.profiler.clone()),
            QualityEngine::with_config(&config.quality),
            store,
        )
        .with_parser(Parser::with_config(config.parser.clone()))
        .with_output_location(config.pipeline.output_location.clone())
        .with_halt_on_quality_failure(config.pipeline.halt_on_quality_failure))
    }

    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Add a transformation suggester.
    pub fn with_suggester(self, suggester: impl TransformationSuggester + 'static) -> Self {
        self.with_boxed_suggester(Box::new(suggester))
    }

    /// Add a suggester chosen at runtime.
    pub fn with_boxed_suggester(mut self, suggester: Box<dyn TransformationSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn with_output_location(mut self, location: impl Into<String>) -> Self {
        self.output_location = location.into();
        self
    }

    pub fn with_halt_on_quality_failure(mut self, halt: bool) -> Self {
        self.halt_on_quality_failure = halt;
        self
    }

    /// The metadata store, for read-back.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Run the pipeline over a file.
    pub fn run_path(&mut self, path: impl AsRef<Path>) -> Result<RunOutcome> {
        let path = path.as_ref();
        let stream = self.parser.open(path)?;
        let output_location = self.output_location.clone();
        self.run_stream(stream, path.display().to_string(), &output_location)
    }

    /// Run the pipeline over in-memory bytes.
    pub fn run_bytes(
        &mut self,
        bytes: &[u8],
        source: impl Into<String>,
        output_location: &str,
    ) -> Result<RunOutcome> {
        let stream = self.parser.stream_bytes(bytes)?;
        self.run_stream(stream, source, output_location)
    }

    /// Run the pipeline over an open record stream.
    ///
    /// Profiling completes before any rule runs, and both complete before
    /// anything is persisted. A stream error therefore leaves the store
    /// untouched.
    pub fn run_stream<R: Read>(
        &mut self,
        mut stream: RecordStream<R>,
        source: impl Into<String>,
        output_location: &str,
    ) -> Result<RunOutcome> {
        let source = source.into();
        info!(source = %source, "Pipeline run started");

        let profile = self.profiler.profile(stream.by_ref())?;
        let source = stream.source_metadata(source);
        let report = self.engine.check(&profile);

        let profile_id = self.store.save_profile(&profile)?;
        let transformation_id = self.store.save_transformation_metadata(
            &TransformationMetadata::new(profile_id, report.clone(), output_location),
        )?;

        let transformation = self.suggest(&profile, &report);

        info!(
            profile_id = %profile_id,
            transformation_id,
            passed = report.passed,
            "Pipeline run completed"
        );

        Ok(RunOutcome {
            source,
            profile,
            profile_id,
            report,
            transformation_id,
            output_location: output_location.to_string(),
            transformation,
        })
    }

    fn suggest(&self, profile: &Profile, report: &QualityReport) -> TransformationOutcome {
        let Some(suggester) = &self.suggester else {
            return TransformationOutcome::NotConfigured;
        };

        if !report.passed && self.halt_on_quality_failure {
            warn!("Skipping transformation step: data quality checks failed");
            return TransformationOutcome::Skipped {
                reason: "Data quality checks failed".to_string(),
            };
        }

        match suggester.suggest(profile) {
            Ok(directives) => {
                info!(suggester = suggester.name(), "Received transformation directives");
                TransformationOutcome::Suggested { directives }
            }
            Err(AssayError::TransformationFormat { message, raw }) => {
                warn!(suggester = suggester.name(), error = %message, "Invalid transformation format");
                TransformationOutcome::Failed {
                    message: format!("Invalid transformation format: {message}"),
                    raw: Some(raw),
                }
            }
            Err(e) => {
                warn!(suggester = suggester.name(), error = %e, "Transformation request failed");
                TransformationOutcome::Failed {
                    message: e.to_string(),
                    raw: None,
                }
            }
        }
    }
}

//! Assay: streaming data profiler and quality gate for tabular datasets.
//!
//! Assay reads a header-qualified delimited record stream, infers a type for
//! every column, computes a per-column profile, evaluates data-quality rules
//! against that profile, and stores both in an append-only SQLite metadata
//! store. A transformation suggester can optionally be asked for directives.
//!
//! # Core Principles
//!
//! - **Streaming**: records are pulled one at a time and never buffered whole
//! - **Deterministic**: the same input always yields the same profile and report
//! - **Auditable**: every report is stored against the profile it was derived from
//!
//! # Example
//!
//! ```no_run
//! use assay::{MetadataStore, Pipeline, QualityEngine, StreamProfiler};
//!
//! let store = MetadataStore::initialize("data/metadata.db").unwrap();
//! let mut pipeline = Pipeline::new(StreamProfiler::new(), QualityEngine::new(), store);
//! let outcome = pipeline.run_path("users.csv").unwrap();
//!
//! println!("Rows: {}", outcome.profile.row_count);
//! println!("Passed: {}", outcome.report.passed);
//! ```

pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod pipeline;
pub mod profile;
pub mod quality;
pub mod store;
pub mod suggestion;
pub mod trigger;

pub use config::AssayConfig;
pub use error::{AssayError, Result};
pub use inference::{infer_type, TypeInference, TypeTag};
pub use input::{Parser, ParserConfig, Record, RecordStream, SourceMetadata};
pub use pipeline::{Pipeline, PipelineConfig, RunOutcome, TransformationOutcome};
pub use profile::{ColumnProfile, Profile, ProfilerConfig, StreamProfiler};
pub use quality::{
    DataTypeRule, FnRule, NullThresholdRule, QualityConfig, QualityEngine, QualityReport,
    QualityRule, RuleFailure, RuleResult, UniqueConstraintRule,
};
pub use store::{
    MetadataStore, ProfileId, StoredProfileRecord, StoredTransformationRecord,
    TransformationMetadata,
};
pub use suggestion::{
    LlmConfig, MockSuggester, OllamaSuggester, OpenAiSuggester, TransformationSuggester,
};
pub use trigger::{handle_event, HandlerResponse, LocalObjectStore, ObjectFetcher, StorageEvent};

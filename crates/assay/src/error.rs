//! Error types for the Assay library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Assay operations.
#[derive(Debug, Error)]
pub enum AssayError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record stream could not be read or parsed.
    #[error("Stream read error at row {row}: {message}")]
    StreamRead { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty input or no data to profile.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The transformation service replied with something that is not JSON.
    #[error("Invalid transformation format: {message}")]
    TransformationFormat {
        message: String,
        /// The unparsed reply, kept for diagnosis.
        raw: String,
    },

    /// Transport or API failure talking to an LLM service.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Any failure of the metadata store.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A stored record that was asked for does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed object-storage notification.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssayError {
    /// Returns true if this error came from reading the input stream.
    pub fn is_stream_error(&self) -> bool {
        matches!(
            self,
            AssayError::StreamRead { .. } | AssayError::Csv(_) | AssayError::EmptyData(_)
        )
    }
}

/// Result type alias for Assay operations.
pub type Result<T> = std::result::Result<T, AssayError>;

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Assay: streaming data profiler and quality gate
#[derive(Parser)]
#[command(name = "assay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a file, check quality rules and store the results
    Run {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output location recorded with the quality report
        #[arg(short, long)]
        output: Option<String>,

        /// Metadata database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Maximum allowed null percentage per column
        #[arg(long)]
        null_threshold: Option<f64>,

        /// Columns that must be unique (comma separated)
        #[arg(long, value_delimiter = ',')]
        unique_columns: Option<Vec<String>>,

        /// Transformation suggester to ask after the quality gate
        #[arg(long, default_value = "none")]
        suggester: SuggesterChoice,

        /// Model to use (suggester-specific, e.g., "gpt-4", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Ask for transformations even when quality checks fail
        #[arg(long)]
        no_halt: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the profile of a file as JSON without storing anything
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field delimiter (auto-detected if omitted)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Maximum rows to read
        #[arg(long)]
        max_rows: Option<usize>,

        /// Exact distinct values kept per column before estimating
        #[arg(long)]
        max_exact_distinct: Option<usize>,
    },

    /// List stored profiles and their quality reports
    History {
        /// Metadata database path
        #[arg(long, default_value = "data/metadata.db")]
        db: PathBuf,

        /// Number of profiles to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process an object-storage event against a local bucket directory
    Event {
        /// Path to the event JSON
        #[arg(value_name = "EVENT_FILE")]
        file: PathBuf,

        /// Directory holding one subdirectory per bucket
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Metadata database path
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Transformation suggester choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SuggesterChoice {
    /// No suggestions
    None,
    /// Deterministic offline suggester
    Mock,
    /// OpenAI API (requires OPENAI_API_KEY)
    Openai,
    /// Local Ollama server (honours OLLAMA_HOST)
    Ollama,
}

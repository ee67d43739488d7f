//! CLI command implementations.

pub mod event;
pub mod history;
pub mod profile;
pub mod run;

use std::path::PathBuf;

use assay::AssayConfig;

/// Load the configuration file if one was given, then apply the database
/// override.
pub(crate) fn load_config(
    path: Option<&PathBuf>,
    db: Option<PathBuf>,
) -> Result<AssayConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(p) => AssayConfig::load(p)?,
        None => AssayConfig::default(),
    };
    if let Some(db) = db {
        config.pipeline.metadata_db = db;
    }
    Ok(config)
}

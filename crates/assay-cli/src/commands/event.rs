//! Event command - handle an object-storage notification locally.

use std::fs;
use std::path::PathBuf;

use assay::trigger::handle_event_json;
use assay::{LocalObjectStore, Pipeline};

pub fn run(
    file: PathBuf,
    root: PathBuf,
    config: Option<PathBuf>,
    db: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read event {}: {}", file.display(), e))?;

    let config = super::load_config(config.as_ref(), db)?;
    let mut pipeline = Pipeline::from_config(&config)?;
    let store = LocalObjectStore::new(root);

    let response = handle_event_json(&raw, &store, &mut pipeline);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        return Err("Event processing failed".into());
    }
    Ok(())
}

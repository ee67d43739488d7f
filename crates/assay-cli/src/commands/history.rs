//! History command - list stored profiles and their quality reports.

use std::path::PathBuf;

use assay::MetadataStore;
use colored::Colorize;

pub fn run(db: PathBuf, limit: usize, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !db.exists() {
        return Err(format!("Metadata database not found: {}", db.display()).into());
    }

    let store = MetadataStore::initialize(&db)?;
    let profiles = store.recent_profiles(limit)?;

    if json_output {
        let mut entries = Vec::with_capacity(profiles.len());
        for stored in &profiles {
            entries.push(serde_json::json!({
                "profile": stored,
                "transformations": store.transformations_for_profile(stored.id)?,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("No profiles stored in {}", db.display());
        return Ok(());
    }

    println!(
        "{} {}",
        "History for".cyan().bold(),
        db.display().to_string().white()
    );
    println!();

    for stored in &profiles {
        println!(
            "{} {}  {}  {} rows, {} columns",
            "Profile".yellow().bold(),
            stored.id.to_string().white().bold(),
            stored.timestamp.format("%Y-%m-%d %H:%M:%S"),
            stored.profile.row_count,
            stored.profile.column_count()
        );

        for record in store.transformations_for_profile(stored.id)? {
            let status = if record.quality_report.passed {
                "passed".green()
            } else {
                "failed".red()
            };
            let summary = record.quality_report.summary();
            println!(
                "  report {}  {}  {} failures  -> {}",
                record.id,
                status,
                summary.failures,
                record.output_location
            );
        }
    }

    Ok(())
}

//! Profile command - print a profile without persisting it.

use std::path::PathBuf;

use assay::{Parser, ParserConfig, ProfilerConfig, StreamProfiler};

pub fn run(
    file: PathBuf,
    delimiter: Option<char>,
    max_rows: Option<usize>,
    max_exact_distinct: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => return Err(format!("Delimiter must be an ASCII character, got '{}'", c).into()),
        None => None,
    };

    let parser = Parser::with_config(ParserConfig {
        delimiter,
        max_rows,
        ..ParserConfig::default()
    });
    let profiler = StreamProfiler::with_config(ProfilerConfig { max_exact_distinct });

    let profile = profiler.profile(parser.open(&file)?)?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    Ok(())
}

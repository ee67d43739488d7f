//! Run command - profile, check, persist and optionally request transformations.

use std::path::PathBuf;

use assay::{
    MockSuggester, OllamaSuggester, OpenAiSuggester, Pipeline, RunOutcome, TransformationOutcome,
    TransformationSuggester,
};
use colored::Colorize;

use crate::cli::SuggesterChoice;

pub struct RunArgs {
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<String>,
    pub db: Option<PathBuf>,
    pub null_threshold: Option<f64>,
    pub unique_columns: Option<Vec<String>>,
    pub suggester: SuggesterChoice,
    pub model: Option<String>,
    pub no_halt: bool,
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(args.config.as_ref(), args.db)?;

    if let Some(output) = args.output {
        config.pipeline.output_location = output;
    }
    if let Some(threshold) = args.null_threshold {
        config.quality.null_threshold = threshold;
    }
    if let Some(columns) = args.unique_columns {
        config.quality.unique_columns = columns;
    }
    if let Some(model) = args.model {
        config.llm.model = model;
    }
    if args.no_halt {
        config.pipeline.halt_on_quality_failure = false;
    }

    let file = args
        .file
        .or_else(|| config.pipeline.input.clone())
        .ok_or("No input file given (pass FILE or set pipeline.input in the config)")?;
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut pipeline = Pipeline::from_config(&config)?;
    if let Some(suggester) = build_suggester(args.suggester, &config)? {
        pipeline = pipeline.with_boxed_suggester(suggester);
    }

    if !args.json {
        println!(
            "{} {}",
            "Profiling".cyan().bold(),
            file.display().to_string().white()
        );
    }

    let outcome = pipeline.run_path(&file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn build_suggester(
    choice: SuggesterChoice,
    config: &assay::AssayConfig,
) -> Result<Option<Box<dyn TransformationSuggester>>, Box<dyn std::error::Error>> {
    let suggester: Box<dyn TransformationSuggester> = match choice {
        SuggesterChoice::None => return Ok(None),
        SuggesterChoice::Mock => Box::new(MockSuggester::new()),
        SuggesterChoice::Openai => Box::new(OpenAiSuggester::from_env(config.llm.clone())?),
        SuggesterChoice::Ollama => {
            let mut llm = config.llm.clone();
            if llm.model == assay::LlmConfig::default().model {
                llm.model = "llama3.2".to_string();
            }
            Box::new(OllamaSuggester::with_config(llm)?)
        }
    };
    Ok(Some(suggester))
}

fn print_outcome(outcome: &RunOutcome) {
    println!(
        "  {} rows, {} columns ({})",
        outcome.profile.row_count.to_string().white().bold(),
        outcome.profile.column_count(),
        outcome.source.format
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for (name, column) in &outcome.profile.columns {
        println!(
            "  {:24} {:8} nulls {:>6.2}%  unique {}",
            name,
            column.column_type.to_string(),
            column.null_percentage,
            column.unique_count
        );
    }
    println!();

    println!("{}", "Quality checks:".yellow().bold());
    for result in &outcome.report.results {
        let mark = if result.passed {
            "PASS".green()
        } else {
            "FAIL".red()
        };
        println!("  {} {}", mark, result.name);
        for failure in &result.failures {
            println!("       {}: {}", failure.column.white(), failure.message);
        }
    }
    println!();

    let summary = outcome.report.summary();
    if outcome.passed() {
        println!("{}", "All quality checks passed".green().bold());
    } else {
        println!(
            "{} {} of {} rules failed ({} failures)",
            "Quality gate failed:".red().bold(),
            summary.rules_failed,
            summary.rules,
            summary.failures
        );
    }

    match &outcome.transformation {
        TransformationOutcome::NotConfigured => {}
        TransformationOutcome::Skipped { reason } => {
            println!("{} {}", "Transformations skipped:".yellow(), reason);
        }
        TransformationOutcome::Suggested { directives } => {
            println!("{}", "Suggested transformations:".cyan().bold());
            println!(
                "{}",
                serde_json::to_string_pretty(directives).unwrap_or_else(|_| directives.to_string())
            );
        }
        TransformationOutcome::Failed { message, .. } => {
            println!("{} {}", "Transformation request failed:".red(), message);
        }
    }

    println!();
    println!(
        "Stored profile {} and report {} -> {}",
        outcome.profile_id.to_string().white().bold(),
        outcome.transformation_id.to_string().white().bold(),
        outcome.output_location
    );
}

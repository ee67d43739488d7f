//! Assay CLI - streaming data profiler and quality gate.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            output,
            db,
            null_threshold,
            unique_columns,
            suggester,
            model,
            no_halt,
            json,
        } => commands::run::run(commands::run::RunArgs {
            file,
            config,
            output,
            db,
            null_threshold,
            unique_columns,
            suggester,
            model,
            no_halt,
            json,
        }),

        Commands::Profile {
            file,
            delimiter,
            max_rows,
            max_exact_distinct,
        } => commands::profile::run(file, delimiter, max_rows, max_exact_distinct),

        Commands::History { db, limit, json } => commands::history::run(db, limit, json),

        Commands::Event {
            file,
            root,
            config,
            db,
        } => commands::event::run(file, root, config, db),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! dvdmirror CLI
//!
//! Command-line interface for mirroring DVD-Video discs.

mod cli_types;
mod commands;
mod error;
mod logger;
mod progress;

use std::path::PathBuf;

use clap::Parser;
use log::Log;

use dvdmirror_lib::ChapterSelection;

use cli_types::{Cli, Commands, ConfigAction};
use commands::Source;
use commands::mirror::Selection;
use error::CliError;

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        log::logger().flush();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let source = Source {
        input: cli.input.unwrap_or_else(|| PathBuf::from(".")),
        device: cli.device,
        name: cli.name,
    };
    let output = cli.output.unwrap_or_else(|| PathBuf::from("."));
    let quiet = cli.quiet;

    let (selection, mirror) = match cli.command {
        Commands::Mirror { mirror } => (Selection::Disc, mirror),
        Commands::TitleSet { title_set, mirror } => (Selection::TitleSet(title_set), mirror),
        Commands::Main { mirror } => (Selection::MainFeature, mirror),
        Commands::Title { title, mirror } => (Selection::Title(title), mirror),
        Commands::Chapters {
            title,
            start,
            end,
            mirror,
        } => (
            Selection::Chapters(ChapterSelection::new(title, start, end)),
            mirror,
        ),
        Commands::Info { aspect } => return commands::info::run_info(&source, aspect),
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => {
                    commands::config::run_config_show();
                    Ok(())
                }
                ConfigAction::Path => {
                    commands::config::run_config_path();
                    Ok(())
                }
                ConfigAction::Set { key, value } => commands::config::run_config_set(&key, &value),
            };
        }
    };

    commands::mirror::run_mirror(&source, &output, selection, &mirror, quiet)
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;

//! `log` sink for the CLI.
//!
//! Info and below go to stdout, warnings and errors to stderr. With
//! `--logfile` every record is also appended to a file with ANSI escapes
//! removed.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::error::CliError;

struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    fn prefix(&self) -> String {
        if self.timestamps {
            format!("{} ", chrono::Local::now().format("%H:%M:%S%.3f"))
        } else {
            String::new()
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let prefix = self.prefix();
        let message = record.args().to_string();
        match record.level() {
            Level::Error => eprintln!(
                "{}{} {}",
                prefix,
                "error:".if_supports_color(Stderr, |t| t.red()),
                message
            ),
            Level::Warn => eprintln!(
                "{}{} {}",
                prefix,
                "warning:".if_supports_color(Stderr, |t| t.yellow()),
                message
            ),
            Level::Info => println!("{}{}", prefix, message),
            Level::Debug | Level::Trace => println!(
                "{}{}",
                prefix,
                message.if_supports_color(owo_colors::Stream::Stdout, |t| t.dimmed())
            ),
        }

        if let Some(file) = &self.file {
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let plain = strip_ansi_escapes::strip_str(&message);
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{} {:<5} {}", stamp, record.level(), plain);
            }
        }
    }

    fn flush(&self) {
        if let Some(Ok(mut file)) = self.file.as_ref().map(|f| f.lock()) {
            let _ = file.flush();
        }
    }
}

/// Install the logger. `quiet` wins over `verbose`.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::logging(format!("{}: {}", path.display(), e)))?;
            Some(Mutex::new(file))
        }
        None => None,
    };

    let logger = CliLogger {
        level,
        timestamps: verbose,
        file,
    };
    log::set_boxed_logger(Box::new(logger)).map_err(|e| CliError::logging(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

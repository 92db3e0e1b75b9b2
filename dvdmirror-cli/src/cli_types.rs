//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use dvdmirror_core::{AspectRatio, ErrorStrategy, GapFill};

#[derive(Parser)]
#[command(name = "dvdmirror")]
#[command(about = "Mirror DVD-Video discs into a VIDEO_TS folder", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Disc to read: a mounted disc or a folder holding VIDEO_TS (defaults to current directory)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Directory the mirror is written into (defaults to current directory)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Title name used for the output folder (defaults to the volume label)
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Disc image or device to read the volume label from
    #[arg(long, global = true)]
    pub device: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that copies from the disc. Unset flags
/// fall back to `settings.toml`, then to the built-in defaults.
#[derive(Args, Clone)]
pub(crate) struct MirrorArgs {
    /// What to do on read errors: abort, skip-block, skip-run, skip-unused
    #[arg(short, long = "error", value_name = "STRATEGY")]
    pub strategy: Option<ErrorStrategy>,

    /// Preferred aspect ratio for dual format discs (4:3 or 16:9)
    #[arg(short, long)]
    pub aspect: Option<AspectRatio>,

    /// How skip-unused writes unreferenced blocks: stuffing or seek
    #[arg(long)]
    pub gap_fill: Option<GapFill>,

    /// Show copy progress
    #[arg(short, long)]
    pub progress: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Mirror the whole disc
    Mirror {
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Mirror one title set (0 is the video manager)
    TitleSet {
        /// Title set number
        title_set: u8,

        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Mirror the title set holding the main feature
    Main {
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Copy every chapter of one title
    Title {
        /// Disc title number
        title: u16,

        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Copy a chapter range of one title (defaults to the main title)
    Chapters {
        /// Disc title number
        #[arg(short, long)]
        title: Option<u16>,

        /// First chapter
        start: u16,

        /// Last chapter (defaults to the title's last chapter)
        end: Option<u16>,

        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Show the disc's file structure, main feature and titles
    Info {
        /// Preferred aspect ratio for dual format discs (4:3 or 16:9)
        #[arg(short, long)]
        aspect: Option<AspectRatio>,
    },

    /// Manage persistent defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file
    Show,

    /// Print the settings file path
    Path,

    /// Set a default: strategy, aspect, gap_fill or progress
    Set {
        /// Setting name
        key: String,

        /// New value
        value: String,
    },
}

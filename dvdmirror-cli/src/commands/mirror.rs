use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvdmirror_core::util::format_filesize;
use dvdmirror_core::{CopyProgress, LOGICAL_BLOCK_BYTES};
use dvdmirror_lib::{
    ChapterSelection, MirrorSummary, mirror_chapters, mirror_disc, mirror_main_feature,
    mirror_title, mirror_title_set,
};

use super::{Source, mirror_options};
use crate::cli_types::MirrorArgs;
use crate::error::CliError;
use crate::progress::ProgressDisplay;

/// What part of the disc to copy.
pub(crate) enum Selection {
    Disc,
    TitleSet(u8),
    MainFeature,
    Title(u16),
    Chapters(ChapterSelection),
}

/// Copy the selected part of the disc into `<output>/<title name>/VIDEO_TS`.
pub(crate) fn run_mirror(
    source: &Source,
    output: &Path,
    selection: Selection,
    args: &MirrorArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let options = mirror_options(args);
    let mut disc = source.open()?;
    let name = source.title_name(&mut disc);

    log::info!(
        "{} {} into {}",
        "Mirroring".if_supports_color(Stdout, |t| t.bold()),
        name.if_supports_color(Stdout, |t| t.cyan()),
        output.display()
    );
    log::debug!(
        "Errors: {}, aspect: {}, gaps: {}",
        options.strategy,
        options.preferred_aspect,
        options.gap_fill.short_name()
    );
    crate::log_blank();

    let display = ProgressDisplay::new(quiet, options.progress);
    let progress = |event: CopyProgress| display.handle(event);

    let summary = match selection {
        Selection::Disc => mirror_disc(&mut disc, output, &name, &options, &progress)?,
        Selection::TitleSet(ts) => {
            mirror_title_set(&mut disc, output, &name, ts, &options, &progress)?
        }
        Selection::MainFeature => {
            mirror_main_feature(&mut disc, output, &name, &options, &progress)?
        }
        Selection::Title(title) => {
            mirror_title(&mut disc, output, &name, title, &options, &progress)?
        }
        Selection::Chapters(chapters) => {
            mirror_chapters(&mut disc, output, &name, chapters, &options, &progress)?
        }
    };

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &MirrorSummary) {
    crate::log_blank();
    if let Some(guess) = &summary.main_feature {
        log::info!(
            "Main feature: title set {} ({}, {})",
            guess.title_set,
            guess.classification,
            guess.accepted_by
        );
    }
    log::info!(
        "{} {} files, {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.files.len(),
        format_filesize(summary.blocks_copied * LOGICAL_BLOCK_BYTES)
    );
    for file in &summary.files {
        log::debug!("  {}", file.display());
    }
    if summary.blocks_padded > 0 {
        log::warn!(
            "{} unreadable blocks were padded with zeros",
            summary.blocks_padded
        );
    }
    if summary.blocks_unreferenced > 0 {
        log::info!(
            "  {} unreferenced blocks were not read",
            summary.blocks_unreferenced
        );
    }
}

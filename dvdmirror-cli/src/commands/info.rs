use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvdmirror_core::AspectRatio;
use dvdmirror_core::util::format_filesize;
use dvdmirror_lib::report::DiscReport;
use dvdmirror_lib::settings::load_mirror_settings;
use dvdmirror_lib::{MirrorOptions, build_report};

use super::Source;
use crate::error::CliError;

/// Print the disc's structure, main feature and titles.
pub(crate) fn run_info(source: &Source, aspect: Option<AspectRatio>) -> Result<(), CliError> {
    let aspect = aspect.unwrap_or_else(|| {
        load_mirror_settings()
            .apply(MirrorOptions::default())
            .preferred_aspect
    });
    let mut disc = source.open()?;
    let name = source.title_name(&mut disc);
    let report = build_report(&mut disc, aspect)?;

    print_header(&name, &report);
    print_files(&report);
    print_main_feature(&report);
    print_title_sets(&report);
    Ok(())
}

fn print_header(name: &str, report: &DiscReport) {
    log::info!(
        "{} {}",
        "DVD-Video information:".if_supports_color(Stdout, |t| t.bold()),
        name.if_supports_color(Stdout, |t| t.cyan())
    );
    match &report.volume_label {
        Some(label) => log::info!("  Volume label: {}", label),
        None => log::info!(
            "  Volume label: {}",
            "(unknown)".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    log::info!("  Titles: {}", report.title_count);
    crate::log_blank();
}

fn print_files(report: &DiscReport) {
    log::info!("{}", "File structure:".if_supports_color(Stdout, |t| t.bold()));
    let mut current = None;
    for file in &report.files {
        if current != Some(file.title_set) {
            current = Some(file.title_set);
            if file.title_set == 0 {
                log::info!("  Video manager");
            } else {
                log::info!("  Title set {}", file.title_set);
            }
        }
        log::info!(
            "    {:<14} {:>10}",
            file.name,
            format_filesize(file.size)
        );
    }
    log::info!(
        "  Total: {}",
        format_filesize(report.total_size()).if_supports_color(Stdout, |t| t.bold())
    );
    crate::log_blank();
}

fn print_main_feature(report: &DiscReport) {
    let main = &report.main_feature;
    log::info!(
        "{} title set {}",
        "Main feature:".if_supports_color(Stdout, |t| t.bold()),
        main.guess.title_set.if_supports_color(Stdout, |t| t.green())
    );
    log::info!(
        "  Picked as {} ({})",
        main.guess.classification,
        main.guess.accepted_by
    );
    match main.aspect_ratio {
        Some(aspect) => log::info!("  Aspect ratio: {}", aspect),
        None => log::info!(
            "  Aspect ratio: {}",
            "(unknown)".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    log::info!("  Angles: {}", main.angles);
    log::info!("  Audio tracks: {}", main.audio_tracks);
    log::info!("  Max audio channels: {}", main.max_channels);
    log::info!("  Subpictures: {}", main.subpictures);
    log::info!("  Chapters: {}", main.max_chapters);
    crate::log_blank();
}

fn print_title_sets(report: &DiscReport) {
    for set in &report.title_sets {
        log::info!(
            "{} {}",
            "Title set".if_supports_color(Stdout, |t| t.bold()),
            set.title_set.if_supports_color(Stdout, |t| t.bold())
        );
        log::info!(
            "  {}, {} audio tracks (up to {} channels), {} subpictures",
            set.aspect_ratio,
            set.audio_tracks,
            set.max_channels,
            set.subpictures
        );
        for title in &set.titles {
            log::info!(
                "  Title {:>2}: {} chapters, {} angles {}",
                title.id,
                title.chapter_count,
                title.angle_count,
                format!("(local title {})", title.title_set_local_id)
                    .if_supports_color(Stdout, |t| t.dimmed())
            );
        }
        crate::log_blank();
    }
}

//! Disc information for the `info` command.

use dvdmirror_core::files::{info_file_name, menu_file_name, title_part_file_name};
use dvdmirror_core::{AspectRatio, DiscStructure};

use crate::catalog::{TitleCatalog, TitleRecord, TitleSetCatalog, build_catalogs};
use crate::error::MirrorError;
use crate::selector::{MainFeatureGuess, select_main_title_set};

/// One file of the disc with its declared size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub title_set: u8,
    pub name: String,
    pub size: u64,
}

/// Attributes of the guessed main feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainFeatureReport {
    pub guess: MainFeatureGuess,
    /// `None` when the guessed title set has no attributes.
    pub aspect_ratio: Option<AspectRatio>,
    /// Highest values over the titles of the main title set.
    pub angles: u8,
    pub max_chapters: u16,
    pub audio_tracks: u8,
    pub max_channels: u8,
    pub subpictures: u8,
}

/// Summary of one title set and its titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSetReport {
    pub title_set: u8,
    pub aspect_ratio: AspectRatio,
    pub audio_tracks: u8,
    pub max_channels: u8,
    pub subpictures: u8,
    pub titles: Vec<TitleRecord>,
}

/// Everything `dvdmirror info` prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscReport {
    pub volume_label: Option<String>,
    pub title_count: u16,
    pub files: Vec<FileEntry>,
    pub main_feature: MainFeatureReport,
    pub title_sets: Vec<TitleSetReport>,
}

impl DiscReport {
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Read the disc's tables and collect the report.
pub fn build_report(
    disc: &mut dyn DiscStructure,
    preferred_aspect: AspectRatio,
) -> Result<DiscReport, MirrorError> {
    let volume_label = disc.volume_label();
    let (titles, sizes) = build_catalogs(disc)?;
    let guess = select_main_title_set(&titles, &sizes, preferred_aspect);

    Ok(DiscReport {
        volume_label,
        title_count: titles.title_count(),
        files: file_entries(&sizes),
        main_feature: main_feature_report(&titles, guess),
        title_sets: (1..=titles.title_set_count())
            .filter_map(|ts| title_set_report(&titles, ts))
            .collect(),
    })
}

fn file_entries(sizes: &TitleSetCatalog) -> Vec<FileEntry> {
    let mut files = Vec::new();
    for (ts, set) in sizes.iter() {
        let mut push = |name: String, size: u64| {
            files.push(FileEntry {
                title_set: ts,
                name,
                size,
            })
        };
        push(info_file_name(ts, "IFO"), set.ifo_size);
        if set.menu_size > 0 {
            push(menu_file_name(ts), set.menu_size);
        }
        for (i, &size) in set.vob_part_sizes.iter().enumerate() {
            push(title_part_file_name(ts, (i + 1) as u8), size);
        }
    }
    files
}

fn main_feature_report(titles: &TitleCatalog, guess: MainFeatureGuess) -> MainFeatureReport {
    let ts = guess.title_set;
    let features = titles.features(ts);
    let in_set: Vec<&TitleRecord> = titles.titles_in(ts).collect();

    MainFeatureReport {
        guess,
        aspect_ratio: features.map(|f| f.aspect_ratio),
        angles: in_set.iter().map(|t| t.angle_count).max().unwrap_or(0),
        max_chapters: titles.chapters_of(ts),
        audio_tracks: features.map(|f| f.audio_track_count).unwrap_or(0),
        max_channels: features.map(|f| f.max_audio_channels).unwrap_or(0),
        subpictures: features.map(|f| f.subpicture_count).unwrap_or(0),
    }
}

fn title_set_report(titles: &TitleCatalog, ts: u8) -> Option<TitleSetReport> {
    let features = titles.features(ts)?;
    Some(TitleSetReport {
        title_set: ts,
        aspect_ratio: features.aspect_ratio,
        audio_tracks: features.audio_track_count,
        max_channels: features.max_audio_channels,
        subpictures: features.subpicture_count,
        titles: titles.titles_in(ts).cloned().collect(),
    })
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;

//! Title and title set catalogs.
//!
//! Built once per operation from the provider's video manager tables and
//! file sizes, then lent read-only to the selector, resolver and copier.

use dvdmirror_core::files::{MAX_VOB_PARTS, info_file_name};
use dvdmirror_core::{AspectRatio, DiscStructure, Domain, TitleSetAttributes};

use crate::error::MirrorError;

/// Metadata of one disc title, joined with its title set's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    /// Disc title number (1-based).
    pub id: u16,
    pub title_set: u8,
    /// Title number within the title set (1-based).
    pub title_set_local_id: u8,
    pub chapter_count: u16,
    pub angle_count: u8,
    pub audio_track_count: u8,
    pub max_audio_channels: u8,
    pub subpicture_count: u8,
    pub aspect_ratio: AspectRatio,
}

/// Per title set attributes used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleSetFeatures {
    pub aspect_ratio: AspectRatio,
    pub audio_track_count: u8,
    /// Highest channel count over the title set's audio streams, 0 without
    /// audio.
    pub max_audio_channels: u8,
    pub subpicture_count: u8,
}

impl TitleSetFeatures {
    fn from_attributes(attrs: &TitleSetAttributes) -> Self {
        Self {
            aspect_ratio: attrs.aspect_ratio,
            audio_track_count: attrs.audio_streams().min(u8::MAX as usize) as u8,
            max_audio_channels: attrs
                .audio_channels
                .iter()
                .map(|&c| c.saturating_add(1))
                .max()
                .unwrap_or(0),
            subpicture_count: attrs.subpicture_streams,
        }
    }

    /// Attributes for a title whose title set the disc does not declare.
    fn unattributed() -> Self {
        Self {
            aspect_ratio: AspectRatio::Standard,
            audio_track_count: 0,
            max_audio_channels: 0,
            subpicture_count: 0,
        }
    }
}

/// All titles of the disc plus the guessed main title set.
#[derive(Debug, Clone)]
pub struct TitleCatalog {
    titles: Vec<TitleRecord>,
    title_sets: Vec<TitleSetFeatures>,
    main_title_set: u8,
}

impl TitleCatalog {
    pub fn titles(&self) -> &[TitleRecord] {
        &self.titles
    }

    /// Look up a title by its 1-based disc number.
    pub fn title(&self, id: u16) -> Option<&TitleRecord> {
        id.checked_sub(1)
            .and_then(|index| self.titles.get(index as usize))
    }

    pub fn title_count(&self) -> u16 {
        self.titles.len().min(u16::MAX as usize) as u16
    }

    pub fn title_set_count(&self) -> u8 {
        self.title_sets.len() as u8
    }

    /// Attributes of title set `title_set` (1-based).
    pub fn features(&self, title_set: u8) -> Option<&TitleSetFeatures> {
        title_set
            .checked_sub(1)
            .and_then(|index| self.title_sets.get(index as usize))
    }

    pub fn titles_in(&self, title_set: u8) -> impl Iterator<Item = &TitleRecord> {
        self.titles.iter().filter(move |t| t.title_set == title_set)
    }

    /// Most chapters of any title in the title set, 0 if it has none.
    pub fn chapters_of(&self, title_set: u8) -> u16 {
        self.titles_in(title_set)
            .map(|t| t.chapter_count)
            .max()
            .unwrap_or(0)
    }

    pub fn main_title_set(&self) -> u8 {
        self.main_title_set
    }

    pub(crate) fn set_main_title_set(&mut self, title_set: u8) {
        if self.features(title_set).is_some() {
            self.main_title_set = title_set;
        } else {
            log::warn!("Ignoring invalid main title set {}", title_set);
        }
    }

    /// The title of the main title set with the most chapters. The first
    /// one wins a tie.
    pub fn main_title(&self) -> Option<&TitleRecord> {
        let mut best: Option<&TitleRecord> = None;
        for title in self.titles_in(self.main_title_set) {
            if best.is_none_or(|b| title.chapter_count > b.chapter_count) {
                best = Some(title);
            }
        }
        best
    }
}

/// Declared file sizes of one title set, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSetSizes {
    pub ifo_size: u64,
    /// 0 when the title set has no menu VOB.
    pub menu_size: u64,
    /// Title VOB parts 1..=9; always empty for the video manager.
    pub vob_part_sizes: Vec<u64>,
}

impl TitleSetSizes {
    /// Total title VOB payload.
    pub fn title_vob_size(&self) -> u64 {
        self.vob_part_sizes.iter().sum()
    }
}

/// File sizes of title sets 0..=N.
#[derive(Debug, Clone)]
pub struct TitleSetCatalog {
    sets: Vec<TitleSetSizes>,
}

impl TitleSetCatalog {
    /// Number of real title sets, not counting the video manager.
    pub fn title_set_count(&self) -> u8 {
        (self.sets.len() - 1) as u8
    }

    pub fn get(&self, title_set: u8) -> Option<&TitleSetSizes> {
        self.sets.get(title_set as usize)
    }

    /// Title sets in ascending order, starting with the video manager.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &TitleSetSizes)> {
        self.sets.iter().enumerate().map(|(i, s)| (i as u8, s))
    }
}

/// Build both catalogs from the provider.
///
/// The main title set starts out as title set 1; the orchestrator replaces it
/// with the selector's guess.
pub fn build_catalogs(
    disc: &mut dyn DiscStructure,
) -> Result<(TitleCatalog, TitleSetCatalog), MirrorError> {
    let vmg = disc
        .video_manager()
        .map_err(|e| MirrorError::structure(format!("cannot read the video manager: {}", e)))?;

    let title_set_count = vmg.title_set_count();
    if title_set_count == 0 {
        return Err(MirrorError::structure("the disc declares no title sets"));
    }

    let features: Vec<TitleSetFeatures> = vmg
        .title_sets
        .iter()
        .take(title_set_count as usize)
        .map(TitleSetFeatures::from_attributes)
        .collect();

    // Titles keep their position so disc title numbers stay valid. One that
    // points outside 1..=N gets empty attributes and is never ranked; only
    // the chapter operations reject it.
    let titles: Vec<TitleRecord> = vmg
        .titles
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let id = (i + 1) as u16;
            let ts = entry
                .title_set
                .checked_sub(1)
                .and_then(|index| features.get(index as usize))
                .copied()
                .unwrap_or_else(|| {
                    log::warn!(
                        "Title {} refers to title set {}, the disc has {}",
                        id,
                        entry.title_set,
                        title_set_count
                    );
                    TitleSetFeatures::unattributed()
                });
            TitleRecord {
                id,
                title_set: entry.title_set,
                title_set_local_id: entry.vts_title,
                chapter_count: entry.chapters,
                angle_count: entry.angles,
                audio_track_count: ts.audio_track_count,
                max_audio_channels: ts.max_audio_channels,
                subpicture_count: ts.subpicture_count,
                aspect_ratio: ts.aspect_ratio,
            }
        })
        .collect();

    let sets = (0..=title_set_count)
        .map(|ts| stat_title_set(disc, ts))
        .collect::<Result<Vec<TitleSetSizes>, MirrorError>>()?;

    let catalog = TitleCatalog {
        titles,
        title_sets: features,
        main_title_set: 1,
    };
    Ok((catalog, TitleSetCatalog { sets }))
}

fn stat_title_set(disc: &mut dyn DiscStructure, ts: u8) -> Result<TitleSetSizes, MirrorError> {
    let ifo_size = disc
        .stat(ts, Domain::InfoFile)
        .map_err(|e| MirrorError::structure(format!("cannot stat {}: {}", info_file_name(ts, "IFO"), e)))?
        .ok_or_else(|| {
            MirrorError::structure(format!("{} is missing", info_file_name(ts, "IFO")))
        })?
        .size;

    let menu_size = disc
        .stat(ts, Domain::MenuVobs)?
        .map(|s| s.size)
        .unwrap_or(0);

    let vob_part_sizes = if ts == 0 {
        Vec::new()
    } else {
        disc.stat(ts, Domain::TitleVobs)?
            .map(|s| s.parts)
            .unwrap_or_default()
    };

    if vob_part_sizes.len() > MAX_VOB_PARTS as usize {
        return Err(MirrorError::TooManyParts {
            title_set: ts,
            parts: vob_part_sizes.len(),
        });
    }

    log::debug!("File sizes for title set {}", ts);
    log::debug!("IFO: {}, menu VOB: {}", ifo_size, menu_size);
    for (i, size) in vob_part_sizes.iter().enumerate() {
        log::debug!("VOB {} is {}", i + 1, size);
    }

    Ok(TitleSetSizes {
        ifo_size,
        menu_size,
        vob_part_sizes,
    })
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;

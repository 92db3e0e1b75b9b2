//! Mirroring operations.
//!
//! Every operation builds the catalogs, creates the output layout and then
//! copies files in a fixed order: ascending title set, then IFO/BUP, menu VOB
//! and title VOB parts. The first failure stops the operation; files already
//! written are left in place.

use std::path::{Path, PathBuf};

use dvdmirror_core::files::info_file_name;
use dvdmirror_core::{CopyProgress, DiscStructure, Domain, ErrorStrategy, LOGICAL_BLOCK_BYTES};

use crate::catalog::{TitleSetSizes, build_catalogs};
use crate::cells::{SectorIndex, resolve_chapter_cells};
use crate::copier::{
    BlockCopier, CopyPlan, CopyStats, FileSink, MAX_VOB_BLOCKS, OutputTarget, copy_info_file,
};
use crate::error::MirrorError;
use crate::layout::OutputLayout;
use crate::options::MirrorOptions;
use crate::selector::{MainFeatureGuess, select_main_title_set};

/// What a mirroring operation wrote.
#[derive(Debug, Clone, Default)]
pub struct MirrorSummary {
    /// Title sets copied, in order.
    pub title_sets: Vec<u8>,
    /// Every file written, in order.
    pub files: Vec<PathBuf>,
    pub blocks_copied: u64,
    pub blocks_padded: u64,
    pub blocks_unreferenced: u64,
    /// The selector's guess, for operations that ran it.
    pub main_feature: Option<MainFeatureGuess>,
}

impl MirrorSummary {
    fn add_stats(&mut self, stats: &CopyStats) {
        self.blocks_copied += stats.copied;
        self.blocks_padded += stats.padded;
        self.blocks_unreferenced += stats.unreferenced;
    }
}

/// Chapters to copy for [`mirror_chapters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSelection {
    /// Disc title number; `None` picks the main title.
    pub title: Option<u16>,
    /// First chapter, 1-based.
    pub start: u16,
    /// Last chapter, inclusive; `None` is the title's last chapter. Clamped
    /// to the title's chapter count.
    pub end: Option<u16>,
}

impl ChapterSelection {
    pub fn new(title: Option<u16>, start: u16, end: Option<u16>) -> Self {
        Self { title, start, end }
    }

    /// Every chapter of `title`.
    pub fn whole_title(title: u16) -> Self {
        Self::new(Some(title), 1, None)
    }
}

struct Session<'a> {
    disc: &'a mut dyn DiscStructure,
    layout: OutputLayout,
    options: &'a MirrorOptions,
    progress: &'a dyn Fn(CopyProgress),
    copier: BlockCopier,
    summary: MirrorSummary,
}

impl<'a> Session<'a> {
    fn new(
        disc: &'a mut dyn DiscStructure,
        target: &Path,
        title_name: &str,
        options: &'a MirrorOptions,
        progress: &'a dyn Fn(CopyProgress),
    ) -> Result<Self, MirrorError> {
        Ok(Self {
            disc,
            layout: OutputLayout::create(target, title_name)?,
            options,
            progress,
            copier: BlockCopier::new(),
            summary: MirrorSummary::default(),
        })
    }

    fn record(&mut self, paths: &[PathBuf], stats: &CopyStats) {
        self.summary.files.extend_from_slice(paths);
        self.summary.add_stats(stats);
    }

    fn mirror_title_set(&mut self, ts: u8, sizes: &TitleSetSizes) -> Result<(), MirrorError> {
        log::info!("Mirroring title set {}", ts);
        self.copy_info(ts, sizes.ifo_size)?;
        self.copy_menu(ts, sizes.menu_size)?;
        self.copy_title_vobs(ts, &sizes.vob_part_sizes)?;
        self.summary.title_sets.push(ts);
        Ok(())
    }

    fn copy_info(&mut self, ts: u8, size: u64) -> Result<(), MirrorError> {
        if size == 0 {
            log::warn!("{} is empty, skipping", info_file_name(ts, "IFO"));
            return Ok(());
        }
        if size % LOGICAL_BLOCK_BYTES != 0 {
            return Err(MirrorError::size_mismatch(info_file_name(ts, "IFO"), size));
        }
        let ifo = self.layout.ifo_path(ts);
        let bup = self.layout.bup_path(ts);
        copy_info_file(&mut *self.disc, ts, &ifo, &bup)?;
        self.summary.files.push(ifo);
        self.summary.files.push(bup);
        Ok(())
    }

    fn copy_menu(&mut self, ts: u8, size: u64) -> Result<(), MirrorError> {
        if size == 0 {
            return Ok(());
        }
        let path = self.layout.menu_vob_path(ts);
        if size % LOGICAL_BLOCK_BYTES != 0 {
            log::warn!(
                "Size of {} is not a multiple of 2048 ({} bytes), copying whole blocks only",
                path.display(),
                size
            );
        }
        let blocks = block_count(size)?;
        let plan = CopyPlan::contiguous("menu", 0, blocks);

        let mut source = self.disc.open_stream(ts, Domain::MenuVobs)?;
        let mut sink = FileSink::create(OutputTarget::Single(path))?;
        let stats = self.copier.copy(
            &mut *source,
            &mut sink,
            &plan,
            self.options,
            self.progress,
        )?;
        drop(source);
        self.record(sink.paths(), &stats);
        Ok(())
    }

    fn copy_title_vobs(&mut self, ts: u8, parts: &[u64]) -> Result<(), MirrorError> {
        if ts == 0 || parts.is_empty() {
            return Ok(());
        }
        let index = self.sector_index(ts);
        let total = parts.len();

        let mut source = self.disc.open_stream(ts, Domain::TitleVobs)?;
        let mut offset = 0u32;
        for (i, &size) in parts.iter().enumerate() {
            let part = (i + 1) as u8;
            let path = self.layout.title_vob_path(ts, part);
            if size % LOGICAL_BLOCK_BYTES != 0 {
                return Err(MirrorError::size_mismatch(path.display().to_string(), size));
            }
            let blocks = block_count(size)?;
            if blocks == 0 {
                log::warn!("{} is empty, skipping", path.display());
                continue;
            }

            let plan = CopyPlan::contiguous(format!("Title, part {}/{}", part, total), offset, blocks)
                .with_index(index.as_ref());
            let mut sink = FileSink::create(OutputTarget::Single(path))?;
            let stats = self.copier.copy(
                &mut *source,
                &mut sink,
                &plan,
                self.options,
                self.progress,
            )?;
            self.summary.files.extend_from_slice(sink.paths());
            self.summary.add_stats(&stats);

            offset = offset
                .checked_add(blocks)
                .ok_or_else(|| MirrorError::structure("title VOB stream exceeds 2^32 blocks"))?;
        }
        Ok(())
    }

    /// Used-sector index of the title set, only built for `SkipUnreferenced`.
    fn sector_index(&mut self, ts: u8) -> Option<SectorIndex> {
        if self.options.strategy != ErrorStrategy::SkipUnreferenced {
            return None;
        }
        match self.disc.title_set_navigation(ts) {
            Ok(nav) => Some(SectorIndex::from_navigation(&nav)),
            Err(e) => {
                log::warn!(
                    "Cannot read the cells of title set {} ({}); unreadable blocks will be padded",
                    ts,
                    e
                );
                None
            }
        }
    }
}

fn block_count(size: u64) -> Result<u32, MirrorError> {
    u32::try_from(size / LOGICAL_BLOCK_BYTES)
        .map_err(|_| MirrorError::structure(format!("stream of {} bytes is too large", size)))
}

/// Mirror every title set, starting with the video manager.
///
/// Stops at the first title set that fails and reports which one.
pub fn mirror_disc(
    disc: &mut dyn DiscStructure,
    target: &Path,
    title_name: &str,
    options: &MirrorOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<MirrorSummary, MirrorError> {
    let (_, sizes) = build_catalogs(disc)?;
    let mut session = Session::new(disc, target, title_name, options, progress)?;

    for (ts, set) in sizes.iter() {
        session.mirror_title_set(ts, set).map_err(|e| {
            log::error!("Mirror of title set {} failed: {}", ts, e);
            MirrorError::TitleSetFailed {
                title_set: ts,
                source: Box::new(e),
            }
        })?;
    }
    Ok(session.summary)
}

/// Mirror title set `title_set`; 0 is the video manager.
pub fn mirror_title_set(
    disc: &mut dyn DiscStructure,
    target: &Path,
    title_name: &str,
    title_set: u8,
    options: &MirrorOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<MirrorSummary, MirrorError> {
    let (_, sizes) = build_catalogs(disc)?;
    let set = match sizes.get(title_set) {
        Some(set) => set.clone(),
        None => {
            return Err(MirrorError::InvalidTitleSet {
                requested: title_set,
                available: sizes.title_set_count(),
            });
        }
    };

    let mut session = Session::new(disc, target, title_name, options, progress)?;
    session.mirror_title_set(title_set, &set)?;
    Ok(session.summary)
}

/// Guess the main feature's title set and mirror it.
pub fn mirror_main_feature(
    disc: &mut dyn DiscStructure,
    target: &Path,
    title_name: &str,
    options: &MirrorOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<MirrorSummary, MirrorError> {
    let (titles, sizes) = build_catalogs(disc)?;
    let guess = select_main_title_set(&titles, &sizes, options.preferred_aspect);
    log::info!(
        "Main feature is title set {} ({}, {})",
        guess.title_set,
        guess.classification,
        guess.accepted_by
    );
    let set = sizes
        .get(guess.title_set)
        .cloned()
        .ok_or_else(|| MirrorError::structure("main feature title set has no sizes"))?;

    let mut session = Session::new(disc, target, title_name, options, progress)?;
    session.summary.main_feature = Some(guess);
    session.mirror_title_set(guess.title_set, &set)?;
    Ok(session.summary)
}

/// Copy a chapter range of one title into `VTS_nn_1.VOB` and following
/// parts, split at 1 GiB.
pub fn mirror_chapters(
    disc: &mut dyn DiscStructure,
    target: &Path,
    title_name: &str,
    selection: ChapterSelection,
    options: &MirrorOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<MirrorSummary, MirrorError> {
    let (mut titles, sizes) = build_catalogs(disc)?;
    let guess = select_main_title_set(&titles, &sizes, options.preferred_aspect);
    titles.set_main_title_set(guess.title_set);

    let title = match selection.title {
        Some(id) => titles.title(id).cloned().ok_or(MirrorError::InvalidTitle {
            requested: id,
            available: titles.title_count(),
        })?,
        None => titles.main_title().cloned().ok_or_else(|| {
            MirrorError::structure(format!("title set {} has no titles", guess.title_set))
        })?,
    };
    if title.title_set == 0 {
        return Err(MirrorError::VideoManagerDomain);
    }
    let ts = title.title_set;
    if titles.features(ts).is_none() {
        return Err(MirrorError::InvalidTitleSet {
            requested: ts,
            available: sizes.title_set_count(),
        });
    }

    let nav = disc.title_set_navigation(ts).map_err(|e| {
        MirrorError::structure(format!("cannot read title set {} tables: {}", ts, e))
    })?;
    let end = selection.end.unwrap_or(title.chapter_count);
    let ranges = resolve_chapter_cells(&nav, &title, selection.start, end)?;
    let index = (options.strategy == ErrorStrategy::SkipUnreferenced)
        .then(|| SectorIndex::from_navigation(&nav));

    let mut session = Session::new(disc, target, title_name, options, progress)?;
    if selection.title.is_none() {
        session.summary.main_feature = Some(guess);
    }
    session.layout.remove_title_vobs(ts)?;

    log::info!(
        "Copying title {} chapters {}-{} from title set {}",
        title.id,
        selection.start,
        end.min(title.chapter_count),
        ts
    );
    let plan = CopyPlan {
        label: format!("Title {}", title.id),
        ranges,
        index: index.as_ref(),
    };
    let mut source = session.disc.open_stream(ts, Domain::TitleVobs)?;
    let mut sink = FileSink::create(OutputTarget::Parts {
        title_set: ts,
        paths: session.layout.title_vob_parts(ts),
        max_blocks: MAX_VOB_BLOCKS,
    })?;
    let stats = session.copier.copy(
        &mut *source,
        &mut sink,
        &plan,
        session.options,
        session.progress,
    )?;
    drop(source);

    session.record(sink.paths(), &stats);
    session.summary.title_sets.push(ts);
    Ok(session.summary)
}

/// Copy every chapter of `title`.
pub fn mirror_title(
    disc: &mut dyn DiscStructure,
    target: &Path,
    title_name: &str,
    title: u16,
    options: &MirrorOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<MirrorSummary, MirrorError> {
    mirror_chapters(
        disc,
        target,
        title_name,
        ChapterSelection::whole_title(title),
        options,
        progress,
    )
}

#[cfg(test)]
#[path = "tests/mirror_tests.rs"]
mod tests;

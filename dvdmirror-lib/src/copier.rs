//! Block copy engine.
//!
//! Streams sector ranges from a [`BlockSource`] into one or more output
//! files through a single reusable transfer buffer. Unreadable blocks are
//! handled per [`ErrorStrategy`], so the output keeps the exact block layout
//! of the source even when sectors are lost.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use dvdmirror_core::{
    BlockSource, CopyProgress, DiscStructure, ErrorStrategy, GapFill, LOGICAL_BLOCK_BYTES,
    LOGICAL_BLOCK_SIZE,
};

use crate::cells::{SectorIndex, SectorRange, Span};
use crate::error::MirrorError;
use crate::options::MirrorOptions;

/// Blocks per transfer: 1 MiB.
pub const BUFFER_BLOCKS: u32 = 512;

/// Blocks per title VOB part: 1 GiB.
pub const MAX_VOB_BLOCKS: u64 = 524_288;

/// MPEG-2 pack header followed by the start of a padding stream. Written at
/// the start of each unreferenced block so players see a valid pack.
pub const STUFFING_PACK_HEADER: [u8; 20] = [
    0x00, 0x00, 0x01, 0xBA, 0x44, 0x00, 0x04, 0x00, 0x04, 0x01, 0x01, 0x89, 0xC3, 0xF8, 0x00,
    0x00, 0x01, 0xBE, 0x07, 0xEC,
];

const BUFFER_BYTES: usize = BUFFER_BLOCKS as usize * LOGICAL_BLOCK_SIZE;

// ---------------------------------------------------------------------------
// Output side
// ---------------------------------------------------------------------------

/// Where copied blocks go.
pub trait BlockSink {
    /// Name of the file currently written, for messages.
    fn name(&self) -> String;

    /// Blocks that still fit in the current file, `None` when unbounded.
    fn room(&self) -> Option<u64>;

    /// Close the current file and continue with the next numbered part.
    fn next_part(&mut self) -> Result<(), MirrorError>;

    fn write_blocks(&mut self, data: &[u8]) -> Result<(), MirrorError>;

    /// Advance over `count` blocks without writing them.
    fn skip_blocks(&mut self, count: u32) -> Result<(), MirrorError>;

    fn finish(&mut self) -> Result<(), MirrorError>;
}

/// Output files of one copy.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// One file without a size limit.
    Single(PathBuf),
    /// Numbered title VOB parts, each holding at most `max_blocks` blocks.
    Parts {
        title_set: u8,
        paths: Vec<PathBuf>,
        max_blocks: u64,
    },
}

impl OutputTarget {
    fn path(&self, index: usize) -> Option<&PathBuf> {
        match self {
            Self::Single(path) if index == 0 => Some(path),
            Self::Single(_) => None,
            Self::Parts { paths, .. } => paths.get(index),
        }
    }
}

/// Check an output path before writing. An existing regular file will be
/// overwritten; anything else at the path is an error.
pub fn prepare_destination(path: &Path) -> Result<(), MirrorError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            log::warn!("{} exists; will try to overwrite it", path.display());
            Ok(())
        }
        Ok(_) => Err(MirrorError::io(
            path,
            io::Error::other("not a regular file, it may be a directory"),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MirrorError::io(path, e)),
    }
}

fn create_output(path: &Path) -> Result<File, MirrorError> {
    prepare_destination(path)?;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| MirrorError::io(path, e))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Writes blocks to files on disk.
pub struct FileSink {
    target: OutputTarget,
    part: usize,
    path: PathBuf,
    file: File,
    /// Blocks in the current file, written or skipped.
    blocks: u64,
    /// A seek left the file shorter than `blocks`.
    needs_extend: bool,
    written_paths: Vec<PathBuf>,
}

impl FileSink {
    pub fn create(target: OutputTarget) -> Result<Self, MirrorError> {
        let path = target
            .path(0)
            .cloned()
            .ok_or_else(|| MirrorError::structure("output target has no files"))?;
        let file = create_output(&path)?;
        Ok(Self {
            target,
            part: 0,
            written_paths: vec![path.clone()],
            path,
            file,
            blocks: 0,
            needs_extend: false,
        })
    }

    /// Every file this sink created, in order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.written_paths
    }

    fn close_current(&mut self) -> Result<(), MirrorError> {
        if self.needs_extend {
            self.file
                .set_len(self.blocks * LOGICAL_BLOCK_BYTES)
                .map_err(|e| MirrorError::io(&self.path, e))?;
            self.needs_extend = false;
        }
        self.file
            .flush()
            .map_err(|e| MirrorError::io(&self.path, e))
    }
}

impl BlockSink for FileSink {
    fn name(&self) -> String {
        display_name(&self.path)
    }

    fn room(&self) -> Option<u64> {
        match &self.target {
            OutputTarget::Single(_) => None,
            OutputTarget::Parts { max_blocks, .. } => Some(max_blocks.saturating_sub(self.blocks)),
        }
    }

    fn next_part(&mut self) -> Result<(), MirrorError> {
        self.close_current()?;
        let next = self.part + 1;
        let path = self.target.path(next).cloned().ok_or_else(|| match &self.target {
            OutputTarget::Parts {
                title_set, paths, ..
            } => MirrorError::TooManyParts {
                title_set: *title_set,
                parts: paths.len() + 1,
            },
            OutputTarget::Single(path) => MirrorError::io(
                path,
                io::Error::other("single file output cannot be split"),
            ),
        })?;
        log::debug!("Continuing in {}", path.display());
        self.file = create_output(&path)?;
        self.written_paths.push(path.clone());
        self.path = path;
        self.part = next;
        self.blocks = 0;
        Ok(())
    }

    fn write_blocks(&mut self, data: &[u8]) -> Result<(), MirrorError> {
        self.file
            .write_all(data)
            .map_err(|e| MirrorError::io(&self.path, e))?;
        self.blocks += (data.len() / LOGICAL_BLOCK_SIZE) as u64;
        self.needs_extend = false;
        Ok(())
    }

    fn skip_blocks(&mut self, count: u32) -> Result<(), MirrorError> {
        self.file
            .seek(SeekFrom::Current(count as i64 * LOGICAL_BLOCK_BYTES as i64))
            .map_err(|e| MirrorError::io(&self.path, e))?;
        self.blocks += count as u64;
        self.needs_extend = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), MirrorError> {
        self.close_current()
    }
}

// ---------------------------------------------------------------------------
// Copy engine
// ---------------------------------------------------------------------------

/// Sector ranges streamed into one output artifact.
#[derive(Debug, Clone)]
pub struct CopyPlan<'a> {
    /// Short label for progress, e.g. "menu" or "Title, part 2/4".
    pub label: String,
    /// Ascending, disjoint ranges.
    pub ranges: Vec<SectorRange>,
    /// Used-sector index of the title set, for `SkipUnreferenced`.
    pub index: Option<&'a SectorIndex>,
}

impl<'a> CopyPlan<'a> {
    /// A plan for `blocks` consecutive blocks starting at `offset`.
    pub fn contiguous(label: impl Into<String>, offset: u32, blocks: u32) -> Self {
        let ranges = if blocks == 0 {
            Vec::new()
        } else {
            vec![SectorRange::new(offset, offset + (blocks - 1))]
        };
        Self {
            label: label.into(),
            ranges,
            index: None,
        }
    }

    pub fn with_index(mut self, index: Option<&'a SectorIndex>) -> Self {
        self.index = index;
        self
    }

    pub fn total_blocks(&self) -> u64 {
        self.ranges.iter().map(SectorRange::blocks).sum()
    }
}

/// Block counts of a finished copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Blocks read from the disc and written.
    pub copied: u64,
    /// Unreadable blocks replaced with zeros.
    pub padded: u64,
    /// Unreferenced blocks filled with stuffing packs or seeked over.
    pub unreferenced: u64,
}

impl CopyStats {
    pub fn add(&mut self, other: &CopyStats) {
        self.copied += other.copied;
        self.padded += other.padded;
        self.unreferenced += other.unreferenced;
    }
}

/// Copies plans block by block. Owns the transfer buffer, the zero buffer
/// and the stuffing buffer, all reused across copies.
pub struct BlockCopier {
    buffer: Vec<u8>,
    zeros: Vec<u8>,
    stuffing: Vec<u8>,
}

impl Default for BlockCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCopier {
    pub fn new() -> Self {
        let mut stuffing = vec![0u8; BUFFER_BYTES];
        for block in stuffing.chunks_mut(LOGICAL_BLOCK_SIZE) {
            block[..STUFFING_PACK_HEADER.len()].copy_from_slice(&STUFFING_PACK_HEADER);
        }
        Self {
            buffer: vec![0u8; BUFFER_BYTES],
            zeros: vec![0u8; BUFFER_BYTES],
            stuffing,
        }
    }

    /// Copy every range of `plan` from `source` into `sink`.
    pub fn copy(
        &mut self,
        source: &mut dyn BlockSource,
        sink: &mut dyn BlockSink,
        plan: &CopyPlan<'_>,
        options: &MirrorOptions,
        progress: &dyn Fn(CopyProgress),
    ) -> Result<CopyStats, MirrorError> {
        let total = plan.total_blocks();
        let file = sink.name();
        progress(CopyProgress::started(&file, &plan.label, total));

        let index = match (options.strategy, plan.index) {
            (ErrorStrategy::SkipUnreferenced, Some(index)) => Some(index),
            (ErrorStrategy::SkipUnreferenced, None) => {
                log::debug!("No cell index for {}, unreadable blocks are padded", file);
                None
            }
            _ => None,
        };

        let mut stats = CopyStats::default();
        let mut done = 0u64;
        let mut reported = 0u64;

        for range in &plan.ranges {
            let mut offset = range.first;
            let mut remaining = range.blocks();

            while remaining > 0 {
                if sink.room() == Some(0) {
                    sink.next_part()?;
                }
                let room = sink.room().unwrap_or(u64::MAX);
                let mut to_read = (BUFFER_BLOCKS as u64).min(remaining).min(room) as u32;

                if let Some(index) = index {
                    match index.classify(offset) {
                        Span::Referenced(n) => to_read = to_read.min(n),
                        Span::Unreferenced(n) => {
                            let gap = to_read.min(n);
                            self.fill_gap(sink, gap, options.gap_fill)?;
                            progress(CopyProgress::Padded {
                                file: sink.name(),
                                block: offset,
                                count: gap,
                            });
                            offset += gap;
                            remaining -= gap as u64;
                            done += gap as u64;
                            stats.unreferenced += gap as u64;
                            report_advance(progress, options, done, total, &mut reported);
                            continue;
                        }
                        Span::Beyond => {}
                    }
                }

                let bytes = to_read as usize * LOGICAL_BLOCK_SIZE;
                let read = match source.read_blocks(offset, to_read, &mut self.buffer[..bytes]) {
                    Ok(n) => n.min(to_read),
                    Err(e) => {
                        log::debug!("Read of {} blocks at {} failed: {}", to_read, offset, e);
                        0
                    }
                };

                if read > 0 {
                    sink.write_blocks(&self.buffer[..read as usize * LOGICAL_BLOCK_SIZE])?;
                    offset += read;
                    remaining -= read as u64;
                    done += read as u64;
                    stats.copied += read as u64;
                }

                if read < to_read {
                    log::error!("Error reading {} at block {}", sink.name(), offset);
                    let pad = match options.strategy {
                        ErrorStrategy::Abort => {
                            log::error!("Aborting");
                            return Err(MirrorError::Read {
                                file: sink.name(),
                                block: offset,
                            });
                        }
                        ErrorStrategy::SkipOneBlock => {
                            log::warn!("Padding single block");
                            1
                        }
                        ErrorStrategy::SkipRun => {
                            log::warn!("Padding {} blocks", to_read - read);
                            to_read - read
                        }
                        ErrorStrategy::SkipUnreferenced => {
                            log::warn!(
                                "Bad block in a used range, padding {} blocks",
                                to_read - read
                            );
                            to_read - read
                        }
                    };
                    sink.write_blocks(&self.zeros[..pad as usize * LOGICAL_BLOCK_SIZE])?;
                    progress(CopyProgress::Padded {
                        file: sink.name(),
                        block: offset,
                        count: pad,
                    });
                    offset += pad;
                    remaining -= pad as u64;
                    done += pad as u64;
                    stats.padded += pad as u64;
                }

                report_advance(progress, options, done, total, &mut reported);
            }
        }

        sink.finish()?;
        progress(CopyProgress::Finished { file: file.clone() });
        if stats.padded == 0 {
            log::info!("Success writing {}", file);
        } else {
            log::warn!("Wrote {} with {} padded blocks", file, stats.padded);
        }
        Ok(stats)
    }

    fn fill_gap(
        &self,
        sink: &mut dyn BlockSink,
        count: u32,
        gap_fill: GapFill,
    ) -> Result<(), MirrorError> {
        match gap_fill {
            GapFill::Stuffing => {
                log::debug!("Writing {} stuffing blocks", count);
                sink.write_blocks(&self.stuffing[..count as usize * LOGICAL_BLOCK_SIZE])
            }
            GapFill::Seek => {
                log::debug!("Seeking over {} unreferenced blocks", count);
                sink.skip_blocks(count)
            }
        }
    }
}

/// Send `Advanced` when `done` crosses into a new buffer-sized bucket or
/// reaches `total`.
fn report_advance(
    progress: &dyn Fn(CopyProgress),
    options: &MirrorOptions,
    done: u64,
    total: u64,
    reported: &mut u64,
) {
    if !options.progress {
        return;
    }
    let bucket = done / BUFFER_BLOCKS as u64;
    if bucket > *reported || done == total {
        *reported = bucket;
        progress(CopyProgress::advanced(done, total));
    }
}

// ---------------------------------------------------------------------------
// Whole-file copies
// ---------------------------------------------------------------------------

/// Copy a title set's info file byte for byte to both its IFO and BUP
/// destinations. Returns the number of bytes written to each.
pub fn copy_info_file(
    disc: &mut dyn DiscStructure,
    title_set: u8,
    ifo_path: &Path,
    bup_path: &Path,
) -> Result<u64, MirrorError> {
    prepare_destination(ifo_path)?;
    prepare_destination(bup_path)?;

    let len = disc.info_file_len(title_set)?;
    let size = usize::try_from(len)
        .map_err(|_| MirrorError::size_mismatch(display_name(ifo_path), len))?;
    let mut buffer = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        let n = disc.read_info_bytes(title_set, filled as u64, &mut buffer[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled != size {
        log::error!(
            "Error reading IFO for title set {}: {} of {} bytes",
            title_set,
            filled,
            size
        );
        return Err(MirrorError::Read {
            file: display_name(ifo_path),
            block: (filled / LOGICAL_BLOCK_SIZE) as u32,
        });
    }

    for path in [ifo_path, bup_path] {
        fs::write(path, &buffer).map_err(|e| MirrorError::io(path, e))?;
    }
    log::info!("Success writing {}", display_name(ifo_path));
    Ok(len)
}

#[cfg(test)]
#[path = "tests/copier_tests.rs"]
mod tests;

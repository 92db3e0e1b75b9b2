//! `VIDEO_TS` folder provider.
//!
//! Serves a mounted disc or a previously copied tree: IFO files are read
//! whole and parsed with [`crate::ifo`], VOB files are exposed as block
//! streams. File names are matched case-insensitively since mounted discs
//! report them in whatever case the filesystem driver picked.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use dvdmirror_core::files::{
    MAX_VOB_PARTS, VIDEO_TS_DIR, info_file_name, menu_file_name, title_part_file_name,
};
use dvdmirror_core::{
    BlockSource, DiscError, DiscStructure, Domain, LOGICAL_BLOCK_BYTES, LOGICAL_BLOCK_SIZE,
    StreamStat, TitleSetNavigation, VideoManagerInfo,
};

use crate::ifo;

/// A DVD-Video structure backed by a `VIDEO_TS` directory.
pub struct FolderDisc {
    video_ts: PathBuf,
    /// Upper-cased file name to actual path.
    files: HashMap<String, PathBuf>,
    ifo_cache: HashMap<u8, Vec<u8>>,
    label: Option<String>,
}

impl FolderDisc {
    /// Open a `VIDEO_TS` directory, its parent, or a directory that directly
    /// holds `VIDEO_TS.IFO`.
    pub fn open(path: &Path) -> Result<Self, DiscError> {
        let video_ts = locate_video_ts(path)?;

        let mut files = HashMap::new();
        for entry in fs::read_dir(&video_ts)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.insert(name.to_ascii_uppercase(), path.clone());
            }
        }

        if !files.contains_key("VIDEO_TS.IFO") && !files.contains_key("VIDEO_TS.BUP") {
            return Err(DiscError::not_found(format!(
                "no VIDEO_TS.IFO in {}",
                video_ts.display()
            )));
        }

        log::debug!(
            "Opened {} ({} files)",
            video_ts.display(),
            files.len()
        );

        Ok(Self {
            video_ts,
            files,
            ifo_cache: HashMap::new(),
            label: None,
        })
    }

    /// Attach a volume label read from the disc device or image.
    pub fn with_volume_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn video_ts_dir(&self) -> &Path {
        &self.video_ts
    }

    /// Name of the directory holding `VIDEO_TS`, used as a title name when
    /// no volume label is available.
    pub fn folder_name(&self) -> Option<String> {
        let is_video_ts = self
            .video_ts
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(VIDEO_TS_DIR));
        let named = if is_video_ts {
            self.video_ts.parent()?
        } else {
            self.video_ts.as_path()
        };
        named
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }

    fn lookup(&self, name: &str) -> Option<&PathBuf> {
        self.files.get(name)
    }

    /// Path of the info file, falling back to the backup copy when the
    /// primary is missing.
    fn info_path(&self, title_set: u8) -> Option<PathBuf> {
        if let Some(path) = self.lookup(&info_file_name(title_set, "IFO")) {
            return Some(path.clone());
        }
        let backup = self.lookup(&info_file_name(title_set, "BUP"))?;
        log::warn!(
            "{} is missing, using {}",
            info_file_name(title_set, "IFO"),
            info_file_name(title_set, "BUP")
        );
        Some(backup.clone())
    }

    fn load_info(&mut self, title_set: u8) -> Result<&[u8], DiscError> {
        let path = self.info_path(title_set).ok_or_else(|| {
            DiscError::not_found(format!("{} not found", info_file_name(title_set, "IFO")))
        })?;
        let data = match self.ifo_cache.entry(title_set) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                log::trace!("Reading {}", path.display());
                e.insert(fs::read(&path)?)
            }
        };
        Ok(data.as_slice())
    }

    /// Consecutive title VOB parts starting at part 1.
    fn title_parts(&self, title_set: u8) -> Vec<PathBuf> {
        let mut parts = Vec::new();
        for part in 1..=MAX_VOB_PARTS {
            match self.lookup(&title_part_file_name(title_set, part)) {
                Some(path) => parts.push(path.clone()),
                None => break,
            }
        }
        let next = parts.len() as u8 + 1;
        if (next..=MAX_VOB_PARTS)
            .any(|p| self.lookup(&title_part_file_name(title_set, p)).is_some())
        {
            log::warn!(
                "{} is missing, later parts of title set {} are ignored",
                title_part_file_name(title_set, next),
                title_set
            );
        }
        parts
    }
}

fn file_len(path: &Path) -> Result<u64, DiscError> {
    Ok(fs::metadata(path)?.len())
}

fn locate_video_ts(path: &Path) -> Result<PathBuf, DiscError> {
    if !path.is_dir() {
        return Err(DiscError::not_found(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    let is_video_ts = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case(VIDEO_TS_DIR));
    if is_video_ts {
        return Ok(path.to_path_buf());
    }

    let mut holds_ifo = false;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.eq_ignore_ascii_case(VIDEO_TS_DIR) && child.is_dir() {
            return Ok(child);
        }
        if name.eq_ignore_ascii_case("VIDEO_TS.IFO") {
            holds_ifo = true;
        }
    }

    if holds_ifo {
        return Ok(path.to_path_buf());
    }

    Err(DiscError::not_found(format!(
        "no VIDEO_TS directory in {}",
        path.display()
    )))
}

impl DiscStructure for FolderDisc {
    fn video_manager(&mut self) -> Result<VideoManagerInfo, DiscError> {
        ifo::parse_video_manager(self.load_info(0)?)
    }

    fn title_set_navigation(&mut self, title_set: u8) -> Result<TitleSetNavigation, DiscError> {
        if title_set == 0 {
            return Err(DiscError::unsupported(
                "the video manager has no title navigation tables",
            ));
        }
        let name = info_file_name(title_set, "IFO");
        ifo::parse_title_set(self.load_info(title_set)?, &name)
    }

    fn stat(&mut self, title_set: u8, domain: Domain) -> Result<Option<StreamStat>, DiscError> {
        match domain {
            Domain::InfoFile => match self.info_path(title_set) {
                Some(path) => Ok(Some(StreamStat::single(file_len(&path)?))),
                None => Ok(None),
            },
            Domain::MenuVobs => match self.lookup(&menu_file_name(title_set)) {
                Some(path) => Ok(Some(StreamStat::single(file_len(path)?))),
                None => Ok(None),
            },
            Domain::TitleVobs => {
                if title_set == 0 {
                    return Ok(None);
                }
                let parts = self.title_parts(title_set);
                if parts.is_empty() {
                    return Ok(None);
                }
                let sizes = parts
                    .iter()
                    .map(|p| file_len(p))
                    .collect::<Result<Vec<u64>, DiscError>>()?;
                Ok(Some(StreamStat::from_parts(sizes)))
            }
        }
    }

    fn open_stream(
        &mut self,
        title_set: u8,
        domain: Domain,
    ) -> Result<Box<dyn BlockSource + '_>, DiscError> {
        let paths = match domain {
            Domain::InfoFile => {
                return Err(DiscError::unsupported(
                    "info files are read with read_info_bytes",
                ));
            }
            Domain::MenuVobs => {
                let name = menu_file_name(title_set);
                let path = self
                    .lookup(&name)
                    .ok_or_else(|| DiscError::not_found(format!("{} not found", name)))?;
                vec![path.clone()]
            }
            Domain::TitleVobs => {
                if title_set == 0 {
                    return Err(DiscError::unsupported(
                        "the video manager has no title VOBs",
                    ));
                }
                let parts = self.title_parts(title_set);
                if parts.is_empty() {
                    return Err(DiscError::not_found(format!(
                        "{} not found",
                        title_part_file_name(title_set, 1)
                    )));
                }
                parts
            }
        };
        Ok(Box::new(MultiPartSource::open(&paths)?))
    }

    fn info_file_len(&mut self, title_set: u8) -> Result<u64, DiscError> {
        Ok(self.load_info(title_set)?.len() as u64)
    }

    fn read_info_bytes(
        &mut self,
        title_set: u8,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, DiscError> {
        let data = self.load_info(title_set)?;
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= data.len() {
            return Ok(0);
        }
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    fn volume_label(&mut self) -> Option<String> {
        self.label.clone()
    }
}

// ---------------------------------------------------------------------------
// Multi-part block source
// ---------------------------------------------------------------------------

struct PartFile {
    file: File,
    first_block: u32,
    blocks: u32,
}

/// Several VOB files addressed as one contiguous block stream.
///
/// Trailing bytes that do not fill a whole block are not addressable.
pub struct MultiPartSource {
    parts: Vec<PartFile>,
}

impl MultiPartSource {
    pub fn open(paths: &[PathBuf]) -> io::Result<Self> {
        let mut parts = Vec::with_capacity(paths.len());
        let mut first_block = 0u32;
        for path in paths {
            let file = File::open(path)?;
            let blocks = u32::try_from(file.metadata()?.len() / LOGICAL_BLOCK_BYTES)
                .unwrap_or(u32::MAX);
            parts.push(PartFile {
                file,
                first_block,
                blocks,
            });
            first_block = first_block.saturating_add(blocks);
        }
        Ok(Self { parts })
    }

    pub fn total_blocks(&self) -> u64 {
        self.parts.iter().map(|p| p.blocks as u64).sum()
    }
}

/// Fill `buf` from the current position, stopping early only at end of file.
fn read_full(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl BlockSource for MultiPartSource {
    fn read_blocks(&mut self, offset: u32, count: u32, buf: &mut [u8]) -> io::Result<u32> {
        let mut done = 0u32;
        while done < count {
            let block = offset.saturating_add(done);
            let Some(part) = self
                .parts
                .iter_mut()
                .find(|p| block >= p.first_block && block - p.first_block < p.blocks)
            else {
                break;
            };

            let in_part = block - part.first_block;
            let n = (count - done).min(part.blocks - in_part);
            let start = done as usize * LOGICAL_BLOCK_SIZE;
            let end = start + n as usize * LOGICAL_BLOCK_SIZE;

            let result = part
                .file
                .seek(SeekFrom::Start(in_part as u64 * LOGICAL_BLOCK_BYTES))
                .and_then(|_| read_full(&mut part.file, &mut buf[start..end]));
            match result {
                Ok(bytes) => {
                    let blocks = (bytes / LOGICAL_BLOCK_SIZE) as u32;
                    done += blocks;
                    if blocks < n {
                        break;
                    }
                }
                Err(e) if done == 0 => return Err(e),
                Err(e) => {
                    log::trace!("Read stopped at block {}: {}", block, e);
                    break;
                }
            }
        }
        log::trace!("Read {}/{} blocks at {}", done, count, offset);
        Ok(done)
    }
}

#[cfg(test)]
#[path = "tests/folder_tests.rs"]
mod tests;

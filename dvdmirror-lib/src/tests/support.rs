//! In-memory disc for the mirroring tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use dvdmirror_core::{
    AspectRatio, BlockSource, CellPlayback, DiscError, DiscStructure, Domain, LOGICAL_BLOCK_BYTES,
    LOGICAL_BLOCK_SIZE, PartOfTitle, ProgramChain, StreamStat, TitleEntry, TitleSetAttributes,
    TitleSetNavigation, VideoManagerInfo,
};

/// Byte every position of `block` holds in the given stream.
pub fn block_pattern(title_set: u8, domain: Domain, block: u32) -> u8 {
    let base = ((block % 251) as u8).wrapping_add(title_set.wrapping_mul(37));
    match domain {
        Domain::MenuVobs => base.wrapping_add(101),
        _ => base,
    }
}

/// Byte at `pos` of a title set's info file.
pub fn info_pattern(title_set: u8, pos: u64) -> u8 {
    (pos % 253) as u8 ^ title_set
}

/// A read issued against a stream: `(title_set, domain, offset, count)`.
pub type ReadLog = Rc<RefCell<Vec<(u8, Domain, u32, u32)>>>;

#[derive(Debug, Clone)]
pub struct MemoryTitleSet {
    pub attributes: TitleSetAttributes,
    /// `None` means the info file does not exist.
    pub ifo_size: Option<u64>,
    pub menu_size: u64,
    pub parts: Vec<u64>,
    pub nav: Option<TitleSetNavigation>,
}

impl MemoryTitleSet {
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            attributes: TitleSetAttributes {
                aspect_ratio,
                audio_channels: vec![1],
                subpicture_streams: 1,
            },
            ifo_size: Some(4 * LOGICAL_BLOCK_BYTES),
            menu_size: 0,
            parts: Vec::new(),
            nav: None,
        }
    }

    pub fn audio(mut self, channels: &[u8]) -> Self {
        self.attributes.audio_channels = channels.to_vec();
        self
    }

    pub fn subpictures(mut self, count: u8) -> Self {
        self.attributes.subpicture_streams = count;
        self
    }

    /// Title VOB parts, in blocks.
    pub fn part_blocks(mut self, parts: &[u64]) -> Self {
        self.parts = parts.iter().map(|b| b * LOGICAL_BLOCK_BYTES).collect();
        self
    }

    /// Title VOB parts, in bytes.
    pub fn part_bytes(mut self, parts: &[u64]) -> Self {
        self.parts = parts.to_vec();
        self
    }

    pub fn menu_bytes(mut self, size: u64) -> Self {
        self.menu_size = size;
        self
    }

    pub fn ifo_bytes(mut self, size: Option<u64>) -> Self {
        self.ifo_size = size;
        self
    }

    pub fn nav(mut self, nav: TitleSetNavigation) -> Self {
        self.nav = Some(nav);
        self
    }

    fn title_blocks(&self) -> u32 {
        (self.parts.iter().sum::<u64>() / LOGICAL_BLOCK_BYTES) as u32
    }
}

/// One title with one program chain; chapter `i` is program `i` and cell `i`.
pub fn chapter_nav(cells: &[(u32, u32)]) -> TitleSetNavigation {
    TitleSetNavigation {
        titles: vec![
            (1..=cells.len() as u16)
                .map(|pgn| PartOfTitle { pgcn: 1, pgn })
                .collect(),
        ],
        program_chains: vec![ProgramChain {
            program_map: (1..=cells.len() as u8).collect(),
            cells: cells
                .iter()
                .map(|&(first_sector, last_sector)| CellPlayback {
                    first_sector,
                    last_sector,
                })
                .collect(),
        }],
    }
}

#[derive(Debug, Clone)]
pub struct MemoryDisc {
    pub titles: Vec<TitleEntry>,
    /// Index 0 is the video manager.
    pub sets: Vec<MemoryTitleSet>,
    /// Unreadable title VOB blocks: `(title_set, block)`.
    pub bad_blocks: Vec<(u8, u32)>,
    pub label: Option<String>,
    pub reads: ReadLog,
    pub fail_video_manager: bool,
}

impl MemoryDisc {
    /// A disc with only the video manager (with a 2-block menu).
    pub fn new() -> Self {
        Self {
            titles: Vec::new(),
            sets: vec![MemoryTitleSet::new(AspectRatio::Standard).menu_bytes(2 * LOGICAL_BLOCK_BYTES)],
            bad_blocks: Vec::new(),
            label: None,
            reads: Rc::new(RefCell::new(Vec::new())),
            fail_video_manager: false,
        }
    }

    pub fn title_set(mut self, set: MemoryTitleSet) -> Self {
        self.sets.push(set);
        self
    }

    pub fn title(mut self, title_set: u8, vts_title: u8, chapters: u16, angles: u8) -> Self {
        self.titles.push(TitleEntry {
            title_set,
            vts_title,
            chapters,
            angles,
        });
        self
    }

    pub fn bad(mut self, title_set: u8, blocks: std::ops::Range<u32>) -> Self {
        self.bad_blocks.extend(blocks.map(|b| (title_set, b)));
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Reads issued so far.
    pub fn read_log(&self) -> Vec<(u8, Domain, u32, u32)> {
        self.reads.borrow().clone()
    }

    fn set(&self, title_set: u8) -> Result<&MemoryTitleSet, DiscError> {
        self.sets
            .get(title_set as usize)
            .ok_or_else(|| DiscError::not_found(format!("title set {}", title_set)))
    }
}

pub struct MemorySource {
    title_set: u8,
    domain: Domain,
    total: u32,
    bad: Vec<u32>,
    reads: ReadLog,
}

impl BlockSource for MemorySource {
    fn read_blocks(&mut self, offset: u32, count: u32, buf: &mut [u8]) -> io::Result<u32> {
        self.reads
            .borrow_mut()
            .push((self.title_set, self.domain, offset, count));
        let mut done = 0;
        while done < count {
            let block = offset + done;
            if block >= self.total || self.bad.contains(&block) {
                break;
            }
            let start = done as usize * LOGICAL_BLOCK_SIZE;
            buf[start..start + LOGICAL_BLOCK_SIZE]
                .fill(block_pattern(self.title_set, self.domain, block));
            done += 1;
        }
        if done == 0 && self.bad.contains(&offset) {
            return Err(io::Error::other(format!("bad sector {}", offset)));
        }
        Ok(done)
    }
}

impl DiscStructure for MemoryDisc {
    fn video_manager(&mut self) -> Result<VideoManagerInfo, DiscError> {
        if self.fail_video_manager {
            return Err(DiscError::invalid_ifo("VIDEO_TS.IFO is unreadable"));
        }
        Ok(VideoManagerInfo {
            title_sets: self.sets[1..].iter().map(|s| s.attributes.clone()).collect(),
            titles: self.titles.clone(),
        })
    }

    fn title_set_navigation(&mut self, title_set: u8) -> Result<TitleSetNavigation, DiscError> {
        if title_set == 0 {
            return Err(DiscError::unsupported("the video manager has no titles"));
        }
        self.set(title_set)?
            .nav
            .clone()
            .ok_or_else(|| DiscError::invalid_ifo(format!("no tables for title set {}", title_set)))
    }

    fn stat(&mut self, title_set: u8, domain: Domain) -> Result<Option<StreamStat>, DiscError> {
        let Some(set) = self.sets.get(title_set as usize) else {
            return Ok(None);
        };
        Ok(match domain {
            Domain::InfoFile => set.ifo_size.map(StreamStat::single),
            Domain::MenuVobs => (set.menu_size > 0).then(|| StreamStat::single(set.menu_size)),
            Domain::TitleVobs => (title_set != 0 && !set.parts.is_empty())
                .then(|| StreamStat::from_parts(set.parts.clone())),
        })
    }

    fn open_stream(
        &mut self,
        title_set: u8,
        domain: Domain,
    ) -> Result<Box<dyn BlockSource + '_>, DiscError> {
        let set = self.set(title_set)?;
        let total = match domain {
            Domain::InfoFile => return Err(DiscError::unsupported("info files are not streams")),
            Domain::MenuVobs => (set.menu_size / LOGICAL_BLOCK_BYTES) as u32,
            Domain::TitleVobs if title_set == 0 => {
                return Err(DiscError::unsupported("the video manager has no title VOBs"));
            }
            Domain::TitleVobs => set.title_blocks(),
        };
        let bad = if domain == Domain::TitleVobs {
            self.bad_blocks
                .iter()
                .filter(|(ts, _)| *ts == title_set)
                .map(|&(_, b)| b)
                .collect()
        } else {
            Vec::new()
        };
        Ok(Box::new(MemorySource {
            title_set,
            domain,
            total,
            bad,
            reads: Rc::clone(&self.reads),
        }))
    }

    fn info_file_len(&mut self, title_set: u8) -> Result<u64, DiscError> {
        self.set(title_set)?
            .ifo_size
            .ok_or_else(|| DiscError::not_found(format!("info file of title set {}", title_set)))
    }

    fn read_info_bytes(
        &mut self,
        title_set: u8,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, DiscError> {
        let len = self.info_file_len(title_set)?;
        let n = (len.saturating_sub(offset) as usize).min(buf.len());
        for (i, byte) in buf[..n].iter_mut().enumerate() {
            *byte = info_pattern(title_set, offset + i as u64);
        }
        Ok(n)
    }

    fn volume_label(&mut self) -> Option<String> {
        self.label.clone()
    }
}

/// A feature disc: title set 1 is a 16:9 film with 5 chapters over 5 cells of
/// 100 blocks in two VOB parts; title set 2 is a small 4:3 extra.
pub fn feature_disc() -> MemoryDisc {
    let cells: Vec<(u32, u32)> = (0..5).map(|i| (i * 100, i * 100 + 99)).collect();
    MemoryDisc::new()
        .title_set(
            MemoryTitleSet::new(AspectRatio::Widescreen)
                .audio(&[5, 1])
                .subpictures(3)
                .menu_bytes(3 * LOGICAL_BLOCK_BYTES)
                .part_blocks(&[300, 200])
                .nav(chapter_nav(&cells)),
        )
        .title_set(
            MemoryTitleSet::new(AspectRatio::Standard)
                .part_blocks(&[40])
                .nav(chapter_nav(&[(0, 19), (20, 39)])),
        )
        .title(1, 1, 5, 1)
        .title(2, 1, 2, 1)
}

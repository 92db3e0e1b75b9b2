use std::io;

pub mod error;
pub mod files;
pub mod nav;
pub mod progress;
pub mod strategy;
pub mod util;

pub use error::DiscError;
pub use nav::{
    AspectRatio, CellPlayback, PartOfTitle, ProgramChain, TitleEntry, TitleSetAttributes,
    TitleSetNavigation, VideoManagerInfo,
};
pub use progress::CopyProgress;
pub use strategy::{ErrorStrategy, GapFill};

/// Size of a DVD-Video logical block in bytes.
pub const LOGICAL_BLOCK_SIZE: usize = 2048;

/// Same as [`LOGICAL_BLOCK_SIZE`], for byte arithmetic on file sizes.
pub const LOGICAL_BLOCK_BYTES: u64 = LOGICAL_BLOCK_SIZE as u64;

/// Which file family of a title set is being addressed.
///
/// Title set 0 is the video manager: its info file is `VIDEO_TS.IFO` and its
/// menu stream is `VIDEO_TS.VOB`. It never has title VOBs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// `VIDEO_TS.IFO` / `VTS_nn_0.IFO`
    InfoFile,
    /// `VIDEO_TS.VOB` / `VTS_nn_0.VOB`
    MenuVobs,
    /// `VTS_nn_1.VOB` .. `VTS_nn_9.VOB`, addressed as one contiguous stream
    TitleVobs,
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InfoFile => "info file",
            Self::MenuVobs => "menu VOB",
            Self::TitleVobs => "title VOB",
        }
    }
}

/// Declared size of a stream on the disc.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStat {
    /// Total size in bytes.
    pub size: u64,
    /// Size of each on-disc part in bytes. Only title VOB streams have more
    /// than one part.
    pub parts: Vec<u64>,
}

impl StreamStat {
    pub fn single(size: u64) -> Self {
        Self {
            size,
            parts: vec![size],
        }
    }

    pub fn from_parts(parts: Vec<u64>) -> Self {
        Self {
            size: parts.iter().sum(),
            parts,
        }
    }
}

/// A stream of logical blocks that can be read at absolute offsets.
pub trait BlockSource {
    /// Read up to `count` blocks starting at block `offset` into `buf`.
    ///
    /// `buf` must hold at least `count * LOGICAL_BLOCK_SIZE` bytes. Returns the
    /// number of blocks actually read, which is less than `count` when a bad
    /// sector (or the end of the stream) is hit. An `Err` means nothing could
    /// be read at `offset`.
    fn read_blocks(&mut self, offset: u32, count: u32, buf: &mut [u8]) -> io::Result<u32>;
}

/// Access to a DVD-Video disc's navigation structures and raw streams.
///
/// Implementors parse the IFO tables however they like; callers only see the
/// plain data types in [`nav`]. All title-set arguments use 0 for the video
/// manager and 1..=N for the title sets.
pub trait DiscStructure {
    /// Read the video manager tables: title set attributes and title entries.
    fn video_manager(&mut self) -> Result<VideoManagerInfo, DiscError>;

    /// Read the chapter and program chain tables of one title set.
    fn title_set_navigation(&mut self, title_set: u8) -> Result<TitleSetNavigation, DiscError>;

    /// Report the declared size of a stream, or `None` if it is absent.
    fn stat(&mut self, title_set: u8, domain: Domain) -> Result<Option<StreamStat>, DiscError>;

    /// Open a menu or title VOB stream for block reads.
    fn open_stream(
        &mut self,
        title_set: u8,
        domain: Domain,
    ) -> Result<Box<dyn BlockSource + '_>, DiscError>;

    /// Length in bytes of the title set's info file.
    fn info_file_len(&mut self, title_set: u8) -> Result<u64, DiscError>;

    /// Read raw bytes of the title set's info file starting at `offset`.
    ///
    /// Returns the number of bytes read; 0 means end of file.
    fn read_info_bytes(
        &mut self,
        title_set: u8,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, DiscError>;

    /// Volume identifier of the disc, if the provider can see it.
    fn volume_label(&mut self) -> Option<String> {
        None
    }
}

use std::io;
use std::path::PathBuf;

use dvdmirror_core::DiscError;
use thiserror::Error;

/// Errors produced by the mirroring operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The navigation tables needed for the operation could not be read
    #[error("Disc structure unavailable: {0}")]
    StructureUnavailable(String),

    /// Never produced: allocation failure aborts the process
    #[error("Out of memory: {0}")]
    AllocationFailure(String),

    /// Creating, writing or removing an output file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The disc returned fewer blocks than requested under the abort strategy
    #[error("Read error in {file} at block {block}")]
    Read { file: String, block: u32 },

    /// A file that must be block-aligned is not
    #[error("Size of {what} is not a multiple of 2048 ({size} bytes)")]
    SizeMismatch { what: String, size: u64 },

    #[error("Title set {requested} does not exist (disc has {available})")]
    InvalidTitleSet { requested: u8, available: u8 },

    #[error("Title {requested} does not exist (disc has {available})")]
    InvalidTitle { requested: u16, available: u16 },

    #[error("Invalid chapter range: {0}")]
    InvalidChapter(String),

    /// Title VOBs were requested from the video manager
    #[error("Title set 0 is the video manager and has no title VOBs")]
    VideoManagerDomain,

    /// A title set declares more VOB parts than the format allows
    #[error("Title set {title_set} has {parts} VOB parts (at most 9)")]
    TooManyParts { title_set: u8, parts: usize },

    #[error(transparent)]
    Disc(#[from] DiscError),

    /// Wraps the failure of one title set during a whole-disc mirror
    #[error("Mirroring title set {title_set} failed: {source}")]
    TitleSetFailed {
        title_set: u8,
        #[source]
        source: Box<MirrorError>,
    },
}

impl MirrorError {
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::StructureUnavailable(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn size_mismatch(what: impl Into<String>, size: u64) -> Self {
        Self::SizeMismatch {
            what: what.into(),
            size,
        }
    }

    pub fn invalid_chapter(msg: impl Into<String>) -> Self {
        Self::InvalidChapter(msg.into())
    }
}

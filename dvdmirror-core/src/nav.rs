//! Plain navigation data handed out by a disc structure provider.
//!
//! These types mirror the parts of the IFO tables the mirroring code needs
//! and nothing more. They carry raw values (1-based table indices, zero-based
//! channel fields) exactly as stored on the disc.

use std::fmt;
use std::str::FromStr;

/// Display aspect ratio of a title set's video stream.
///
/// The disc stores a 2-bit code: 0 is 4:3, 3 is 16:9, 1 and 2 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    Standard,
    Widescreen,
    Reserved(u8),
}

impl AspectRatio {
    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => Self::Standard,
            3 => Self::Widescreen,
            other => Self::Reserved(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Widescreen => 3,
            Self::Reserved(code) => *code,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "4:3"),
            Self::Widescreen => write!(f, "16:9"),
            Self::Reserved(_) => write!(f, "unknown"),
        }
    }
}

/// Error returned when parsing an aspect ratio string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectParseError(pub String);

impl fmt::Display for AspectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown aspect ratio '{}' (expected 4:3 or 16:9)", self.0)
    }
}

impl std::error::Error for AspectParseError {}

impl FromStr for AspectRatio {
    type Err = AspectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4:3" | "0" => Ok(Self::Standard),
            "16:9" | "3" => Ok(Self::Widescreen),
            other => Err(AspectParseError(other.to_string())),
        }
    }
}

/// Attributes of one title set, as listed in the video manager's
/// title set attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSetAttributes {
    pub aspect_ratio: AspectRatio,
    /// Raw channel field of each title audio stream. Many discs store the
    /// channel count minus one here.
    pub audio_channels: Vec<u8>,
    pub subpicture_streams: u8,
}

impl TitleSetAttributes {
    pub fn audio_streams(&self) -> usize {
        self.audio_channels.len()
    }
}

/// One entry of the video manager's title search pointer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleEntry {
    /// Title set holding the title (1-based).
    pub title_set: u8,
    /// Title number within its title set (1-based).
    pub vts_title: u8,
    pub chapters: u16,
    pub angles: u8,
}

/// Everything read from `VIDEO_TS.IFO` that the mirroring code uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoManagerInfo {
    /// Title set attributes, index 0 is title set 1.
    pub title_sets: Vec<TitleSetAttributes>,
    /// Titles, index 0 is title 1.
    pub titles: Vec<TitleEntry>,
}

impl VideoManagerInfo {
    pub fn title_set_count(&self) -> u8 {
        self.title_sets.len().min(u8::MAX as usize) as u8
    }
}

/// A chapter (part of title) entry: which program of which program chain
/// starts the chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartOfTitle {
    /// Program chain number (1-based).
    pub pgcn: u16,
    /// Program number within the program chain (1-based).
    pub pgn: u16,
}

/// Sector extent of one cell in the title VOB stream, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlayback {
    pub first_sector: u32,
    pub last_sector: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramChain {
    /// Entry cell number (1-based) of each program.
    pub program_map: Vec<u8>,
    pub cells: Vec<CellPlayback>,
}

/// Chapter and program chain tables of one title set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSetNavigation {
    /// Chapters of each title in the set, index 0 is the set's title 1.
    pub titles: Vec<Vec<PartOfTitle>>,
    /// Program chains, index 0 is PGC 1.
    pub program_chains: Vec<ProgramChain>,
}

#[cfg(test)]
#[path = "tests/nav_tests.rs"]
mod tests;

//! IFO table parsing.
//!
//! Handles the video manager (`VIDEO_TS.IFO`) and video title set
//! (`VTS_nn_0.IFO`) information files. Only the tables needed for mirroring
//! are decoded: title search pointers, title set attributes, chapter search
//! pointers and program chains. All multi-byte fields are big-endian and all
//! table pointers are either sector numbers or byte offsets relative to the
//! table start.

use dvdmirror_core::{
    AspectRatio, CellPlayback, DiscError, LOGICAL_BLOCK_SIZE, PartOfTitle, ProgramChain,
    TitleEntry, TitleSetAttributes, TitleSetNavigation, VideoManagerInfo,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const VMG_SIGNATURE: &[u8; 12] = b"DVDVIDEO-VMG";
pub(crate) const VTS_SIGNATURE: &[u8; 12] = b"DVDVIDEO-VTS";

/// VMGI_MAT: number of title sets (u16).
const VMG_NR_OF_TITLE_SETS: usize = 0x3E;
/// VMGI_MAT: sector of the title search pointer table (u32).
const VMG_TT_SRPT_SECTOR: usize = 0xC4;
/// VMGI_MAT: sector of the title set attribute table (u32).
const VMG_VTS_ATRT_SECTOR: usize = 0xD0;

/// VTSI_MAT: sector of the chapter search pointer table (u32).
const VTS_PTT_SRPT_SECTOR: usize = 0xC8;
/// VTSI_MAT: sector of the program chain information table (u32).
const VTS_PGCIT_SECTOR: usize = 0xCC;

/// Every table starts with an 8-byte header: u16 count, u16 reserved,
/// u32 last byte.
const TABLE_HEADER_SIZE: usize = 8;

const TT_SRPT_ENTRY_SIZE: usize = 12;
const PGCI_SRP_SIZE: usize = 8;
const PTT_ENTRY_SIZE: usize = 4;
const CELL_PLAYBACK_SIZE: usize = 24;
const AUDIO_ATTR_SIZE: usize = 8;
const MAX_AUDIO_STREAMS: usize = 8;

/// Offsets inside one title set attribute record.
const ATTR_VTSTT_VIDEO: usize = 264;
const ATTR_VTSTT_AUDIO_COUNT: usize = 267;
const ATTR_VTSTT_AUDIO: usize = 268;
const ATTR_VTSTT_SUBP_COUNT: usize = 349;

/// Offsets inside a program chain.
const PGC_NR_OF_PROGRAMS: usize = 0x02;
const PGC_NR_OF_CELLS: usize = 0x03;
const PGC_PROGRAM_MAP_OFFSET: usize = 0xE6;
const PGC_CELL_PLAYBACK_OFFSET: usize = 0xE8;

/// Offsets inside a cell playback record.
const CELL_FIRST_SECTOR: usize = 8;
const CELL_LAST_SECTOR: usize = 20;

// ---------------------------------------------------------------------------
// Bounds-checked reader
// ---------------------------------------------------------------------------

/// Big-endian field reader over an in-memory IFO file.
///
/// Every read is bounds-checked so a truncated or corrupted table turns into
/// a `DiscError::CorruptedTable` instead of a panic.
pub(crate) struct IfoBytes<'a> {
    data: &'a [u8],
    name: &'a str,
}

impl<'a> IfoBytes<'a> {
    pub(crate) fn new(data: &'a [u8], name: &'a str) -> Self {
        Self { data, name }
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], DiscError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| {
                DiscError::corrupted(format!(
                    "{}: read of {} bytes at 0x{:X} is past the end ({} bytes)",
                    self.name,
                    len,
                    offset,
                    self.data.len()
                ))
            })
    }

    fn u8(&self, offset: usize) -> Result<u8, DiscError> {
        Ok(self.slice(offset, 1)?[0])
    }

    fn u16(&self, offset: usize) -> Result<u16, DiscError> {
        let b = self.slice(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&self, offset: usize) -> Result<u32, DiscError> {
        let b = self.slice(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn check_signature(&self, expected: &[u8; 12]) -> Result<(), DiscError> {
        let found = self.slice(0, expected.len())?;
        if found != expected {
            return Err(DiscError::invalid_ifo(format!(
                "{}: expected signature {}, found {}",
                self.name,
                String::from_utf8_lossy(expected),
                dvdmirror_core::util::read_ascii_fixed(found),
            )));
        }
        Ok(())
    }

    /// Resolve a sector pointer stored at `field`. A zero pointer means the
    /// table is absent, which is an error for every table we read.
    fn table_offset(&self, field: usize, table: &str) -> Result<usize, DiscError> {
        let sector = self.u32(field)?;
        if sector == 0 {
            return Err(DiscError::invalid_ifo(format!(
                "{}: {} is missing",
                self.name, table
            )));
        }
        Ok(sector as usize * LOGICAL_BLOCK_SIZE)
    }
}

// ---------------------------------------------------------------------------
// Video manager
// ---------------------------------------------------------------------------

/// Parse `VIDEO_TS.IFO` into title entries and title set attributes.
pub fn parse_video_manager(data: &[u8]) -> Result<VideoManagerInfo, DiscError> {
    let ifo = IfoBytes::new(data, "VIDEO_TS.IFO");
    ifo.check_signature(VMG_SIGNATURE)?;

    let title_set_count = ifo.u16(VMG_NR_OF_TITLE_SETS)? as usize;
    let tt_srpt = ifo.table_offset(VMG_TT_SRPT_SECTOR, "title search pointer table")?;
    let vts_atrt = ifo.table_offset(VMG_VTS_ATRT_SECTOR, "title set attribute table")?;

    let titles = parse_title_search_pointers(&ifo, tt_srpt)?;
    let title_sets = parse_title_set_attributes(&ifo, vts_atrt, title_set_count)?;

    Ok(VideoManagerInfo { title_sets, titles })
}

fn parse_title_search_pointers(
    ifo: &IfoBytes<'_>,
    table: usize,
) -> Result<Vec<TitleEntry>, DiscError> {
    let count = ifo.u16(table)? as usize;
    (0..count)
        .map(|i| {
            let entry = table + TABLE_HEADER_SIZE + i * TT_SRPT_ENTRY_SIZE;
            Ok(TitleEntry {
                angles: ifo.u8(entry + 1)?,
                chapters: ifo.u16(entry + 2)?,
                title_set: ifo.u8(entry + 6)?,
                vts_title: ifo.u8(entry + 7)?,
            })
        })
        .collect()
}

fn parse_title_set_attributes(
    ifo: &IfoBytes<'_>,
    table: usize,
    title_set_count: usize,
) -> Result<Vec<TitleSetAttributes>, DiscError> {
    let listed = ifo.u16(table)? as usize;
    if listed < title_set_count {
        return Err(DiscError::corrupted(format!(
            "title set attribute table lists {} title sets, video manager declares {}",
            listed, title_set_count
        )));
    }

    (0..title_set_count)
        .map(|i| {
            let relative = ifo.u32(table + TABLE_HEADER_SIZE + i * 4)? as usize;
            let record = table + relative;

            let video = ifo.u8(record + ATTR_VTSTT_VIDEO)?;
            let audio_count = (ifo.u8(record + ATTR_VTSTT_AUDIO_COUNT)? as usize)
                .min(MAX_AUDIO_STREAMS);
            let audio_channels = (0..audio_count)
                .map(|a| {
                    let attr = record + ATTR_VTSTT_AUDIO + a * AUDIO_ATTR_SIZE;
                    Ok(ifo.u8(attr + 1)? & 0x07)
                })
                .collect::<Result<Vec<u8>, DiscError>>()?;

            Ok(TitleSetAttributes {
                aspect_ratio: AspectRatio::from_code((video >> 2) & 0x03),
                audio_channels,
                subpicture_streams: ifo.u8(record + ATTR_VTSTT_SUBP_COUNT)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Video title set
// ---------------------------------------------------------------------------

/// Parse `VTS_nn_0.IFO` into chapter and program chain tables.
pub fn parse_title_set(data: &[u8], name: &str) -> Result<TitleSetNavigation, DiscError> {
    let ifo = IfoBytes::new(data, name);
    ifo.check_signature(VTS_SIGNATURE)?;

    let ptt_srpt = ifo.table_offset(VTS_PTT_SRPT_SECTOR, "chapter search pointer table")?;
    let pgcit = ifo.table_offset(VTS_PGCIT_SECTOR, "program chain table")?;

    Ok(TitleSetNavigation {
        titles: parse_chapter_table(&ifo, ptt_srpt)?,
        program_chains: parse_program_chains(&ifo, pgcit)?,
    })
}

fn parse_chapter_table(
    ifo: &IfoBytes<'_>,
    table: usize,
) -> Result<Vec<Vec<PartOfTitle>>, DiscError> {
    let count = ifo.u16(table)? as usize;
    let last_byte = ifo.u32(table + 4)? as usize;

    let offsets = (0..count)
        .map(|i| Ok(ifo.u32(table + TABLE_HEADER_SIZE + i * 4)? as usize))
        .collect::<Result<Vec<usize>, DiscError>>()?;

    offsets
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            // Each title's chapters run up to the next title's list, the
            // last one up to the table's last byte.
            let end = offsets.get(i + 1).copied().unwrap_or(last_byte + 1);
            if end < start {
                return Err(DiscError::corrupted(format!(
                    "chapter list of title {} ends before it starts",
                    i + 1
                )));
            }
            let chapters = (end - start) / PTT_ENTRY_SIZE;
            (0..chapters)
                .map(|c| {
                    let entry = table + start + c * PTT_ENTRY_SIZE;
                    Ok(PartOfTitle {
                        pgcn: ifo.u16(entry)?,
                        pgn: ifo.u16(entry + 2)?,
                    })
                })
                .collect()
        })
        .collect()
}

fn parse_program_chains(
    ifo: &IfoBytes<'_>,
    table: usize,
) -> Result<Vec<ProgramChain>, DiscError> {
    let count = ifo.u16(table)? as usize;
    (0..count)
        .map(|i| {
            let srp = table + TABLE_HEADER_SIZE + i * PGCI_SRP_SIZE;
            let pgc = table + ifo.u32(srp + 4)? as usize;
            parse_program_chain(ifo, pgc)
        })
        .collect()
}

fn parse_program_chain(ifo: &IfoBytes<'_>, pgc: usize) -> Result<ProgramChain, DiscError> {
    let programs = ifo.u8(pgc + PGC_NR_OF_PROGRAMS)? as usize;
    let cells = ifo.u8(pgc + PGC_NR_OF_CELLS)? as usize;

    let program_map = if programs == 0 {
        Vec::new()
    } else {
        let offset = ifo.u16(pgc + PGC_PROGRAM_MAP_OFFSET)? as usize;
        ifo.slice(pgc + offset, programs)?.to_vec()
    };

    let cells = if cells == 0 {
        Vec::new()
    } else {
        let offset = pgc + ifo.u16(pgc + PGC_CELL_PLAYBACK_OFFSET)? as usize;
        (0..cells)
            .map(|c| {
                let record = offset + c * CELL_PLAYBACK_SIZE;
                Ok(CellPlayback {
                    first_sector: ifo.u32(record + CELL_FIRST_SECTOR)?,
                    last_sector: ifo.u32(record + CELL_LAST_SECTOR)?,
                })
            })
            .collect::<Result<Vec<CellPlayback>, DiscError>>()?
    };

    Ok(ProgramChain { program_map, cells })
}

#[cfg(test)]
#[path = "tests/ifo_tests.rs"]
mod tests;

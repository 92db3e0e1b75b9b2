//! Chapter range to sector range resolution, and the used-sector index.

use dvdmirror_core::{CellPlayback, TitleSetNavigation};

use crate::catalog::TitleRecord;
use crate::error::MirrorError;

/// Inclusive range of logical blocks in a title VOB stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorRange {
    pub first: u32,
    pub last: u32,
}

impl SectorRange {
    pub fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    pub fn blocks(&self) -> u64 {
        (self.last - self.first) as u64 + 1
    }

    pub fn contains(&self, block: u32) -> bool {
        block >= self.first && block <= self.last
    }
}

impl From<&CellPlayback> for SectorRange {
    fn from(cell: &CellPlayback) -> Self {
        Self::new(cell.first_sector, cell.last_sector)
    }
}

/// Sort ranges by first sector (stable) and trim each range so it ends
/// before the next one starts. Ranges left empty by trimming are dropped.
pub fn normalize_ranges(mut ranges: Vec<SectorRange>) -> Vec<SectorRange> {
    ranges.sort_by_key(|r| r.first);

    let mut out: Vec<SectorRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match out.last_mut() {
            Some(prev) if prev.last >= range.first => {
                if range.first > prev.first {
                    prev.last = range.first - 1;
                } else {
                    log::debug!(
                        "Dropping cell {}-{} covered by cell {}-{}",
                        prev.first,
                        prev.last,
                        range.first,
                        range.last
                    );
                    out.pop();
                }
            }
            _ => {}
        }
        out.push(range);
    }
    out
}

/// Resolve chapters `start..=end` of `title` into ascending, disjoint sector
/// ranges of the title set's VOB stream.
///
/// Out-of-range chapter numbers are clamped to the title's chapter count.
/// The range is taken from the program chain of the start chapter; a range
/// that continues into another program chain ends with that chain's last
/// cell.
pub fn resolve_chapter_cells(
    nav: &TitleSetNavigation,
    title: &TitleRecord,
    start: u16,
    end: u16,
) -> Result<Vec<SectorRange>, MirrorError> {
    if start == 0 || end == 0 {
        return Err(MirrorError::invalid_chapter(format!(
            "chapters are numbered from 1, got {}-{}",
            start, end
        )));
    }

    let chapters = title.chapter_count;
    if chapters == 0 {
        return Err(MirrorError::invalid_chapter(format!(
            "title {} has no chapters",
            title.id
        )));
    }

    let mut start = start;
    let mut end = end;
    if end > chapters {
        log::warn!(
            "Truncated the end chapter; only {} chapters in title {}",
            chapters,
            title.id
        );
        end = chapters;
    }
    if start > chapters {
        log::warn!(
            "Truncated the start chapter; only {} chapters in title {}",
            chapters,
            title.id
        );
        start = chapters;
    }
    if start > end {
        return Err(MirrorError::invalid_chapter(format!(
            "start chapter {} is after end chapter {}",
            start, end
        )));
    }

    let ptts = title
        .title_set_local_id
        .checked_sub(1)
        .and_then(|i| nav.titles.get(i as usize))
        .ok_or_else(|| {
            MirrorError::structure(format!(
                "title set {} has no chapter table for its title {}",
                title.title_set, title.title_set_local_id
            ))
        })?;

    let first_ptt = ptts.get(start as usize - 1).ok_or_else(|| {
        MirrorError::structure(format!(
            "title {} has no entry for chapter {}",
            title.id, start
        ))
    })?;

    let pgc = first_ptt
        .pgcn
        .checked_sub(1)
        .and_then(|i| nav.program_chains.get(i as usize))
        .ok_or_else(|| {
            MirrorError::structure(format!("program chain {} is missing", first_ptt.pgcn))
        })?;

    let program_cell = |pgn: u16| -> Result<usize, MirrorError> {
        pgn.checked_sub(1)
            .and_then(|i| pgc.program_map.get(i as usize))
            .map(|&cell| cell as usize)
            .filter(|&cell| cell > 0)
            .ok_or_else(|| {
                MirrorError::structure(format!(
                    "program {} is missing from program chain {}",
                    pgn, first_ptt.pgcn
                ))
            })
    };

    let start_cell = program_cell(first_ptt.pgn)?;
    let end_cell = if end < chapters {
        let next = ptts.get(end as usize).ok_or_else(|| {
            MirrorError::structure(format!(
                "title {} has no entry for chapter {}",
                title.id,
                end + 1
            ))
        })?;
        if next.pgcn == first_ptt.pgcn {
            program_cell(next.pgn)? - 1
        } else {
            pgc.cells.len()
        }
    } else {
        pgc.cells.len()
    };

    if end_cell < start_cell || end_cell > pgc.cells.len() {
        return Err(MirrorError::structure(format!(
            "cells {}-{} are outside program chain {} ({} cells)",
            start_cell,
            end_cell,
            first_ptt.pgcn,
            pgc.cells.len()
        )));
    }

    let ranges: Vec<SectorRange> = pgc.cells[start_cell - 1..end_cell]
        .iter()
        .filter(|cell| {
            let valid = cell.last_sector >= cell.first_sector;
            if !valid {
                log::debug!(
                    "Skipping cell with inverted sectors {}-{}",
                    cell.first_sector,
                    cell.last_sector
                );
            }
            valid
        })
        .map(SectorRange::from)
        .collect();

    log::debug!(
        "Title {} chapters {}-{}: cells {}-{} of program chain {}",
        title.id,
        start,
        end,
        start_cell,
        end_cell,
        first_ptt.pgcn
    );

    Ok(normalize_ranges(ranges))
}

/// Where a block falls relative to the cells of a title set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// The block and the next `n - 1` blocks belong to a cell.
    Referenced(u32),
    /// The block and the next `n - 1` blocks are not used by any cell.
    Unreferenced(u32),
    /// The block lies after the last cell.
    Beyond,
}

/// Sorted, merged sector ranges used by any cell of a title set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorIndex {
    ranges: Vec<SectorRange>,
}

impl SectorIndex {
    pub fn from_navigation(nav: &TitleSetNavigation) -> Self {
        let mut cells: Vec<SectorRange> = nav
            .program_chains
            .iter()
            .flat_map(|pgc| pgc.cells.iter())
            .filter(|cell| cell.last_sector >= cell.first_sector)
            .map(SectorRange::from)
            .collect();
        cells.sort_by_key(|r| r.first);

        let mut ranges: Vec<SectorRange> = Vec::with_capacity(cells.len());
        for cell in cells {
            match ranges.last_mut() {
                Some(prev) if cell.first <= prev.last.saturating_add(1) => {
                    prev.last = prev.last.max(cell.last);
                }
                _ => ranges.push(cell),
            }
        }
        Self { ranges }
    }

    pub fn ranges(&self) -> &[SectorRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn classify(&self, block: u32) -> Span {
        let index = self.ranges.partition_point(|r| r.last < block);
        match self.ranges.get(index) {
            None => Span::Beyond,
            Some(range) if range.first <= block => Span::Referenced(range.last - block + 1),
            Some(range) => Span::Unreferenced(range.first - block),
        }
    }
}

#[cfg(test)]
#[path = "tests/cells_tests.rs"]
mod tests;

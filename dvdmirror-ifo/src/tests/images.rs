//! Synthetic IFO images for tests.
//!
//! Builds just enough of `VIDEO_TS.IFO` and `VTS_nn_0.IFO` for the parser:
//! signature, table sector pointers and the tables themselves, each table
//! starting on its own sector.

#![allow(dead_code)]

const SECTOR: usize = 2048;
const ATTR_RECORD_SIZE: usize = 360;
const PGC_HEADER_SIZE: usize = 0xEC;

pub struct TitleSetSpec {
    /// Raw 2-bit aspect code: 0 is 4:3, 3 is 16:9.
    pub aspect: u8,
    /// Raw channel field per audio stream.
    pub audio_channels: Vec<u8>,
    pub subpictures: u8,
}

pub struct TitleSpec {
    pub title_set: u8,
    pub vts_title: u8,
    pub chapters: u16,
    pub angles: u8,
}

pub struct PgcSpec {
    pub program_map: Vec<u8>,
    /// `(first_sector, last_sector)` per cell.
    pub cells: Vec<(u32, u32)>,
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn sectors_for(len: usize) -> usize {
    len.div_ceil(SECTOR).max(1)
}

/// Build a `VIDEO_TS.IFO` image with a title search pointer table at sector 1
/// and a title set attribute table right after it.
pub fn vmg_image(title_sets: &[TitleSetSpec], titles: &[TitleSpec]) -> Vec<u8> {
    let tt_srpt_len = 8 + titles.len() * 12;
    let atrt_records = 8 + title_sets.len() * 4;
    let atrt_len = atrt_records + title_sets.len() * ATTR_RECORD_SIZE;

    let tt_srpt_sector = 1;
    let atrt_sector = tt_srpt_sector + sectors_for(tt_srpt_len);
    let total = (atrt_sector + sectors_for(atrt_len)) * SECTOR;

    let mut img = vec![0u8; total];
    img[..12].copy_from_slice(b"DVDVIDEO-VMG");
    put_u16(&mut img, 0x3E, title_sets.len() as u16);
    put_u32(&mut img, 0xC4, tt_srpt_sector as u32);
    put_u32(&mut img, 0xD0, atrt_sector as u32);

    let t = tt_srpt_sector * SECTOR;
    put_u16(&mut img, t, titles.len() as u16);
    put_u32(&mut img, t + 4, (tt_srpt_len - 1) as u32);
    for (i, title) in titles.iter().enumerate() {
        let e = t + 8 + i * 12;
        img[e + 1] = title.angles;
        put_u16(&mut img, e + 2, title.chapters);
        img[e + 6] = title.title_set;
        img[e + 7] = title.vts_title;
    }

    let a = atrt_sector * SECTOR;
    put_u16(&mut img, a, title_sets.len() as u16);
    put_u32(&mut img, a + 4, (atrt_len - 1) as u32);
    for (i, ts) in title_sets.iter().enumerate() {
        let relative = atrt_records + i * ATTR_RECORD_SIZE;
        put_u32(&mut img, a + 8 + i * 4, relative as u32);
        let r = a + relative;
        img[r + 264] = (ts.aspect & 0x03) << 2;
        img[r + 267] = ts.audio_channels.len() as u8;
        for (s, &channels) in ts.audio_channels.iter().enumerate() {
            img[r + 268 + s * 8 + 1] = channels & 0x07;
        }
        img[r + 349] = ts.subpictures;
    }

    img
}

/// Build a `VTS_nn_0.IFO` image. `titles` lists `(pgcn, pgn)` per chapter for
/// each title of the set.
pub fn vts_image(titles: &[Vec<(u16, u16)>], pgcs: &[PgcSpec]) -> Vec<u8> {
    let ptt_header = 8 + titles.len() * 4;
    let ptt_len = ptt_header + titles.iter().map(|t| t.len() * 4).sum::<usize>();

    let pgc_sizes: Vec<usize> = pgcs
        .iter()
        .map(|p| PGC_HEADER_SIZE + p.program_map.len() + p.cells.len() * 24)
        .collect();
    let pgcit_header = 8 + pgcs.len() * 8;
    let pgcit_len = pgcit_header + pgc_sizes.iter().sum::<usize>();

    let ptt_sector = 1;
    let pgcit_sector = ptt_sector + sectors_for(ptt_len);
    let total = (pgcit_sector + sectors_for(pgcit_len)) * SECTOR;

    let mut img = vec![0u8; total];
    img[..12].copy_from_slice(b"DVDVIDEO-VTS");
    put_u32(&mut img, 0xC8, ptt_sector as u32);
    put_u32(&mut img, 0xCC, pgcit_sector as u32);

    let p = ptt_sector * SECTOR;
    put_u16(&mut img, p, titles.len() as u16);
    put_u32(&mut img, p + 4, (ptt_len - 1) as u32);
    let mut relative = ptt_header;
    for (i, chapters) in titles.iter().enumerate() {
        put_u32(&mut img, p + 8 + i * 4, relative as u32);
        for &(pgcn, pgn) in chapters {
            put_u16(&mut img, p + relative, pgcn);
            put_u16(&mut img, p + relative + 2, pgn);
            relative += 4;
        }
    }

    let g = pgcit_sector * SECTOR;
    put_u16(&mut img, g, pgcs.len() as u16);
    put_u32(&mut img, g + 4, (pgcit_len - 1) as u32);
    let mut relative = pgcit_header;
    for (i, (pgc, size)) in pgcs.iter().zip(&pgc_sizes).enumerate() {
        put_u32(&mut img, g + 8 + i * 8 + 4, relative as u32);
        let base = g + relative;
        img[base + 2] = pgc.program_map.len() as u8;
        img[base + 3] = pgc.cells.len() as u8;
        let map_offset = PGC_HEADER_SIZE;
        let cell_offset = map_offset + pgc.program_map.len();
        put_u16(&mut img, base + 0xE6, map_offset as u16);
        put_u16(&mut img, base + 0xE8, cell_offset as u16);
        img[base + map_offset..base + cell_offset].copy_from_slice(&pgc.program_map);
        for (c, &(first, last)) in pgc.cells.iter().enumerate() {
            let cell = base + cell_offset + c * 24;
            put_u32(&mut img, cell + 8, first);
            put_u32(&mut img, cell + 20, last);
        }
        relative += size;
    }

    img
}

/// A one-title, one-title-set disc: title 1 has `chapters` chapters, one
/// program per chapter, one cell per program, each cell `cell_blocks` long.
pub fn simple_disc(chapters: u16, cell_blocks: u32) -> (Vec<u8>, Vec<u8>) {
    let vmg = vmg_image(
        &[TitleSetSpec {
            aspect: 3,
            audio_channels: vec![5, 1],
            subpictures: 2,
        }],
        &[TitleSpec {
            title_set: 1,
            vts_title: 1,
            chapters,
            angles: 1,
        }],
    );
    let vts = vts_image(
        &[(1..=chapters).map(|c| (1, c)).collect()],
        &[PgcSpec {
            program_map: (1..=chapters as u8).collect(),
            cells: (0..chapters as u32)
                .map(|c| (c * cell_blocks, (c + 1) * cell_blocks - 1))
                .collect(),
        }],
    );
    (vmg, vts)
}

use super::*;
use crate::test_support::chapter_nav;
use dvdmirror_core::{AspectRatio, PartOfTitle, ProgramChain};

fn title(chapters: u16) -> TitleRecord {
    TitleRecord {
        id: 1,
        title_set: 1,
        title_set_local_id: 1,
        chapter_count: chapters,
        angle_count: 1,
        audio_track_count: 1,
        max_audio_channels: 2,
        subpicture_count: 0,
        aspect_ratio: AspectRatio::Widescreen,
    }
}

fn cell(first_sector: u32, last_sector: u32) -> CellPlayback {
    CellPlayback {
        first_sector,
        last_sector,
    }
}

fn five_chapters() -> TitleSetNavigation {
    chapter_nav(&[(0, 99), (100, 199), (200, 299), (300, 399), (400, 499)])
}

fn covered(ranges: &[SectorRange]) -> Vec<u32> {
    ranges.iter().flat_map(|r| r.first..=r.last).collect()
}

#[test]
fn single_chapter() {
    let nav = five_chapters();
    let ranges = resolve_chapter_cells(&nav, &title(5), 2, 2).unwrap();
    assert_eq!(ranges, vec![SectorRange::new(100, 199)]);
}

#[test]
fn chapter_range_to_end() {
    let nav = five_chapters();
    let ranges = resolve_chapter_cells(&nav, &title(5), 4, 5).unwrap();
    assert_eq!(
        ranges,
        vec![SectorRange::new(300, 399), SectorRange::new(400, 499)]
    );
}

#[test]
fn chapter_round_trip() {
    let nav = five_chapters();
    let t = title(5);
    let all = covered(&resolve_chapter_cells(&nav, &t, 1, 5).unwrap());
    let pieces: Vec<u32> = (1..=5)
        .flat_map(|c| covered(&resolve_chapter_cells(&nav, &t, c, c).unwrap()))
        .collect();
    assert_eq!(all, pieces);
}

#[test]
fn out_of_range_chapters_are_clamped() {
    let nav = five_chapters();
    let ranges = resolve_chapter_cells(&nav, &title(5), 3, 40).unwrap();
    assert_eq!(ranges.first().unwrap().first, 200);
    assert_eq!(ranges.last().unwrap().last, 499);

    let last = resolve_chapter_cells(&nav, &title(5), 9, 9).unwrap();
    assert_eq!(last, vec![SectorRange::new(400, 499)]);
}

#[test]
fn invalid_chapter_numbers() {
    let nav = five_chapters();
    for (start, end) in [(0, 3), (3, 0), (4, 2)] {
        assert!(matches!(
            resolve_chapter_cells(&nav, &title(5), start, end),
            Err(MirrorError::InvalidChapter(_))
        ));
    }
    assert!(matches!(
        resolve_chapter_cells(&nav, &title(0), 1, 1),
        Err(MirrorError::InvalidChapter(_))
    ));
}

#[test]
fn programs_with_several_cells() {
    // Two chapters: program 1 is cells 1-2, program 2 is cells 3-4.
    let nav = TitleSetNavigation {
        titles: vec![vec![
            PartOfTitle { pgcn: 1, pgn: 1 },
            PartOfTitle { pgcn: 1, pgn: 2 },
        ]],
        program_chains: vec![ProgramChain {
            program_map: vec![1, 3],
            cells: vec![
                cell(0, 9),
                cell(10, 19),
                cell(20, 29),
                cell(30, 39),
            ],
        }],
    };
    let first = resolve_chapter_cells(&nav, &title(2), 1, 1).unwrap();
    assert_eq!(covered(&first), (0..=19).collect::<Vec<_>>());
    let second = resolve_chapter_cells(&nav, &title(2), 2, 2).unwrap();
    assert_eq!(covered(&second), (20..=39).collect::<Vec<_>>());
}

#[test]
fn range_ending_in_another_program_chain() {
    // Chapter 2 lives in program chain 2; a range 1-1 stays in chain 1 and
    // runs to its last cell.
    let nav = TitleSetNavigation {
        titles: vec![vec![
            PartOfTitle { pgcn: 1, pgn: 1 },
            PartOfTitle { pgcn: 2, pgn: 1 },
        ]],
        program_chains: vec![
            ProgramChain {
                program_map: vec![1],
                cells: vec![
                    cell(0, 9),
                    cell(10, 19),
                ],
            },
            ProgramChain {
                program_map: vec![1],
                cells: vec![cell(50, 59)],
            },
        ],
    };
    let ranges = resolve_chapter_cells(&nav, &title(2), 1, 1).unwrap();
    assert_eq!(covered(&ranges), (0..=19).collect::<Vec<_>>());
}

#[test]
fn missing_tables_are_structure_errors() {
    let nav = five_chapters();
    let mut other = title(5);
    other.title_set_local_id = 2;
    assert!(matches!(
        resolve_chapter_cells(&nav, &other, 1, 1),
        Err(MirrorError::StructureUnavailable(_))
    ));

    let mut broken = five_chapters();
    broken.program_chains[0].program_map.truncate(2);
    assert!(matches!(
        resolve_chapter_cells(&broken, &title(5), 4, 4),
        Err(MirrorError::StructureUnavailable(_))
    ));

    let mut no_pgc = five_chapters();
    no_pgc.program_chains.clear();
    assert!(matches!(
        resolve_chapter_cells(&no_pgc, &title(5), 1, 1),
        Err(MirrorError::StructureUnavailable(_))
    ));
}

#[test]
fn overlapping_cells_are_trimmed() {
    let ranges = normalize_ranges(vec![
        SectorRange::new(200, 299),
        SectorRange::new(0, 120),
        SectorRange::new(100, 199),
        SectorRange::new(100, 150),
    ]);
    assert_eq!(
        ranges,
        vec![
            SectorRange::new(0, 99),
            SectorRange::new(100, 150),
            SectorRange::new(200, 299)
        ]
    );
}

#[test]
fn resolved_ranges_are_ascending_and_disjoint() {
    // Cells in playback order that jump back and overlap.
    let nav = chapter_nav(&[(500, 599), (0, 99), (50, 149), (600, 600), (300, 320)]);
    let t = title(5);
    for start in 1..=5 {
        for end in start..=5 {
            let ranges = resolve_chapter_cells(&nav, &t, start, end).unwrap();
            for pair in ranges.windows(2) {
                assert!(pair[0].last < pair[1].first, "{:?}", ranges);
            }
            for r in &ranges {
                assert!(r.first <= r.last);
            }
        }
    }
}

#[test]
fn inverted_cells_are_skipped() {
    let nav = chapter_nav(&[(0, 9), (30, 20), (40, 49)]);
    let ranges = resolve_chapter_cells(&nav, &title(3), 1, 3).unwrap();
    assert_eq!(
        ranges,
        vec![SectorRange::new(0, 9), SectorRange::new(40, 49)]
    );
}

#[test]
fn sector_index_merges_and_classifies() {
    let nav = TitleSetNavigation {
        titles: Vec::new(),
        program_chains: vec![
            ProgramChain {
                program_map: vec![1],
                cells: vec![
                    cell(100, 199),
                    cell(0, 49),
                ],
            },
            ProgramChain {
                program_map: vec![1],
                cells: vec![
                    cell(150, 249),
                    cell(250, 259),
                ],
            },
        ],
    };
    let index = SectorIndex::from_navigation(&nav);
    assert_eq!(
        index.ranges(),
        &[SectorRange::new(0, 49), SectorRange::new(100, 259)]
    );
    assert!(!index.is_empty());

    assert_eq!(index.classify(0), Span::Referenced(50));
    assert_eq!(index.classify(49), Span::Referenced(1));
    assert_eq!(index.classify(50), Span::Unreferenced(50));
    assert_eq!(index.classify(99), Span::Unreferenced(1));
    assert_eq!(index.classify(200), Span::Referenced(60));
    assert_eq!(index.classify(260), Span::Beyond);

    assert!(SectorIndex::default().is_empty());
    assert_eq!(SectorIndex::default().classify(0), Span::Beyond);
}

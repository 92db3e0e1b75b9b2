use super::*;
use crate::test_images::simple_disc;

/// Fill `blocks` blocks, each with its absolute block number's low byte.
fn pattern_blocks(first: u32, blocks: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(blocks as usize * LOGICAL_BLOCK_SIZE);
    for b in first..first + blocks {
        data.extend(std::iter::repeat_n(b as u8, LOGICAL_BLOCK_SIZE));
    }
    data
}

fn write_disc(root: &Path, video_ts_name: &str, upper: bool) -> PathBuf {
    let video_ts = root.join(video_ts_name);
    fs::create_dir_all(&video_ts).unwrap();
    let (vmg, vts) = simple_disc(3, 10);
    let name = |n: &str| {
        if upper {
            n.to_string()
        } else {
            n.to_ascii_lowercase()
        }
    };
    fs::write(video_ts.join(name("VIDEO_TS.IFO")), &vmg).unwrap();
    fs::write(video_ts.join(name("VIDEO_TS.BUP")), &vmg).unwrap();
    fs::write(video_ts.join(name("VIDEO_TS.VOB")), pattern_blocks(0, 4)).unwrap();
    fs::write(video_ts.join(name("VTS_01_0.IFO")), &vts).unwrap();
    fs::write(video_ts.join(name("VTS_01_0.BUP")), &vts).unwrap();
    fs::write(video_ts.join(name("VTS_01_1.VOB")), pattern_blocks(0, 20)).unwrap();
    fs::write(video_ts.join(name("VTS_01_2.VOB")), pattern_blocks(20, 10)).unwrap();
    video_ts
}

#[test]
fn open_parent_or_video_ts() {
    let dir = tempfile::tempdir().unwrap();
    let movie = dir.path().join("My_Movie");
    let video_ts = write_disc(&movie, "VIDEO_TS", true);

    let from_parent = FolderDisc::open(&movie).unwrap();
    assert_eq!(from_parent.video_ts_dir(), video_ts.as_path());
    assert_eq!(from_parent.folder_name().as_deref(), Some("My_Movie"));

    let direct = FolderDisc::open(&video_ts).unwrap();
    assert_eq!(direct.folder_name().as_deref(), Some("My_Movie"));
}

#[test]
fn open_missing_video_ts() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        FolderDisc::open(dir.path()),
        Err(DiscError::NotFound(_))
    ));
}

#[test]
fn lowercase_names_are_found() {
    let dir = tempfile::tempdir().unwrap();
    write_disc(dir.path(), "video_ts", false);
    let mut disc = FolderDisc::open(dir.path()).unwrap();

    let vmg = disc.video_manager().unwrap();
    assert_eq!(vmg.title_set_count(), 1);
    assert_eq!(vmg.titles[0].chapters, 3);

    let nav = disc.title_set_navigation(1).unwrap();
    assert_eq!(nav.titles[0].len(), 3);
    assert_eq!(nav.program_chains[0].cells[2].first_sector, 20);
}

#[test]
fn stat_reports_parts() {
    let dir = tempfile::tempdir().unwrap();
    write_disc(dir.path(), "VIDEO_TS", true);
    let mut disc = FolderDisc::open(dir.path()).unwrap();

    let title = disc.stat(1, Domain::TitleVobs).unwrap().unwrap();
    assert_eq!(title.parts, vec![20 * 2048, 10 * 2048]);
    assert_eq!(title.size, 30 * 2048);

    let menu = disc.stat(0, Domain::MenuVobs).unwrap().unwrap();
    assert_eq!(menu.size, 4 * 2048);

    assert!(disc.stat(1, Domain::MenuVobs).unwrap().is_none());
    assert!(disc.stat(0, Domain::TitleVobs).unwrap().is_none());
    assert!(disc.stat(2, Domain::InfoFile).unwrap().is_none());
}

#[test]
fn title_stream_spans_parts() {
    let dir = tempfile::tempdir().unwrap();
    write_disc(dir.path(), "VIDEO_TS", true);
    let mut disc = FolderDisc::open(dir.path()).unwrap();
    let mut stream = disc.open_stream(1, Domain::TitleVobs).unwrap();

    let mut buf = vec![0u8; 8 * LOGICAL_BLOCK_SIZE];
    let n = stream.read_blocks(16, 8, &mut buf).unwrap();
    assert_eq!(n, 8);
    for (i, block) in buf.chunks(LOGICAL_BLOCK_SIZE).enumerate() {
        assert!(block.iter().all(|&b| b == (16 + i) as u8));
    }
}

#[test]
fn read_past_end_is_short() {
    let dir = tempfile::tempdir().unwrap();
    write_disc(dir.path(), "VIDEO_TS", true);
    let mut disc = FolderDisc::open(dir.path()).unwrap();
    let mut stream = disc.open_stream(1, Domain::TitleVobs).unwrap();

    let mut buf = vec![0u8; 4 * LOGICAL_BLOCK_SIZE];
    assert_eq!(stream.read_blocks(28, 4, &mut buf).unwrap(), 2);
    assert_eq!(stream.read_blocks(40, 4, &mut buf).unwrap(), 0);
}

#[test]
fn missing_part_stops_stream() {
    let dir = tempfile::tempdir().unwrap();
    let video_ts = write_disc(dir.path(), "VIDEO_TS", true);
    fs::write(video_ts.join("VTS_01_4.VOB"), pattern_blocks(0, 1)).unwrap();
    let mut disc = FolderDisc::open(dir.path()).unwrap();

    let title = disc.stat(1, Domain::TitleVobs).unwrap().unwrap();
    assert_eq!(title.parts.len(), 2);
}

#[test]
fn info_bytes_and_backup_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let video_ts = write_disc(dir.path(), "VIDEO_TS", true);
    let expected = fs::read(video_ts.join("VTS_01_0.IFO")).unwrap();
    fs::remove_file(video_ts.join("VTS_01_0.IFO")).unwrap();

    let mut disc = FolderDisc::open(dir.path()).unwrap();
    assert_eq!(disc.info_file_len(1).unwrap(), expected.len() as u64);

    let mut buf = vec![0u8; 16];
    assert_eq!(disc.read_info_bytes(1, 0, &mut buf).unwrap(), 16);
    assert_eq!(&buf[..12], b"DVDVIDEO-VTS");
    let tail = expected.len() as u64 - 4;
    assert_eq!(disc.read_info_bytes(1, tail, &mut buf).unwrap(), 4);
    assert_eq!(
        disc.read_info_bytes(1, expected.len() as u64, &mut buf)
            .unwrap(),
        0
    );
}

#[test]
fn video_manager_rejects_title_requests() {
    let dir = tempfile::tempdir().unwrap();
    write_disc(dir.path(), "VIDEO_TS", true);
    let mut disc = FolderDisc::open(dir.path()).unwrap();
    assert!(matches!(
        disc.title_set_navigation(0),
        Err(DiscError::Unsupported(_))
    ));
    assert!(disc.open_stream(0, Domain::TitleVobs).is_err());
    assert!(disc.open_stream(0, Domain::InfoFile).is_err());
}

#[test]
fn volume_label_is_attached() {
    let dir = tempfile::tempdir().unwrap();
    write_disc(dir.path(), "VIDEO_TS", true);
    let mut disc = FolderDisc::open(dir.path()).unwrap();
    assert_eq!(disc.volume_label(), None);
    let mut disc = disc.with_volume_label("MOVIE");
    assert_eq!(disc.volume_label().as_deref(), Some("MOVIE"));
}

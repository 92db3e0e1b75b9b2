use super::*;
use crate::selector::Acceptance;
use crate::test_support::feature_disc;

#[test]
fn report_of_feature_disc() {
    let mut disc = feature_disc().label("FEATURE_DISC").title(1, 2, 3, 2);
    let report = build_report(&mut disc, AspectRatio::Widescreen).unwrap();

    assert_eq!(report.volume_label.as_deref(), Some("FEATURE_DISC"));
    assert_eq!(report.title_count, 3);

    let names: Vec<&str> = report.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "VIDEO_TS.IFO",
            "VIDEO_TS.VOB",
            "VTS_01_0.IFO",
            "VTS_01_0.VOB",
            "VTS_01_1.VOB",
            "VTS_01_2.VOB",
            "VTS_02_0.IFO",
            "VTS_02_1.VOB",
        ]
    );
    assert_eq!(report.files[4].size, 300 * 2048);
    assert_eq!(report.files[4].title_set, 1);
    assert_eq!(
        report.total_size(),
        (4 + 2 + 4 + 3 + 300 + 200 + 4 + 40) * 2048
    );

    let main = &report.main_feature;
    assert_eq!(main.guess.title_set, 1);
    assert_eq!(main.guess.accepted_by, Acceptance::FirstCandidate);
    assert_eq!(main.aspect_ratio, Some(AspectRatio::Widescreen));
    assert_eq!(main.angles, 2);
    assert_eq!(main.max_chapters, 5);
    assert_eq!(main.audio_tracks, 2);
    assert_eq!(main.max_channels, 6);
    assert_eq!(main.subpictures, 3);

    assert_eq!(report.title_sets.len(), 2);
    let ts1 = &report.title_sets[0];
    assert_eq!(ts1.title_set, 1);
    assert_eq!(ts1.titles.len(), 2);
    assert_eq!(ts1.titles[1].id, 3);
    let ts2 = &report.title_sets[1];
    assert_eq!(ts2.aspect_ratio, AspectRatio::Standard);
    assert_eq!(ts2.titles[0].chapter_count, 2);
}

#[test]
fn report_without_label() {
    let mut disc = feature_disc();
    let report = build_report(&mut disc, AspectRatio::Standard).unwrap();
    assert!(report.volume_label.is_none());
}

#[test]
fn report_needs_the_video_manager() {
    let mut disc = feature_disc();
    disc.fail_video_manager = true;
    assert!(matches!(
        build_report(&mut disc, AspectRatio::Widescreen),
        Err(MirrorError::StructureUnavailable(_))
    ));
}

#[test]
fn main_feature_without_attributes() {
    let mut disc = feature_disc();
    let (titles, sizes) = build_catalogs(&mut disc).unwrap();
    let mut guess = select_main_title_set(&titles, &sizes, AspectRatio::Widescreen);
    guess.title_set = 9;

    let main = main_feature_report(&titles, guess);
    assert_eq!(main.aspect_ratio, None);
    assert_eq!(main.max_chapters, 0);
    assert_eq!(main.audio_tracks, 0);
}

//! `VIDEO_TS` file names.
//!
//! The same names are used on the disc and in the mirrored tree. Title set 0
//! is the video manager (`VIDEO_TS.*`), title sets 1..=99 are `VTS_nn_*`.

/// Highest title VOB part number (`VTS_nn_9.VOB`).
pub const MAX_VOB_PARTS: u8 = 9;

/// Name of the directory holding the DVD-Video files.
pub const VIDEO_TS_DIR: &str = "VIDEO_TS";

/// Info file name; `ext` is `IFO` or `BUP`.
pub fn info_file_name(title_set: u8, ext: &str) -> String {
    if title_set == 0 {
        format!("VIDEO_TS.{}", ext)
    } else {
        format!("VTS_{:02}_0.{}", title_set, ext)
    }
}

pub fn menu_file_name(title_set: u8) -> String {
    if title_set == 0 {
        "VIDEO_TS.VOB".to_string()
    } else {
        format!("VTS_{:02}_0.VOB", title_set)
    }
}

/// Title VOB part name, `part` is 1-based.
pub fn title_part_file_name(title_set: u8, part: u8) -> String {
    format!("VTS_{:02}_{}.VOB", title_set, part)
}

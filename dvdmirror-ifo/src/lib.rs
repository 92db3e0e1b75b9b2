//! DVD-Video structure provider over a `VIDEO_TS` folder.
//!
//! Parses the IFO navigation tables and exposes VOB files as block streams
//! through the [`dvdmirror_core::DiscStructure`] trait.

pub mod folder;
pub mod ifo;
pub mod volume;

pub use folder::{FolderDisc, MultiPartSource};
pub use ifo::{parse_title_set, parse_video_manager};
pub use volume::{read_volume_label, read_volume_label_from_path, title_name_from_label};

#[cfg(test)]
#[path = "tests/images.rs"]
pub(crate) mod test_images;

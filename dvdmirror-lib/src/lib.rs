//! Mirroring of DVD-Video discs into a `VIDEO_TS` tree.
//!
//! The entry points in [`mirror`] take any [`dvdmirror_core::DiscStructure`]
//! and write `<target>/<title_name>/VIDEO_TS/`. Whole discs, single title
//! sets, the guessed main feature or chapter ranges of one title can be
//! copied.

pub mod catalog;
pub mod cells;
pub mod copier;
pub mod error;
pub mod layout;
pub mod mirror;
pub mod options;
pub mod report;
pub mod selector;
pub mod settings;

pub use catalog::{TitleCatalog, TitleRecord, TitleSetCatalog, TitleSetSizes, build_catalogs};
pub use cells::{SectorIndex, SectorRange, resolve_chapter_cells};
pub use copier::{BlockCopier, CopyPlan, CopyStats, MAX_VOB_BLOCKS};
pub use error::MirrorError;
pub use layout::OutputLayout;
pub use mirror::{
    ChapterSelection, MirrorSummary, mirror_chapters, mirror_disc, mirror_main_feature,
    mirror_title, mirror_title_set,
};
pub use options::MirrorOptions;
pub use report::{DiscReport, build_report};
pub use selector::{Acceptance, Classification, MainFeatureGuess, select_main_title_set};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

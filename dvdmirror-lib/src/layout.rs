//! Output directory layout: `<target>/<title_name>/VIDEO_TS/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dvdmirror_core::files::{
    MAX_VOB_PARTS, VIDEO_TS_DIR, info_file_name, menu_file_name, title_part_file_name,
};

use crate::error::MirrorError;

/// Paths of the mirrored files. The `VIDEO_TS` directory exists once this
/// value is created.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    video_ts: PathBuf,
}

impl OutputLayout {
    pub fn create(target: &Path, title_name: &str) -> Result<Self, MirrorError> {
        let root = target.join(title_name);
        let video_ts = root.join(VIDEO_TS_DIR);
        fs::create_dir_all(&video_ts).map_err(|e| MirrorError::io(&video_ts, e))?;
        log::debug!("Writing to {}", video_ts.display());
        Ok(Self { root, video_ts })
    }

    /// `<target>/<title_name>`
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn video_ts_dir(&self) -> &Path {
        &self.video_ts
    }

    pub fn ifo_path(&self, title_set: u8) -> PathBuf {
        self.video_ts.join(info_file_name(title_set, "IFO"))
    }

    pub fn bup_path(&self, title_set: u8) -> PathBuf {
        self.video_ts.join(info_file_name(title_set, "BUP"))
    }

    pub fn menu_vob_path(&self, title_set: u8) -> PathBuf {
        self.video_ts.join(menu_file_name(title_set))
    }

    /// Path of title VOB part `part` (1-based).
    pub fn title_vob_path(&self, title_set: u8, part: u8) -> PathBuf {
        self.video_ts.join(title_part_file_name(title_set, part))
    }

    /// Paths of every allowed title VOB part, 1..=9.
    pub fn title_vob_parts(&self, title_set: u8) -> Vec<PathBuf> {
        (1..=MAX_VOB_PARTS)
            .map(|part| self.title_vob_path(title_set, part))
            .collect()
    }

    /// Delete title VOB parts left over from an earlier run, so a shorter
    /// chapter copy does not leave stale parts behind.
    pub fn remove_title_vobs(&self, title_set: u8) -> Result<(), MirrorError> {
        for path in self.title_vob_parts(title_set) {
            match fs::remove_file(&path) {
                Ok(()) => log::debug!("Removed old {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(MirrorError::io(&path, e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;

//! Volume identifier of a disc device or image.
//!
//! DVD-Video discs carry an ISO 9660 bridge. The primary volume descriptor
//! sits at sector 16 and holds the 32-byte volume identifier at byte 40.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use dvdmirror_core::util::{read_ascii_fixed, title_case_label};
use dvdmirror_core::{DiscError, LOGICAL_BLOCK_BYTES};

/// Primary volume descriptor is always at sector 16.
const PVD_SECTOR: u64 = 16;

const VOLUME_ID_OFFSET: u64 = 40;
const VOLUME_ID_LEN: usize = 32;

/// Read the raw volume identifier, trimmed of padding.
pub fn read_volume_label<R: Read + Seek>(reader: &mut R) -> Result<String, DiscError> {
    reader.seek(SeekFrom::Start(
        PVD_SECTOR * LOGICAL_BLOCK_BYTES + VOLUME_ID_OFFSET,
    ))?;
    let mut raw = [0u8; VOLUME_ID_LEN];
    reader.read_exact(&mut raw)?;

    let label = read_ascii_fixed(&raw);
    if label.is_empty() {
        return Err(DiscError::not_found("volume identifier is empty"));
    }
    Ok(label)
}

/// Open a device node or image file and read its volume identifier.
pub fn read_volume_label_from_path(path: &Path) -> Result<String, DiscError> {
    let mut file = File::open(path)?;
    read_volume_label(&mut file)
}

/// Turn a volume identifier into the output directory name:
/// `"THE_MATRIX"` becomes `"The Matrix"`.
pub fn title_name_from_label(label: &str) -> String {
    title_case_label(label)
}

#[cfg(test)]
#[path = "tests/volume_tests.rs"]
mod tests;

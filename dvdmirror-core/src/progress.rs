use crate::LOGICAL_BLOCK_BYTES;

/// Progress update sent while copying blocks from the disc.
///
/// Delivered through a `&dyn Fn(CopyProgress)` callback. `Advanced` is sent
/// at most once per transfer buffer, never per block.
#[derive(Debug, Clone)]
pub enum CopyProgress {
    /// A new output artifact is being copied
    Started {
        /// Output file name (first part for multi-part copies)
        file: String,
        /// Short human label, e.g. "menu" or "Title, part 2/4"
        label: String,
        total_blocks: u64,
    },

    /// More blocks have been copied
    Advanced { done_blocks: u64, total_blocks: u64 },

    /// Unreadable or unreferenced blocks were replaced by filler
    Padded {
        file: String,
        /// Absolute block offset in the source stream
        block: u32,
        count: u32,
    },

    /// The artifact was written completely
    Finished { file: String },
}

impl CopyProgress {
    pub fn started(file: impl Into<String>, label: impl Into<String>, total_blocks: u64) -> Self {
        Self::Started {
            file: file.into(),
            label: label.into(),
            total_blocks,
        }
    }

    pub fn advanced(done_blocks: u64, total_blocks: u64) -> Self {
        Self::Advanced {
            done_blocks,
            total_blocks,
        }
    }

    /// Returns the progress percentage (0.0 to 100.0) if calculable.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            Self::Advanced {
                done_blocks,
                total_blocks,
            } if *total_blocks > 0 => Some(*done_blocks as f64 / *total_blocks as f64 * 100.0),
            _ => None,
        }
    }

    /// Returns `(done, total)` in MiB for `Advanced` updates.
    pub fn mebibytes(&self) -> Option<(f64, f64)> {
        match self {
            Self::Advanced {
                done_blocks,
                total_blocks,
            } => Some((blocks_to_mib(*done_blocks), blocks_to_mib(*total_blocks))),
            _ => None,
        }
    }
}

/// Convert a block count to MiB.
pub fn blocks_to_mib(blocks: u64) -> f64 {
    (blocks * LOGICAL_BLOCK_BYTES) as f64 / (1024.0 * 1024.0)
}

pub(crate) mod config;
pub(crate) mod info;
pub(crate) mod mirror;

use std::path::{Path, PathBuf};

use dvdmirror_core::DiscStructure;
use dvdmirror_ifo::{FolderDisc, read_volume_label_from_path, title_name_from_label};
use dvdmirror_lib::MirrorOptions;
use dvdmirror_lib::settings::load_mirror_settings;

use crate::cli_types::MirrorArgs;
use crate::error::CliError;

/// Where to read from and what to call the output.
pub(crate) struct Source {
    pub input: PathBuf,
    pub device: Option<PathBuf>,
    pub name: Option<String>,
}

impl Source {
    /// Open the disc, attaching the volume label when a device is given.
    pub(crate) fn open(&self) -> Result<FolderDisc, CliError> {
        let disc = FolderDisc::open(&self.input)?;
        log::debug!("Reading {}", disc.video_ts_dir().display());

        match self.device.as_deref().map(read_label) {
            Some(Some(label)) => Ok(disc.with_volume_label(label)),
            _ => Ok(disc),
        }
    }

    /// `--name`, then the volume label, then the folder above `VIDEO_TS`.
    pub(crate) fn title_name(&self, disc: &mut FolderDisc) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let from_label = disc
            .volume_label()
            .map(|label| title_name_from_label(&label));
        match from_label.or_else(|| disc.folder_name()) {
            Some(name) if !name.is_empty() => name,
            _ => {
                log::warn!("Could not determine a title name, using 'unknown'");
                "unknown".to_string()
            }
        }
    }
}

fn read_label(device: &Path) -> Option<String> {
    match read_volume_label_from_path(device) {
        Ok(label) => Some(label),
        Err(e) => {
            log::warn!("Could not read the volume label of {}: {}", device.display(), e);
            None
        }
    }
}

/// Built-in defaults, overlaid with `settings.toml`, overlaid with flags.
pub(crate) fn mirror_options(args: &MirrorArgs) -> MirrorOptions {
    let mut options = load_mirror_settings().apply(MirrorOptions::default());
    if let Some(strategy) = args.strategy {
        options = options.strategy(strategy);
    }
    if let Some(aspect) = args.aspect {
        options = options.preferred_aspect(aspect);
    }
    if let Some(gap_fill) = args.gap_fill {
        options = options.gap_fill(gap_fill);
    }
    if args.progress {
        options = options.progress(true);
    }
    options
}

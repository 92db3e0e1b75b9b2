//! Persistent defaults for the mirroring options.
//!
//! The settings file is `~/.config/dvdmirror/settings.toml`. Its `[mirror]`
//! table supplies defaults that command-line flags override:
//!
//! ```toml
//! [mirror]
//! strategy = "skip-unused"
//! aspect = "4:3"
//! gap_fill = "seek"
//! progress = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dvdmirror_core::{AspectRatio, ErrorStrategy, GapFill};
use serde::Deserialize;

use crate::options::MirrorOptions;

/// Keys accepted under `[mirror]`.
pub const SETTING_KEYS: &[&str] = &["strategy", "aspect", "gap_fill", "progress"];

/// Canonical path to the settings file: `~/.config/dvdmirror/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("dvdmirror").join("settings.toml")
}

/// The `[mirror]` table. Absent keys keep the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    pub strategy: Option<ErrorStrategy>,
    pub aspect: Option<String>,
    pub gap_fill: Option<GapFill>,
    pub progress: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    mirror: MirrorSettings,
}

impl MirrorSettings {
    /// Overlay these settings on `options`.
    pub fn apply(&self, mut options: MirrorOptions) -> MirrorOptions {
        if let Some(strategy) = self.strategy {
            options.strategy = strategy;
        }
        if let Some(aspect) = &self.aspect {
            match aspect.parse::<AspectRatio>() {
                Ok(aspect) => options.preferred_aspect = aspect,
                Err(e) => log::warn!("Ignoring mirror.aspect in settings: {}", e),
            }
        }
        if let Some(gap_fill) = self.gap_fill {
            options.gap_fill = gap_fill;
        }
        if let Some(progress) = self.progress {
            options.progress = progress;
        }
        options
    }
}

/// Read `[mirror]` from a settings file. A missing file gives the defaults.
pub fn load_mirror_settings_from(path: &Path) -> io::Result<MirrorSettings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(MirrorSettings::default()),
        Err(e) => return Err(e),
    };
    let file: SettingsFile = toml::from_str(&contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(file.mirror)
}

/// Read `[mirror]` from the canonical settings file. Problems are logged and
/// the defaults used.
pub fn load_mirror_settings() -> MirrorSettings {
    let path = settings_path();
    load_mirror_settings_from(&path).unwrap_or_else(|e| {
        log::warn!("Ignoring {}: {}", path.display(), e);
        MirrorSettings::default()
    })
}

/// Check a `[mirror]` value and convert it to its stored form.
fn setting_value(key: &str, value: &str) -> io::Result<toml::Value> {
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidInput, msg);
    match key {
        "strategy" => value
            .parse::<ErrorStrategy>()
            .map(|s| toml::Value::String(s.short_name().to_string()))
            .map_err(|e| invalid(format!("strategy: {}", e))),
        "aspect" => value
            .parse::<AspectRatio>()
            .map(|a| toml::Value::String(a.to_string()))
            .map_err(|e| invalid(format!("aspect: {}", e))),
        "gap_fill" => value
            .parse::<GapFill>()
            .map(|g| toml::Value::String(g.short_name().to_string()))
            .map_err(|e| invalid(format!("gap_fill: {}", e))),
        "progress" => value
            .trim()
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|_| invalid(format!("progress: expected true or false, got '{}'", value))),
        other => Err(invalid(format!(
            "unknown setting '{}' (expected one of: {})",
            other,
            SETTING_KEYS.join(", ")
        ))),
    }
}

/// Set `mirror.<key>` in the canonical settings file.
pub fn save_setting(key: &str, value: &str) -> io::Result<()> {
    save_setting_to(&settings_path(), key, value)
}

/// Set `mirror.<key>` in `path`.
///
/// Uses `toml::Value` for a surgical update so other tables and keys are
/// preserved. The file is replaced atomically.
pub fn save_setting_to(path: &Path, key: &str, value: &str) -> io::Result<()> {
    let value = setting_value(key, value)?;

    let mut doc: toml::Value = if let Ok(contents) = fs::read_to_string(path) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let mirror = table
        .entry("mirror")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let mirror_table = mirror
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[mirror] is not a table"))?;
    mirror_table.insert(key.to_string(), value);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, &serialized)?;
    fs::rename(&tmp, path)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;

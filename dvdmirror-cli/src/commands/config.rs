use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvdmirror_lib::settings::{
    SETTING_KEYS, load_settings_string, save_setting, settings_path,
};

use crate::error::CliError;

/// Show the settings file and where it lives.
pub(crate) fn run_config_show() {
    let path = settings_path();

    log::info!(
        "{}",
        "dvdmirror Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    match load_settings_string() {
        Some(contents) if !contents.trim().is_empty() => {
            for line in contents.lines() {
                log::info!("  {}", line);
            }
        }
        _ => {
            log::info!(
                "  {}",
                "No settings saved, built-in defaults apply".if_supports_color(Stdout, |t| t.dimmed())
            );
        }
    }
    crate::log_blank();
    log::info!("  Keys: {}", SETTING_KEYS.join(", "));
}

/// Print the settings file path, for scripts.
pub(crate) fn run_config_path() {
    println!("{}", settings_path().display());
}

/// Store one `[mirror]` default.
pub(crate) fn run_config_set(key: &str, value: &str) -> Result<(), CliError> {
    save_setting(key, value).map_err(|e| CliError::config(e.to_string()))?;
    log::info!(
        "{} mirror.{} = {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key,
        value
    );
    Ok(())
}

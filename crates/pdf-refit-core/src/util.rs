//! Utility functions shared across the crate.

use std::path::PathBuf;

/// Get the user's config directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

/// Default file name for the composite document: `<prefix>_<ISO-date>.pdf`.
pub fn output_filename(prefix: &str) -> String {
    format!("{prefix}_{}.pdf", chrono::Local::now().format("%Y-%m-%d"))
}

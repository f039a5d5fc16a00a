//! XDG Base Directory paths for lessons.
//!
//! The CLI resolves its config file and default lesson catalog from here.
//! XDG paths are used on every platform so the layout matches what users
//! of `gh` or `kubectl` already expect.

use std::path::PathBuf;

const APP_DIR: &str = "lessons";

/// Get the lessons config directory.
///
/// Returns `$XDG_CONFIG_HOME/lessons` if set, otherwise `~/.config/lessons`.
///
/// # Examples
///
/// ```
/// use lessons_paths::config_dir;
///
/// let catalog = config_dir().join("lessons.json");
/// assert!(catalog.ends_with("lessons/lessons.json"));
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config").join(APP_DIR)
    } else {
        PathBuf::from(".config").join(APP_DIR)
    }
}

/// Path of the user-level config file.
pub fn user_config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default location of the lesson catalog when none is configured.
pub fn default_catalog_file() -> PathBuf {
    config_dir().join("lessons.json")
}

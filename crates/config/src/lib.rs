//! Settings shared by the WebKeyBind crates.
//!
//! Settings are written in RON. Every field has a default, so an empty file
//! (`()`) is a complete configuration, and unknown fields are rejected so
//! typos surface as parse errors with a caret excerpt.

use std::{
    env,
    path::{Path, PathBuf},
};

mod defaults;
mod error;
mod loader;
mod settings;

pub use error::{Error, excerpt_at};
pub use loader::{from_ron, load_from_path};
pub use settings::{
    NotificationSettings, PickerSettings, SelectorSettings, Settings, StorageSettings,
};

/// Determine the preferred user settings path (`~/.webkeybind/settings.ron`).
pub fn default_settings_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".webkeybind");
    p.push("settings.ron");
    p
}

/// Resolve the settings to use.
///
/// Policy:
/// 1) Load `explicit` when provided; it must exist.
/// 2) Else load `~/.webkeybind/settings.ron` when it exists.
/// 3) Else use the built-in defaults.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings, Error> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let preferred = default_settings_path();
    if preferred.exists() {
        return load_from_path(&preferred);
    }
    Ok(Settings::default())
}

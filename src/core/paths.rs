// src/core/paths.rs

use crate::constants::{CONFIG_FILENAME, LOG_FILENAME, PROGRAM_NAME, STORAGE_DIR_NAME};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a user-supplied path into a real one.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion { path: String, reason: String },
}

/// Returns the per-user storage directory (`~/.pip`, `%HOME%\pip` on Windows).
pub fn storage_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STORAGE_DIR_NAME))
}

/// The conventional configuration file locations, in search order.
///
/// The legacy storage-directory file comes first; the platform config
/// directory (`~/.config/pip/pip.conf` on Linux) is the fallback.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = storage_dir() {
        candidates.push(dir.join(CONFIG_FILENAME));
    }
    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join(PROGRAM_NAME).join(CONFIG_FILENAME);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Default for the `log_file` option.
pub fn default_log_file() -> Option<String> {
    storage_dir().map(|dir| dir.join(LOG_FILENAME).display().to_string())
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// True for the platform's null device, which disables the config file.
pub fn is_null_device(path: &Path) -> bool {
    let as_str = path.to_string_lossy();
    if cfg!(windows) {
        as_str.eq_ignore_ascii_case("nul")
    } else {
        as_str == "/dev/null"
    }
}

/// Best-effort absolute path for log messages; falls back to the input.
pub fn display_path(path: &Path) -> String {
    dunce::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

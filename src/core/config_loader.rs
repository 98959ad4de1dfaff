//! # Config Loader
//!
//! Locates the user's configuration file and parses it into sections.
//!
//! Exactly one file is read per invocation: the path named by `PIP_CONFIG_FILE`
//! when it is set, otherwise the first existing file from the conventional
//! search order. The format is INI-like:
//!
//! ```text
//! [global]
//! timeout = 60
//!
//! [install]
//! find-links =
//!     http://mirror.example/simple
//!     http://other.example/simple
//! ```
use crate::{
    constants::CONFIG_FILE_ENV,
    core::{
        environment::Environment,
        paths::{self, PathError},
    },
    dev_utils,
    models::{ConfigFile, ConfigSection, normalize_key},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^\[(?P<header>[^\]]+)\]").unwrap();
    static ref OPTION_RE: Regex =
        Regex::new(r"^(?P<option>[^:=\s][^:=]*?)\s*[:=]\s*(?P<value>.*)$").unwrap();
}

/// Errors from finding, reading or parsing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Could not read configuration file '{path}' named by {var}")]
    UnreadableOverride {
        path: String,
        var: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("File contains no section headers.\nfile: '{path}', line: {line}\n{content:?}")]
    MissingSectionHeader {
        path: String,
        line: usize,
        content: String,
    },
    #[error("Malformed line in configuration file '{path}', line {line}: {content:?}")]
    MalformedLine {
        path: String,
        line: usize,
        content: String,
    },
    #[error("Invalid value {value:?} for '{key}' in section [{section}] of '{path}': {reason}")]
    InvalidValue {
        path: String,
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Finds and loads the configuration file for one invocation.
#[derive(Debug)]
pub struct ConfigLoader<'a> {
    env: &'a Environment,
    search_paths: Vec<PathBuf>,
}

impl<'a> ConfigLoader<'a> {
    /// Creates a loader using the conventional search locations.
    pub fn new(env: &'a Environment) -> Self {
        Self {
            env,
            search_paths: paths::config_search_paths(),
        }
    }

    /// Replaces the conventional search locations.
    pub fn with_search_paths(mut self, search_paths: Vec<PathBuf>) -> Self {
        self.search_paths = search_paths;
        self
    }

    /// Loads zero or one configuration file.
    ///
    /// An override path that cannot be read is fatal. When no override is set
    /// and no conventional file exists, an empty `ConfigFile` is returned.
    pub fn load(&self) -> Result<ConfigFile, ConfigLoadError> {
        let _timer = dev_utils::BlockTimer::new("ConfigLoader::load");

        if let Some(raw) = self.env.get(CONFIG_FILE_ENV) {
            let path = paths::expand_user_path(raw)?;
            if paths::is_null_device(&path) {
                log::debug!("{} points at the null device; no configuration loaded.", CONFIG_FILE_ENV);
                return Ok(ConfigFile::empty());
            }
            let content =
                fs::read_to_string(&path).map_err(|source| ConfigLoadError::UnreadableOverride {
                    path: path.display().to_string(),
                    var: CONFIG_FILE_ENV,
                    source,
                })?;
            log::debug!("Loading configuration from {} ({}).", paths::display_path(&path), CONFIG_FILE_ENV);
            return parse_config_file(&content, &path);
        }

        for candidate in &self.search_paths {
            if !candidate.is_file() {
                log::trace!("No configuration file at {}", candidate.display());
                continue;
            }
            match fs::read_to_string(candidate) {
                Ok(content) => {
                    log::debug!("Loading configuration from {}.", paths::display_path(candidate));
                    return parse_config_file(&content, candidate);
                }
                Err(e) => {
                    log::warn!(
                        "Skipping unreadable configuration file {}: {}",
                        candidate.display(),
                        e
                    );
                }
            }
        }

        log::debug!("No configuration file found.");
        Ok(ConfigFile::empty())
    }
}

/// Parses the content of a configuration file read from `path`.
pub fn parse_config_file(content: &str, path: &Path) -> Result<ConfigFile, ConfigLoadError> {
    let display = path.display().to_string();
    let mut sections: Vec<ConfigSection> = Vec::new();
    let mut current: Option<usize> = None;
    // Key of the entry that indented continuation lines extend.
    let mut last_key: Option<String> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with(char::is_whitespace)
            && let (Some(section_idx), Some(key)) = (current, &last_key)
            && let Some(entry) = sections[section_idx].entries.get_mut(key)
        {
            if !entry.is_empty() {
                entry.push('\n');
            }
            entry.push_str(trimmed);
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(trimmed) {
            let name = caps["header"].trim().to_string();
            let section_idx = match sections.iter().position(|s| s.name == name) {
                Some(existing) => existing,
                None => {
                    sections.push(ConfigSection::new(name));
                    sections.len() - 1
                }
            };
            log::trace!("[{}] at line {}", sections[section_idx].name, line_no);
            current = Some(section_idx);
            last_key = None;
            continue;
        }

        let Some(section_idx) = current else {
            return Err(ConfigLoadError::MissingSectionHeader {
                path: display,
                line: line_no,
                content: line.to_string(),
            });
        };

        let Some(caps) = OPTION_RE.captures(trimmed) else {
            return Err(ConfigLoadError::MalformedLine {
                path: display,
                line: line_no,
                content: line.to_string(),
            });
        };

        let key = normalize_key(&caps["option"].to_lowercase());
        let value = strip_inline_comment(&caps["value"]).trim().to_string();
        sections[section_idx].entries.insert(key.clone(), value);
        last_key = Some(key);
    }

    Ok(ConfigFile {
        path: Some(path.to_path_buf()),
        sections,
    })
}

/// Drops a `;` comment when it is preceded by whitespace.
fn strip_inline_comment(value: &str) -> &str {
    match value.find(';') {
        Some(pos) if pos > 0 && value[..pos].ends_with(char::is_whitespace) => &value[..pos],
        _ => value,
    }
}

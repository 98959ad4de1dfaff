// src/core/environment.rs

//! Process environment capture and the environment layer of option resolution.

use crate::models::{OptionKind, OptionSpec, OptionValue};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvironmentParseError {
    #[error("Environment variable {var} is set but empty; expected 0 or 1.")]
    EmptyFlag { var: String },
    #[error("Environment variable {var} is set but contains no values.")]
    EmptyList { var: String },
    #[error("Environment variable {var} must be a non-negative integer, got {value:?}.")]
    InvalidCount { var: String, value: String },
}

/// A snapshot of the process environment taken once at start-up.
///
/// Every component reads variables through this snapshot, which keeps
/// resolution deterministic and lets tests supply their own variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot of the process environment. Variables that are not UTF-8 are skipped.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// True when the variable is set, even to an empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}

/// Converts the recognized variables for `options` into option values.
///
/// Options without an environment variable, or whose variable is absent,
/// contribute nothing.
pub fn map_environment(
    env: &Environment,
    options: &[&OptionSpec],
) -> Result<Vec<(&'static str, OptionValue)>, EnvironmentParseError> {
    let mut contributions = Vec::new();
    for option in options {
        let Some(var) = option.env_var else {
            continue;
        };
        let Some(raw) = env.get(var) else {
            continue;
        };
        let value = parse_env_value(option.kind, var, raw)?;
        log::trace!("Environment {} -> {} = {:?}", var, option.name, value);
        contributions.push((option.name, value));
    }
    Ok(contributions)
}

fn parse_env_value(
    kind: OptionKind,
    var: &str,
    raw: &str,
) -> Result<OptionValue, EnvironmentParseError> {
    match kind {
        OptionKind::Flag => {
            if raw.is_empty() {
                return Err(EnvironmentParseError::EmptyFlag {
                    var: var.to_string(),
                });
            }
            Ok(OptionValue::Flag(raw != "0"))
        }
        OptionKind::List => {
            let items: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
            if items.is_empty() {
                return Err(EnvironmentParseError::EmptyList {
                    var: var.to_string(),
                });
            }
            Ok(OptionValue::List(items))
        }
        OptionKind::String => Ok(OptionValue::Text(Some(raw.to_string()))),
        OptionKind::Count => raw
            .trim()
            .parse::<u32>()
            .map(OptionValue::Count)
            .map_err(|_| EnvironmentParseError::InvalidCount {
                var: var.to_string(),
                value: raw.to_string(),
            }),
    }
}

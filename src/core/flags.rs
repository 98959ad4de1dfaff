// src/core/flags.rs

//! Schema-driven command-line flag parsing.
//!
//! Tokens are classified the way classic `optparse`-style tools do it:
//! - `--name` / `--name=value` / `--name value` for long options,
//! - `-x`, `-xvalue`, `-x value` and bundles such as `-vvv` for short options,
//! - `--` ends option parsing; a lone `-` is positional.
//!
//! Only the options handed to the parser are recognized, which is how each
//! command gets its own option set.

use crate::models::{OptionKind, OptionSpec, OptionValue, normalize_key};
use thiserror::Error;

/// A malformed command line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("no such option: {0}")]
    NoSuchOption(String),
    #[error("{0} option requires an argument")]
    MissingValue(String),
    #[error("{0} option does not take a value")]
    UnexpectedValue(String),
    #[error("You must pass {0}")]
    MissingShell(String),
    #[error("Only one of {0} may be given")]
    ConflictingShells(String),
    #[error("Invalid {var} value {value:?}; expected a word index")]
    InvalidCompletionIndex { var: &'static str, value: String },
}

/// One option as it appeared on the command line.
#[derive(Debug, Clone)]
pub struct FlagOccurrence {
    pub option: &'static OptionSpec,
    /// `None` for switches, the argument for options that take one.
    pub value: Option<String>,
}

/// The result of parsing one run of command-line tokens.
#[derive(Debug, Clone, Default)]
pub struct ParsedFlags {
    /// Options in the order they appeared.
    pub occurrences: Vec<FlagOccurrence>,
    /// Everything that is not an option, in order.
    pub positional: Vec<String>,
}

impl ParsedFlags {
    /// True when the option appeared at least once.
    pub fn has(&self, name: &str) -> bool {
        let key = normalize_key(name);
        self.occurrences.iter().any(|o| o.option.name == key)
    }

    /// Appends another run of parsed tokens (used to join the flags given
    /// before the command name with those given after it).
    pub fn extend(&mut self, other: ParsedFlags) {
        self.occurrences.extend(other.occurrences);
        self.positional.extend(other.positional);
    }

    /// The command-line layer: one contribution per option, in first-seen order.
    ///
    /// Switches become `Flag(true)`, strings keep the last value, lists keep
    /// every value in order and counts hold the number of occurrences, which
    /// the merger adds to the value from earlier layers.
    pub fn contributions(&self) -> Vec<(&'static str, OptionValue)> {
        let mut out: Vec<(&'static str, OptionValue)> = Vec::new();
        for occurrence in &self.occurrences {
            let name = occurrence.option.name;
            let slot = match out.iter().position(|(n, _)| *n == name) {
                Some(idx) => idx,
                None => {
                    let initial = match occurrence.option.kind {
                        OptionKind::Flag => OptionValue::Flag(true),
                        OptionKind::String => OptionValue::Text(None),
                        OptionKind::List => OptionValue::List(Vec::new()),
                        OptionKind::Count => OptionValue::Count(0),
                    };
                    out.push((name, initial));
                    out.len() - 1
                }
            };
            match (&mut out[slot].1, &occurrence.value) {
                (OptionValue::Text(current), Some(v)) => *current = Some(v.clone()),
                (OptionValue::List(items), Some(v)) => items.push(v.clone()),
                (OptionValue::Count(n), _) => *n = n.saturating_add(1),
                _ => {}
            }
        }
        out
    }
}

/// Parses `tokens` against `options`.
///
/// With `stop_at_positional`, parsing ends at the first positional token and
/// that token plus everything after it is returned untouched in `positional`.
/// This is how the flags before a command name are separated from the
/// command's own arguments.
pub fn parse_flags(
    tokens: &[String],
    options: &[&'static OptionSpec],
    stop_at_positional: bool,
) -> Result<ParsedFlags, UsageError> {
    let mut parsed = ParsedFlags::default();
    let mut iter = tokens.iter().enumerate();

    while let Some((idx, token)) = iter.next() {
        if token == "--" {
            parsed.positional.extend(iter.by_ref().map(|(_, t)| t.clone()));
            break;
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name, inline_value) = match body.split_once('=') {
                Some((n, v)) => (n, Some(v.to_string())),
                None => (body, None),
            };
            let spelled = format!("--{}", name);
            let key = normalize_key(name);
            let option = options
                .iter()
                .copied()
                .find(|o| o.name == key)
                .ok_or_else(|| UsageError::NoSuchOption(spelled.clone()))?;

            let value = if option.kind.takes_value() {
                match inline_value {
                    Some(v) => Some(v),
                    None => Some(
                        iter.next()
                            .map(|(_, t)| t.clone())
                            .ok_or_else(|| UsageError::MissingValue(spelled.clone()))?,
                    ),
                }
            } else {
                if inline_value.is_some() {
                    return Err(UsageError::UnexpectedValue(spelled));
                }
                None
            };
            parsed.occurrences.push(FlagOccurrence { option, value });
            continue;
        }

        if let Some(cluster) = token.strip_prefix('-')
            && !cluster.is_empty()
        {
            for (pos, c) in cluster.char_indices() {
                let spelled = format!("-{}", c);
                let option = options
                    .iter()
                    .copied()
                    .find(|o| o.short == Some(c))
                    .ok_or_else(|| UsageError::NoSuchOption(spelled.clone()))?;

                if option.kind.takes_value() {
                    let rest = &cluster[pos + c.len_utf8()..];
                    let value = if !rest.is_empty() {
                        rest.to_string()
                    } else {
                        iter.next()
                            .map(|(_, t)| t.clone())
                            .ok_or(UsageError::MissingValue(spelled))?
                    };
                    parsed.occurrences.push(FlagOccurrence {
                        option,
                        value: Some(value),
                    });
                    break;
                }
                parsed.occurrences.push(FlagOccurrence {
                    option,
                    value: None,
                });
            }
            continue;
        }

        if stop_at_positional {
            parsed
                .positional
                .extend(tokens[idx..].iter().cloned());
            break;
        }
        parsed.positional.push(token.clone());
    }

    Ok(parsed)
}

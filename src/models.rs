// src/models.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Replaces `-` with `_` so that `no-index`, `--no-index` spelled without its
/// dashes and `no_index` all land on the same key.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('-', "_")
}

// --- OPTION SCHEMA MODELS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// A boolean switch that takes no value.
    Flag,
    /// A single string value; later layers replace earlier ones.
    String,
    /// An accumulating list; every layer appends.
    List,
    /// A repeatable switch such as `-vvv`.
    Count,
}

impl OptionKind {
    pub fn takes_value(self) -> bool {
        matches!(self, OptionKind::String | OptionKind::List)
    }
}

/// Where a flag is accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    /// Only before the command name (`pip --version`).
    TopLevel,
    /// Everywhere, before or after the command name.
    General,
    /// Only for the commands that list it in `own_options`.
    Command,
}

#[derive(Debug, Clone, Copy)]
pub enum OptionDefault {
    None,
    Flag(bool),
    Text(&'static str),
    List(&'static [&'static str]),
    Count(u32),
    /// A default that depends on the running system, such as the home directory.
    Computed(fn() -> Option<String>),
}

/// Static declaration of a single option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Canonical, underscore-normalized name.
    pub name: &'static str,
    pub long: &'static str,
    pub short: Option<char>,
    pub kind: OptionKind,
    pub scope: OptionScope,
    pub env_var: Option<&'static str>,
    pub default: OptionDefault,
    pub metavar: &'static str,
    pub help: &'static str,
    /// Hidden options are accepted but never listed or completed.
    pub hidden: bool,
}

impl OptionSpec {
    /// The spelling used in help output and completion (`--index-url`).
    pub fn flag_spelling(&self) -> String {
        format!("--{}", self.long)
    }

    pub fn default_value(&self) -> OptionValue {
        match (self.kind, self.default) {
            (OptionKind::Flag, OptionDefault::Flag(b)) => OptionValue::Flag(b),
            (OptionKind::Flag, _) => OptionValue::Flag(false),
            (OptionKind::Count, OptionDefault::Count(n)) => OptionValue::Count(n),
            (OptionKind::Count, _) => OptionValue::Count(0),
            (OptionKind::List, OptionDefault::List(items)) => {
                OptionValue::List(items.iter().map(|s| s.to_string()).collect())
            }
            (OptionKind::List, _) => OptionValue::List(Vec::new()),
            (OptionKind::String, OptionDefault::Text(s)) => OptionValue::Text(Some(s.to_string())),
            (OptionKind::String, OptionDefault::Computed(f)) => OptionValue::Text(f()),
            (OptionKind::String, _) => OptionValue::Text(None),
        }
    }
}

// --- CONFIG FILE MODELS ---

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSection {
    pub name: String,
    /// Normalized key -> raw value.
    pub entries: BTreeMap<String, String>,
}

impl ConfigSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_key(key)).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// The file the sections were read from. `None` when no file was found.
    pub path: Option<PathBuf>,
    pub sections: Vec<ConfigSection>,
}

impl ConfigFile {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&ConfigSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// --- RESOLUTION MODELS ---

/// The five configuration sources, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Default,
    ConfigGlobal,
    ConfigCommand,
    Environment,
    CommandLine,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Layer::Default => "default",
            Layer::ConfigGlobal => "config [global]",
            Layer::ConfigCommand => "config [command]",
            Layer::Environment => "environment",
            Layer::CommandLine => "command line",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Text(Option<String>),
    List(Vec<String>),
    Count(u32),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag(b) => write!(f, "{}", b),
            OptionValue::Text(Some(s)) => f.write_str(s),
            OptionValue::Text(None) => f.write_str("<unset>"),
            OptionValue::List(items) => {
                let rendered = serde_json::to_string(items).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            OptionValue::Count(n) => write!(f, "{}", n),
        }
    }
}

/// The single, immutable configuration handed to an executing command.
///
/// Serializes as `{"command", "values", "origins"}` for the run logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    command: String,
    values: BTreeMap<String, OptionValue>,
    origins: BTreeMap<String, Layer>,
}

impl ResolvedConfig {
    pub(crate) fn new(
        command: String,
        values: BTreeMap<String, OptionValue>,
        origins: BTreeMap<String, Layer>,
    ) -> Self {
        Self {
            command,
            values,
            origins,
        }
    }

    /// Name of the command this configuration was resolved for.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(&normalize_key(name))
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(OptionValue::Flag(true)))
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(OptionValue::Text(Some(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(OptionValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn count(&self, name: &str) -> u32 {
        match self.get(name) {
            Some(OptionValue::Count(n)) => *n,
            _ => 0,
        }
    }

    /// The last layer that contributed to `name`.
    pub fn origin(&self, name: &str) -> Option<Layer> {
        self.origins.get(&normalize_key(name)).copied()
    }

    /// `verbose - quiet`, the console verbosity of the run.
    pub fn verbosity(&self) -> i64 {
        i64::from(self.count("verbose")) - i64::from(self.count("quiet"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// --- COMMAND MODELS ---

/// The closed set of commands the tool knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Bundle,
    Completion,
    Freeze,
    Help,
    Install,
    Search,
    Uninstall,
    Unzip,
    Zip,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    pub kind: CommandKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Hidden commands are dispatchable by exact name but never listed.
    pub hidden: bool,
    pub summary: &'static str,
    pub usage: &'static str,
    /// Canonical names of the command-scoped options this command accepts.
    pub own_options: &'static [&'static str],
}

impl CommandDescriptor {
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

// --- COMPLETION MODELS ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    /// Tokens of the command line; the first one is the program name.
    pub words: Vec<String>,
    /// Index into `words` of the token being completed. May equal `words.len()`.
    pub cursor_index: usize,
}

impl CompletionContext {
    pub fn new(words: Vec<String>, cursor_index: usize) -> Self {
        Self {
            words,
            cursor_index,
        }
    }

    /// The partial token under the cursor, empty when the cursor is past the end.
    pub fn current(&self) -> &str {
        self.words
            .get(self.cursor_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Tokens between the program name and the cursor.
    pub fn preceding(&self) -> &[String] {
        let end = self.cursor_index.min(self.words.len());
        if end <= 1 { &[] } else { &self.words[1..end] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_replaces_hyphens() {
        assert_eq!(normalize_key("config-item"), "config_item");
        assert_eq!(normalize_key(" no-index "), "no_index");
        assert_eq!(normalize_key("config_item"), "config_item");
    }

    #[test]
    fn test_resolved_config_accessors_normalize() {
        let mut values = BTreeMap::new();
        values.insert("no_index".to_string(), OptionValue::Flag(true));
        values.insert(
            "find_links".to_string(),
            OptionValue::List(vec!["a".into(), "b".into()]),
        );
        let config = ResolvedConfig::new("install".into(), values, BTreeMap::new());

        assert!(config.flag("no-index"));
        assert!(config.flag("no_index"));
        assert_eq!(config.list("find-links"), &["a".to_string(), "b".to_string()]);
        assert!(config.string("index-url").is_none());
    }

    #[test]
    fn test_completion_context_current_past_end() {
        let ctx = CompletionContext::new(vec!["pip".into(), "install".into()], 2);
        assert_eq!(ctx.current(), "");
        assert_eq!(ctx.preceding(), &["install".to_string()]);
    }

    #[test]
    fn test_completion_context_preceding_at_start() {
        let ctx = CompletionContext::new(vec!["pip".into(), "un".into()], 1);
        assert_eq!(ctx.current(), "un");
        assert!(ctx.preceding().is_empty());
    }

    #[test]
    fn test_option_value_display_list() {
        let value = OptionValue::List(vec!["a".into(), "b c".into()]);
        assert_eq!(value.to_string(), r#"["a","b c"]"#);
    }
}

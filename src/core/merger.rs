// src/core/merger.rs

//! The precedence merger.
//!
//! Five layers are applied in a fixed order, each one on top of the last:
//!
//! 1. option defaults,
//! 2. the `[global]` section of the configuration file,
//! 3. the section named after the command,
//! 4. the process environment,
//! 5. the command-line flags.
//!
//! Flags and strings are replaced by any later layer that supplies them. Lists
//! accumulate: every layer appends, none removes. Counts are replaced by the
//! file and environment layers; the command line adds its occurrences on top,
//! so `-vv` with `PIP_VERBOSE=1` gives a verbosity of three.

use crate::{
    constants::GLOBAL_SECTION,
    core::{
        config_loader::ConfigLoadError,
        environment::{self, Environment, EnvironmentParseError},
        flags::ParsedFlags,
        schema,
    },
    dev_utils,
    models::{
        CommandDescriptor, ConfigFile, ConfigSection, Layer, OptionKind, OptionSpec, OptionValue,
        ResolvedConfig,
    },
};
use std::collections::BTreeMap;
use thiserror::Error;

/// A layer that could not be turned into option values.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error(transparent)]
    Environment(#[from] EnvironmentParseError),
}

/// Builds the `ResolvedConfig` for one command.
pub fn resolve(
    command: &CommandDescriptor,
    config: &ConfigFile,
    env: &Environment,
    cli: &ParsedFlags,
) -> Result<ResolvedConfig, ResolveError> {
    let _timer = dev_utils::BlockTimer::new("merger::resolve");
    let options = schema::options_for(command);
    let mut acc = Accumulator::with_defaults(&options);

    if let Some(section) = config.section(GLOBAL_SECTION) {
        for (name, value) in section_values(config, section, &options)? {
            acc.apply(Layer::ConfigGlobal, name, value);
        }
    }

    if let Some(section) = config.section(command.name) {
        for (name, value) in section_values(config, section, &options)? {
            acc.apply(Layer::ConfigCommand, name, value);
        }
    }

    for (name, value) in environment::map_environment(env, &options)? {
        acc.apply(Layer::Environment, name, value);
    }

    for (name, value) in cli.contributions() {
        if acc.is_known(name) {
            acc.apply(Layer::CommandLine, name, value);
        }
    }

    log::debug!(
        "Resolved {} options for '{}'.",
        acc.values.len(),
        command.name
    );
    Ok(ResolvedConfig::new(
        command.name.to_string(),
        acc.values,
        acc.origins,
    ))
}

struct Accumulator {
    kinds: BTreeMap<&'static str, OptionKind>,
    values: BTreeMap<String, OptionValue>,
    origins: BTreeMap<String, Layer>,
}

impl Accumulator {
    fn with_defaults(options: &[&'static OptionSpec]) -> Self {
        let mut acc = Self {
            kinds: BTreeMap::new(),
            values: BTreeMap::new(),
            origins: BTreeMap::new(),
        };
        for option in options {
            acc.kinds.insert(option.name, option.kind);
            acc.values.insert(option.name.to_string(), option.default_value());
            acc.origins.insert(option.name.to_string(), Layer::Default);
        }
        acc
    }

    fn is_known(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    fn apply(&mut self, layer: Layer, name: &str, value: OptionValue) {
        let Some(slot) = self.values.get_mut(name) else {
            return;
        };
        match (slot, value) {
            (OptionValue::List(items), OptionValue::List(extra)) => items.extend(extra),
            (OptionValue::Count(n), OptionValue::Count(extra)) if layer == Layer::CommandLine => {
                *n = n.saturating_add(extra);
            }
            (OptionValue::Text(_), OptionValue::Text(None)) => return,
            (slot, value) => *slot = value,
        }
        log::trace!("{} <- {}", name, layer);
        self.origins.insert(name.to_string(), layer);
    }
}

/// Converts the entries of one config section into option values.
///
/// Keys that name no option in scope are ignored.
fn section_values(
    config: &ConfigFile,
    section: &ConfigSection,
    options: &[&'static OptionSpec],
) -> Result<Vec<(&'static str, OptionValue)>, ConfigLoadError> {
    let mut out = Vec::new();
    for (key, raw) in &section.entries {
        let Some(option) = options.iter().find(|o| o.name == key.as_str()) else {
            log::debug!("Ignoring [{}] {}: not an option of this command.", section.name, key);
            continue;
        };
        let value = parse_config_value(option.kind, raw).map_err(|reason| {
            ConfigLoadError::InvalidValue {
                path: config
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                section: section.name.clone(),
                key: key.clone(),
                value: raw.clone(),
                reason,
            }
        })?;
        out.push((option.name, value));
    }
    Ok(out)
}

fn parse_config_value(kind: OptionKind, raw: &str) -> Result<OptionValue, String> {
    match kind {
        OptionKind::Flag => parse_bool(raw).map(OptionValue::Flag),
        OptionKind::String => Ok(OptionValue::Text(Some(raw.to_string()))),
        OptionKind::List => Ok(OptionValue::List(
            raw.split_whitespace().map(str::to_string).collect(),
        )),
        OptionKind::Count => match raw.trim().parse::<u32>() {
            Ok(n) => Ok(OptionValue::Count(n)),
            Err(_) => parse_bool(raw)
                .map(|b| OptionValue::Count(u32::from(b)))
                .map_err(|_| "expected a non-negative integer".to_string()),
        },
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "y" | "yes" | "t" | "true" | "on" => Ok(true),
        "0" | "n" | "no" | "f" | "false" | "off" => Ok(false),
        _ => Err("expected one of 1/0, yes/no, true/false, on/off".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::registry::find_command;
    use crate::core::config_loader::parse_config_file;
    use crate::core::flags::parse_flags;
    use std::path::Path;

    fn cli(command: &str, raw: &[&str]) -> ParsedFlags {
        let tokens: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        parse_flags(&tokens, &schema::options_for(find_command(command).unwrap()), false).unwrap()
    }

    fn config(content: &str) -> ConfigFile {
        parse_config_file(content, Path::new("pip.conf")).unwrap()
    }

    fn resolve_install(
        file: &ConfigFile,
        env: &Environment,
        flags: &ParsedFlags,
    ) -> ResolvedConfig {
        resolve(find_command("install").unwrap(), file, env, flags).unwrap()
    }

    #[test]
    fn test_defaults_only() {
        let resolved = resolve_install(&ConfigFile::empty(), &Environment::default(), &cli("install", &[]));
        assert_eq!(resolved.command(), "install");
        assert_eq!(resolved.string("index_url"), Some("https://pypi.python.org/simple/"));
        assert!(!resolved.flag("no_index"));
        assert!(resolved.list("find_links").is_empty());
        assert_eq!(resolved.origin("index_url"), Some(Layer::Default));
    }

    #[test]
    fn test_command_line_wins_over_every_other_layer_for_scalars() {
        let file = config("[global]\nindex-url = http://global\n[install]\nindex-url = http://command\n");
        let env = Environment::from_pairs([("PIP_INDEX_URL", "http://env")]);
        let resolved = resolve_install(&file, &env, &cli("install", &["--index-url", "http://cli"]));
        assert_eq!(resolved.string("index_url"), Some("http://cli"));
        assert_eq!(resolved.origin("index_url"), Some(Layer::CommandLine));
    }

    #[test]
    fn test_override_stack_without_command_line() {
        let env = Environment::default();
        let global_only = config("[global]\nindex-url = http://download.zope.org/ppix\n");
        assert_eq!(
            resolve_install(&global_only, &env, &cli("install", &[])).string("index_url"),
            Some("http://download.zope.org/ppix")
        );

        let with_command = config(
            "[global]\nindex-url = http://download.zope.org/ppix\n[install]\nindex-url = http://pypi.appspot.com/\n",
        );
        let resolved = resolve_install(&with_command, &env, &cli("install", &[]));
        assert_eq!(resolved.string("index_url"), Some("http://pypi.appspot.com/"));
        assert_eq!(resolved.origin("index_url"), Some(Layer::ConfigCommand));
    }

    #[test]
    fn test_environment_overrides_config_file() {
        let file = config("[global]\nno-index = 1\n");
        let from_file = resolve_install(&file, &Environment::default(), &cli("install", &[]));
        assert!(from_file.flag("no_index"));

        let env = Environment::from_pairs([("PIP_NO_INDEX", "0")]);
        let from_env = resolve_install(&file, &env, &cli("install", &[]));
        assert!(!from_env.flag("no_index"));
        assert_eq!(from_env.origin("no_index"), Some(Layer::Environment));
    }

    #[test]
    fn test_list_values_accumulate_env_before_cli() {
        let env = Environment::from_pairs([("PIP_FIND_LINKS", "http://pypi.pinaxproject.com")]);
        let resolved = resolve_install(
            &ConfigFile::empty(),
            &env,
            &cli("install", &["--find-links", "file:///tmp/links"]),
        );
        assert_eq!(
            resolved.list("find_links"),
            &["http://pypi.pinaxproject.com".to_string(), "file:///tmp/links".to_string()]
        );
    }

    #[test]
    fn test_list_values_accumulate_across_all_five_layers() {
        let file = config("[global]\nfind-links = g1 g2\n[install]\nfind-links =\n    c1\n    g1\n");
        let env = Environment::from_pairs([("PIP_FIND_LINKS", "e1")]);
        let resolved = resolve_install(&file, &env, &cli("install", &["-f", "x1", "-f", "g1"]));
        let expected: Vec<String> = ["g1", "g2", "c1", "g1", "e1", "x1", "g1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(resolved.list("find_links"), expected.as_slice());
    }

    #[test]
    fn test_hyphenated_config_key_resolves_to_underscored_option() {
        let file = config("[global]\nconfig-item = 1\nno-index = yes\n");
        let resolved = resolve_install(&file, &Environment::default(), &cli("install", &[]));
        assert!(resolved.flag("no_index"));
        assert!(resolved.flag("no-index"));
        assert!(resolved.get("config_item").is_none());
        assert!(resolved.iter().all(|(name, _)| !name.contains('-')));
    }

    #[test]
    fn test_invalid_config_boolean_is_a_config_error() {
        let file = config("[global]\nno-index = maybe\n");
        let err = resolve(find_command("install").unwrap(), &file, &Environment::default(), &cli("install", &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Config(ConfigLoadError::InvalidValue { ref key, .. }) if key == "no_index"
        ));
    }

    #[test]
    fn test_invalid_environment_value_is_fatal() {
        let env = Environment::from_pairs([("PIP_VERBOSE", "very")]);
        let err = resolve(find_command("install").unwrap(), &ConfigFile::empty(), &env, &cli("install", &[]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Environment(_)));
    }

    #[test]
    fn test_counts_from_command_line_add_to_environment() {
        let env = Environment::from_pairs([("PIP_VERBOSE", "1")]);
        let resolved = resolve_install(&ConfigFile::empty(), &env, &cli("install", &["-vvv"]));
        assert_eq!(resolved.count("verbose"), 4);
        assert_eq!(resolved.verbosity(), 4);
    }

    #[test]
    fn test_options_outside_command_scope_are_ignored() {
        let file = config("[global]\nindex-url = http://global\ntimeout = 30\n");
        let env = Environment::from_pairs([("PIP_INDEX_URL", "http://env")]);
        let resolved = resolve(find_command("freeze").unwrap(), &file, &env, &cli("freeze", &[])).unwrap();
        assert!(resolved.get("index_url").is_none());
        assert_eq!(resolved.string("timeout"), Some("30"));
    }

    #[test]
    fn test_section_of_other_command_is_not_applied() {
        let file = config("[search]\ntimeout = 99\n");
        let resolved = resolve_install(&file, &Environment::default(), &cli("install", &[]));
        assert_eq!(resolved.string("timeout"), Some("15"));
    }

    #[test]
    fn test_command_line_count_saturates_instead_of_overflowing() {
        let env = Environment::from_pairs([("PIP_VERBOSE", u32::MAX.to_string())]);
        let resolved =
            resolve_install(&ConfigFile::empty(), &env, &cli("install", &["-vv"]));
        assert_eq!(resolved.count("verbose"), u32::MAX);
        assert_eq!(resolved.origin("verbose"), Some(Layer::CommandLine));
    }
}

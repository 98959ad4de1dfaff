// src/cli/registry.rs

use crate::constants::PROGRAM_NAME;
use crate::models::{CommandDescriptor, CommandKind};
use thiserror::Error;

/// Raised when no visible command or alias matches.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("No command by the name {} {name}{}", PROGRAM_NAME, render_suggestion(.suggestion))]
pub struct CommandNotFoundError {
    pub name: String,
    /// A close match, already expanded with the rest of the command line.
    pub suggestion: Option<String>,
}

fn render_suggestion(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!("\n  (maybe you meant \"{} {}\")", PROGRAM_NAME, s),
        None => String::new(),
    }
}

const INSTALL_OPTIONS: &[&str] = &[
    "editable",
    "requirement",
    "find_links",
    "index_url",
    "extra_index_url",
    "no_index",
    "use_mirrors",
    "mirrors",
    "build",
    "target",
    "download",
    "download_cache",
    "src",
    "upgrade",
    "force_reinstall",
    "ignore_installed",
    "no_deps",
    "no_install",
    "no_download",
    "install_option",
    "global_option",
    "user",
];

const ZIP_OPTIONS: &[&str] = &[
    "unzip",
    "zip",
    "no_pyc",
    "list",
    "sort_files",
    "simulate",
    "path",
];

/// The single source of truth for all commands, in listing order.
pub static COMMAND_REGISTRY: &[CommandDescriptor] = &[
    CommandDescriptor {
        kind: CommandKind::Bundle,
        name: "bundle",
        aliases: &[],
        hidden: false,
        summary: "Create pybundles (archives containing multiple packages)",
        usage: "bundle [OPTIONS] BUNDLE_NAME.pybundle PACKAGE_NAMES...",
        own_options: INSTALL_OPTIONS,
    },
    CommandDescriptor {
        kind: CommandKind::Completion,
        name: "completion",
        aliases: &[],
        hidden: true,
        summary: "A helper command to be used for command completion",
        usage: "completion --bash|--zsh",
        own_options: &["bash", "zsh"],
    },
    CommandDescriptor {
        kind: CommandKind::Freeze,
        name: "freeze",
        aliases: &[],
        hidden: false,
        summary: "Output all currently installed packages (exact versions) to stdout",
        usage: "freeze [OPTIONS]",
        own_options: &["requirement", "find_links", "local"],
    },
    CommandDescriptor {
        kind: CommandKind::Help,
        name: "help",
        aliases: &[],
        hidden: false,
        summary: "Show available commands",
        usage: "help COMMAND",
        own_options: &[],
    },
    CommandDescriptor {
        kind: CommandKind::Install,
        name: "install",
        aliases: &[],
        hidden: false,
        summary: "Install packages",
        usage: "install [OPTIONS] PACKAGE_NAMES...",
        own_options: INSTALL_OPTIONS,
    },
    CommandDescriptor {
        kind: CommandKind::Search,
        name: "search",
        aliases: &[],
        hidden: false,
        summary: "Search PyPI",
        usage: "search QUERY",
        own_options: &["index"],
    },
    CommandDescriptor {
        kind: CommandKind::Uninstall,
        name: "uninstall",
        aliases: &["remove"],
        hidden: false,
        summary: "Uninstall packages",
        usage: "uninstall [OPTIONS] PACKAGE_NAMES...",
        own_options: &["requirement", "yes"],
    },
    CommandDescriptor {
        kind: CommandKind::Unzip,
        name: "unzip",
        aliases: &[],
        hidden: false,
        summary: "Unzip individual packages",
        usage: "unzip [OPTIONS] PACKAGE_NAMES...",
        own_options: ZIP_OPTIONS,
    },
    CommandDescriptor {
        kind: CommandKind::Zip,
        name: "zip",
        aliases: &[],
        hidden: false,
        summary: "Zip individual packages",
        usage: "zip [OPTIONS] PACKAGE_NAMES...",
        own_options: ZIP_OPTIONS,
    },
];

/// Finds a command by name or alias, hidden commands included.
pub fn find_command(name: &str) -> Option<&'static CommandDescriptor> {
    COMMAND_REGISTRY.iter().find(|cmd| cmd.matches(name))
}

/// Finds a command by name or alias, or fails with a suggestion.
pub fn lookup(name: &str) -> Result<&'static CommandDescriptor, CommandNotFoundError> {
    find_command(name).ok_or_else(|| CommandNotFoundError {
        name: name.to_string(),
        suggestion: suggest(name).map(str::to_string),
    })
}

/// Commands shown in listings and offered by completion.
pub fn visible_commands() -> impl Iterator<Item = &'static CommandDescriptor> {
    COMMAND_REGISTRY.iter().filter(|cmd| !cmd.hidden)
}

/// The closest visible command name, if any is reasonably similar.
pub fn suggest(name: &str) -> Option<&'static str> {
    let needle = name.to_lowercase();
    visible_commands()
        .flat_map(|cmd| std::iter::once(cmd.name).chain(cmd.aliases.iter().copied()))
        .map(|candidate| (candidate, strsim::normalized_levenshtein(&needle, candidate)))
        .filter(|(_, score)| *score >= 0.6)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate)
}

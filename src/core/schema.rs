// src/core/schema.rs

//! The option schema registry: every option the tool understands, declared once.

use crate::constants::{DEFAULT_INDEX_URL, DEFAULT_SEARCH_INDEX};
use crate::core::paths;
use crate::models::{
    CommandDescriptor, OptionDefault, OptionKind, OptionScope, OptionSpec, normalize_key,
};

const fn spec(
    name: &'static str,
    long: &'static str,
    short: Option<char>,
    kind: OptionKind,
    scope: OptionScope,
    env_var: Option<&'static str>,
) -> OptionSpec {
    OptionSpec {
        name,
        long,
        short,
        kind,
        scope,
        env_var,
        default: OptionDefault::None,
        metavar: "",
        help: "",
        hidden: false,
    }
}

const fn with_help(mut s: OptionSpec, metavar: &'static str, help: &'static str) -> OptionSpec {
    s.metavar = metavar;
    s.help = help;
    s
}

const fn with_default(mut s: OptionSpec, default: OptionDefault) -> OptionSpec {
    s.default = default;
    s
}

const fn hidden(mut s: OptionSpec) -> OptionSpec {
    s.hidden = true;
    s
}

use OptionKind::{Count, Flag, List, String as Text};
use OptionScope::{Command, General, TopLevel};

/// The single source of truth for all options, in help/completion order.
pub static OPTION_REGISTRY: &[OptionSpec] = &[
    // --- Top-level ---
    with_help(
        spec("version", "version", None, Flag, TopLevel, None),
        "",
        "show program's version number and exit",
    ),
    // --- General ---
    with_help(
        spec("help", "help", Some('h'), Flag, General, None),
        "",
        "Show help",
    ),
    with_help(
        spec("verbose", "verbose", Some('v'), Count, General, Some("PIP_VERBOSE")),
        "",
        "Give more output",
    ),
    with_help(
        spec("quiet", "quiet", Some('q'), Count, General, Some("PIP_QUIET")),
        "",
        "Give less output",
    ),
    with_help(
        spec("log", "log", None, Text, General, Some("PIP_LOG")),
        "FILENAME",
        "Log file where a complete (maximum verbosity) record will be kept",
    ),
    with_default(
        with_help(
            spec("log_file", "log-file", None, Text, General, Some("PIP_LOG_FILE")),
            "FILENAME",
            "Log file where a complete record of a failing command is stored",
        ),
        OptionDefault::Computed(paths::default_log_file),
    ),
    hidden(spec(
        "log_explicit_levels",
        "log-explicit-levels",
        None,
        Flag,
        General,
        Some("PIP_LOG_EXPLICIT_LEVELS"),
    )),
    with_help(
        spec("no_input", "no-input", None, Flag, General, Some("PIP_NO_INPUT")),
        "",
        "Disable prompting for input",
    ),
    with_help(
        spec("proxy", "proxy", None, Text, General, Some("PIP_PROXY")),
        "PROXY",
        "Specify a proxy in the form user:passwd@proxy.server:port",
    ),
    with_default(
        with_help(
            spec("timeout", "timeout", None, Text, General, Some("PIP_TIMEOUT")),
            "SECONDS",
            "Set the socket timeout (default 15 seconds)",
        ),
        OptionDefault::Text("15"),
    ),
    with_help(
        spec("default_vcs", "default-vcs", None, Text, General, Some("PIP_DEFAULT_VCS")),
        "VCS",
        "Set the default version control system to use",
    ),
    with_help(
        spec(
            "skip_requirements_regex",
            "skip-requirements-regex",
            None,
            Text,
            General,
            Some("PIP_SKIP_REQUIREMENTS_REGEX"),
        ),
        "REGEX",
        "Skip requirement lines matching this regex",
    ),
    with_help(
        spec("exists_action", "exists-action", None, List, General, Some("PIP_EXISTS_ACTION")),
        "ACTION",
        "Default action when a path already exists: (s)witch, (i)gnore, (w)ipe, (b)ackup",
    ),
    with_help(
        spec(
            "require_virtualenv",
            "require-virtualenv",
            None,
            Flag,
            General,
            Some("PIP_REQUIRE_VIRTUALENV"),
        ),
        "",
        "Allow pip to only run in a virtual environment; exit with an error otherwise",
    ),
    // --- Requirement sources ---
    with_help(
        spec("editable", "editable", Some('e'), List, Command, Some("PIP_EDITABLE")),
        "VCS+REPO_URL[#egg=NAME]",
        "Install a package directly from a checkout",
    ),
    with_help(
        spec("requirement", "requirement", Some('r'), List, Command, Some("PIP_REQUIREMENT")),
        "FILENAME",
        "Install all the packages listed in the given requirements file",
    ),
    with_help(
        spec("find_links", "find-links", Some('f'), List, Command, Some("PIP_FIND_LINKS")),
        "URL",
        "URL to look for packages at",
    ),
    with_default(
        with_help(
            spec("index_url", "index-url", Some('i'), Text, Command, Some("PIP_INDEX_URL")),
            "URL",
            "Base URL of Python Package Index",
        ),
        OptionDefault::Text(DEFAULT_INDEX_URL),
    ),
    with_help(
        spec(
            "extra_index_url",
            "extra-index-url",
            None,
            List,
            Command,
            Some("PIP_EXTRA_INDEX_URL"),
        ),
        "URL",
        "Extra URLs of package indexes to use in addition to --index-url",
    ),
    with_help(
        spec("no_index", "no-index", None, Flag, Command, Some("PIP_NO_INDEX")),
        "",
        "Ignore package index (only looking at --find-links URLs instead)",
    ),
    with_help(
        spec("use_mirrors", "use-mirrors", Some('M'), Flag, Command, Some("PIP_USE_MIRRORS")),
        "",
        "Use the PyPI mirrors as a fallback in case the main index is down",
    ),
    with_help(
        spec("mirrors", "mirrors", None, List, Command, Some("PIP_MIRRORS")),
        "URL",
        "Specific mirror URLs to query when --use-mirrors is used",
    ),
    // --- Install locations and behavior ---
    with_help(
        spec("build", "build", Some('b'), Text, Command, Some("PIP_BUILD")),
        "DIR",
        "Unpack packages into DIR and build from there",
    ),
    with_help(
        spec("target", "target", Some('t'), Text, Command, Some("PIP_TARGET")),
        "DIR",
        "Install packages into DIR",
    ),
    with_help(
        spec("download", "download", Some('d'), Text, Command, Some("PIP_DOWNLOAD")),
        "DIR",
        "Download packages into DIR instead of installing them",
    ),
    with_help(
        spec("download_cache", "download-cache", None, Text, Command, Some("PIP_DOWNLOAD_CACHE")),
        "DIR",
        "Cache downloaded packages in DIR",
    ),
    with_help(
        spec("src", "src", None, Text, Command, Some("PIP_SRC")),
        "DIR",
        "Check out --editable packages into DIR",
    ),
    with_help(
        spec("upgrade", "upgrade", Some('U'), Flag, Command, Some("PIP_UPGRADE")),
        "",
        "Upgrade all packages to the newest available version",
    ),
    with_help(
        spec("force_reinstall", "force-reinstall", None, Flag, Command, Some("PIP_FORCE_REINSTALL")),
        "",
        "When upgrading, reinstall all packages even if they are already up-to-date",
    ),
    with_help(
        spec(
            "ignore_installed",
            "ignore-installed",
            Some('I'),
            Flag,
            Command,
            Some("PIP_IGNORE_INSTALLED"),
        ),
        "",
        "Ignore the installed packages (reinstalling instead)",
    ),
    with_help(
        spec("no_deps", "no-deps", None, Flag, Command, Some("PIP_NO_DEPS")),
        "",
        "Ignore package dependencies",
    ),
    with_help(
        spec("no_install", "no-install", None, Flag, Command, Some("PIP_NO_INSTALL")),
        "",
        "Download and unpack all packages, but don't actually install them",
    ),
    with_help(
        spec("no_download", "no-download", None, Flag, Command, Some("PIP_NO_DOWNLOAD")),
        "",
        "Don't download any packages, just install the ones already downloaded",
    ),
    with_help(
        spec("install_option", "install-option", None, List, Command, Some("PIP_INSTALL_OPTION")),
        "OPTIONS",
        "Extra arguments to be supplied to the setup.py install command",
    ),
    with_help(
        spec("global_option", "global-option", None, List, Command, Some("PIP_GLOBAL_OPTION")),
        "OPTIONS",
        "Extra global options to be supplied to the setup.py call before the install command",
    ),
    with_help(
        spec("user", "user", None, Flag, Command, Some("PIP_USER")),
        "",
        "Install to the user site directory",
    ),
    // --- uninstall / freeze / search ---
    with_help(
        spec("yes", "yes", Some('y'), Flag, Command, Some("PIP_YES")),
        "",
        "Don't ask for confirmation of uninstall deletions",
    ),
    with_help(
        spec("local", "local", Some('l'), Flag, Command, Some("PIP_LOCAL")),
        "",
        "If in a virtualenv, do not report globally-installed packages",
    ),
    with_default(
        with_help(
            spec("index", "index", None, Text, Command, Some("PIP_INDEX")),
            "URL",
            "Base URL of Python Package Index",
        ),
        OptionDefault::Text(DEFAULT_SEARCH_INDEX),
    ),
    // --- zip / unzip ---
    with_help(
        spec("unzip", "unzip", None, Flag, Command, Some("PIP_UNZIP")),
        "",
        "Unzip (rather than zip) a package",
    ),
    with_help(
        spec("zip", "zip", None, Flag, Command, Some("PIP_ZIP")),
        "",
        "Zip (rather than unzip) a package",
    ),
    with_help(
        spec("no_pyc", "no-pyc", None, Flag, Command, Some("PIP_NO_PYC")),
        "",
        "Do not include .pyc files in zip files",
    ),
    with_help(
        spec("list", "list", Some('l'), Flag, Command, Some("PIP_LIST")),
        "",
        "List the packages available, and their zip status",
    ),
    with_help(
        spec("sort_files", "sort-files", None, Flag, Command, Some("PIP_SORT_FILES")),
        "",
        "With --list, sort packages according to how many files they contain",
    ),
    with_help(
        spec("simulate", "simulate", None, Flag, Command, Some("PIP_SIMULATE")),
        "",
        "Do not actually perform the zip/unzip operation",
    ),
    with_help(
        spec("path", "path", None, List, Command, Some("PIP_PATH")),
        "DIR",
        "Restrict operations to the given paths",
    ),
    // --- completion ---
    with_help(
        spec("bash", "bash", Some('b'), Flag, Command, None),
        "",
        "Emit completion code for bash",
    ),
    with_help(
        spec("zsh", "zsh", Some('z'), Flag, Command, None),
        "",
        "Emit completion code for zsh",
    ),
];

/// Looks an option up by canonical name, normalizing the query first.
pub fn find_option(name: &str) -> Option<&'static OptionSpec> {
    let key = normalize_key(name.trim_start_matches('-'));
    OPTION_REGISTRY.iter().find(|o| o.name == key)
}

/// Options accepted before the command name.
pub fn top_level_options() -> Vec<&'static OptionSpec> {
    OPTION_REGISTRY
        .iter()
        .filter(|o| matches!(o.scope, OptionScope::TopLevel | OptionScope::General))
        .collect()
}

/// General options, accepted by every command.
pub fn general_options() -> Vec<&'static OptionSpec> {
    OPTION_REGISTRY
        .iter()
        .filter(|o| o.scope == OptionScope::General)
        .collect()
}

/// Options specific to `command`, in the order the command declares them.
pub fn command_options(command: &CommandDescriptor) -> Vec<&'static OptionSpec> {
    command
        .own_options
        .iter()
        .filter_map(|name| find_option(name))
        .filter(|o| o.scope == OptionScope::Command)
        .collect()
}

/// Every option in scope for `command`: its own options followed by the general ones.
pub fn options_for(command: &CommandDescriptor) -> Vec<&'static OptionSpec> {
    let mut options = command_options(command);
    options.extend(general_options());
    options
}

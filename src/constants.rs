// src/constants.rs

/// Name the tool is invoked as, used in help, snippets and log headers.
pub const PROGRAM_NAME: &str = "pip";

/// Prefix of every environment variable the tool reads.
pub const ENV_PREFIX: &str = "PIP";

/// Overrides the configuration file search.
pub const CONFIG_FILE_ENV: &str = "PIP_CONFIG_FILE";

/// Set by the shell completion function to switch the binary into completion mode.
pub const AUTO_COMPLETE_ENV: &str = "PIP_AUTO_COMPLETE";

/// Space-joined words of the command line being completed.
pub const COMP_WORDS_ENV: &str = "COMP_WORDS";

/// Index of the word being completed within `COMP_WORDS`.
pub const COMP_CWORD_ENV: &str = "COMP_CWORD";

/// Directory under the home directory holding the user's configuration and logs.
pub const STORAGE_DIR_NAME: &str = if cfg!(windows) { "pip" } else { ".pip" };

/// Name of the configuration file inside the storage directory.
pub const CONFIG_FILENAME: &str = if cfg!(windows) { "pip.ini" } else { "pip.conf" };

/// Name of the failure log inside the storage directory.
pub const LOG_FILENAME: &str = "pip.log";

/// Section of the configuration file that applies to every command.
pub const GLOBAL_SECTION: &str = "global";

/// Package index used when `index_url` is not configured.
pub const DEFAULT_INDEX_URL: &str = "https://pypi.python.org/simple/";

/// Index queried by `search` when none is configured.
pub const DEFAULT_SEARCH_INDEX: &str = "https://pypi.python.org/pypi";

/// Process exit statuses.
pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;

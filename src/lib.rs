//! Option resolution, command dispatch and shell completion for the `pip`
//! command line.
//!
//! Options come from five layers (built-in defaults, the `[global]` and
//! per-command sections of the configuration file, `PIP_*` environment
//! variables, and the command line) and are merged into a `ResolvedConfig`
//! that is handed to a `CommandExecutor`.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod dev_utils;
pub mod models;
pub mod system;

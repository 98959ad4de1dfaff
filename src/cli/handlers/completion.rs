// src/cli/handlers/completion.rs

use crate::cli::completion::{self, Shell};
use crate::core::flags::UsageError;
use crate::models::ResolvedConfig;
use anyhow::Result;
use std::io::Write;

fn shell_list() -> String {
    Shell::ALL
        .iter()
        .map(|s| format!("--{}", s.option_name()))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// `pip completion --bash|--zsh`: prints the shell snippet.
pub fn handle(config: &ResolvedConfig, out: &mut dyn Write) -> Result<()> {
    let selected: Vec<Shell> = Shell::ALL
        .into_iter()
        .filter(|shell| config.flag(shell.option_name()))
        .collect();

    let shell = match selected.as_slice() {
        [shell] => *shell,
        [] => return Err(UsageError::MissingShell(shell_list()).into()),
        _ => return Err(UsageError::ConflictingShells(shell_list()).into()),
    };

    writeln!(out, "{}", completion::snippet(shell))?;
    Ok(())
}

// src/cli/handlers/help.rs

use crate::cli::{self, registry};
use anyhow::Result;
use std::io::Write;

/// `pip help [COMMAND]`: the overall listing, or the help of one command.
pub fn handle(args: &[String], out: &mut dyn Write) -> Result<()> {
    let text = match args.first() {
        None => cli::render_main_help(),
        Some(name) => {
            let command = registry::lookup(name)?;
            log::debug!("Showing help for '{}'", command.name);
            cli::render_command_help(command)
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

// src/system/executor.rs

use crate::models::{CommandDescriptor, ResolvedConfig};
use std::io::{self, Write};
use thiserror::Error;

/// A command that ran but did not complete.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },
    #[error("Could not write the output of '{command}'")]
    Output {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// The boundary to whatever actually performs a command.
///
/// The resolved configuration is final by the time it reaches an executor;
/// `args` are the positional arguments left after flag parsing.
pub trait CommandExecutor: std::fmt::Debug {
    /// Runs `command` with its final configuration, writing its output to `out`.
    fn execute(
        &self,
        command: &CommandDescriptor,
        config: &ResolvedConfig,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), ExecutionError>;
}

/// Prints the resolved configuration as `name = value` lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportExecutor;

impl CommandExecutor for ReportExecutor {
    fn execute(
        &self,
        command: &CommandDescriptor,
        config: &ResolvedConfig,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), ExecutionError> {
        let write = |out: &mut dyn Write| -> io::Result<()> {
            writeln!(
                out,
                "{}",
                format!(t!("report.header"), command = command.name, count = args.len())
            )?;
            for (name, value) in config.iter() {
                writeln!(out, "{} = {}", name, value)?;
            }
            for arg in args {
                writeln!(out, "arg = {}", arg)?;
            }
            Ok(())
        };
        write(out).map_err(|source| ExecutionError::Output {
            command: command.name.to_string(),
            source,
        })
    }
}

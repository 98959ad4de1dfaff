// src/cli/dispatcher.rs

use anyhow::{Context, Result};
use std::io::Write;

use crate::{
    cli::{self, handlers, registry},
    constants::{PROGRAM_NAME, SUCCESS},
    core::{
        environment::Environment,
        flags::{self, ParsedFlags},
        logfile::{self, LogFile},
        merger, paths, schema,
    },
    models::{CommandDescriptor, CommandKind, ConfigFile, ResolvedConfig},
    system::executor::CommandExecutor,
};

/// Everything a run needs besides its arguments.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    /// Environment snapshot taken at startup.
    pub env: &'a Environment,
    /// The loaded configuration file, possibly empty.
    pub config: &'a ConfigFile,
    pub executor: &'a dyn CommandExecutor,
}

/// Console level for a verbosity of `verbose - quiet`.
pub fn level_for_verbosity(verbosity: i64) -> log::LevelFilter {
    match verbosity {
        v if v < 0 => log::LevelFilter::Error,
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Runs one command line (without the program name) and returns the exit status.
///
/// Errors are returned to the caller for reporting; a failure after the
/// configuration was resolved is also recorded in the `log_file` log.
/// Help requests in any spelling are answered before resolution.
pub fn dispatch(
    args: &[String],
    session: &Session<'_>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    log::debug!("Dispatching args: {:?}", args);

    let top = flags::parse_flags(args, &schema::top_level_options(), true)?;

    if top.has("version") {
        writeln!(
            out,
            "{}",
            format!(
                t!("version.line"),
                prog = PROGRAM_NAME,
                version = env!("CARGO_PKG_VERSION")
            )
        )?;
        return Ok(SUCCESS);
    }

    // `pip`, `pip --help` and `pip --help <cmd>` all go through the help command.
    let rest = &top.positional;
    let Some(name) = rest.first() else {
        handlers::help::handle(&[], out)?;
        return Ok(SUCCESS);
    };
    if top.has("help") {
        handlers::help::handle(rest, out)?;
        return Ok(SUCCESS);
    }

    let command = registry::lookup(name).map_err(|mut e| {
        if let Some(suggestion) = e.suggestion.as_mut()
            && rest.len() > 1
        {
            suggestion.push(' ');
            suggestion.push_str(&rest[1..].join(" "));
        }
        e
    })?;

    let mut cli_flags = ParsedFlags {
        occurrences: top.occurrences.clone(),
        positional: Vec::new(),
    };
    cli_flags.extend(flags::parse_flags(
        &rest[1..],
        &schema::options_for(command),
        false,
    )?);

    if cli_flags.has("help") {
        out.write_all(cli::render_command_help(command).as_bytes())?;
        return Ok(SUCCESS);
    }
    // `pip help [cmd]` never depends on the configuration, like `--help`.
    if command.kind == CommandKind::Help {
        handlers::help::handle(&cli_flags.positional, out)?;
        return Ok(SUCCESS);
    }

    let resolved = merger::resolve(command, session.config, session.env, &cli_flags)?;
    if session.env.get("RUST_LOG").is_none() {
        log::set_max_level(level_for_verbosity(resolved.verbosity()));
    }

    let mut command_line = vec![PROGRAM_NAME.to_string()];
    command_line.extend(args.iter().cloned());

    // The run record is flushed on every exit path, including errors.
    let mut run_log = scopeguard::guard(open_run_log(&resolved, &command_line)?, |file| {
        if let Some(mut file) = file
            && let Err(e) = file.flush()
        {
            log::warn!("Could not flush {}: {}", paths::display_path(file.path()), e);
        }
    });

    let result = run_command(command, &resolved, &cli_flags.positional, session, out);
    if let Err(e) = &result {
        if let Some(file) = (*run_log).as_mut() {
            writeln!(file, "{}: {:#}", t!("error.label"), e)?;
        }
        store_failure(&resolved, &command_line, e, err);
    }
    result.map(|()| SUCCESS)
}

fn run_command(
    command: &CommandDescriptor,
    config: &ResolvedConfig,
    args: &[String],
    session: &Session<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    match command.kind {
        CommandKind::Help => handlers::help::handle(args, out),
        CommandKind::Completion => handlers::completion::handle(config, out),
        CommandKind::Bundle
        | CommandKind::Freeze
        | CommandKind::Install
        | CommandKind::Search
        | CommandKind::Uninstall
        | CommandKind::Unzip
        | CommandKind::Zip => session
            .executor
            .execute(command, config, args, out)
            .with_context(|| format!("'{}' did not complete", command.name)),
    }
}

/// Opens the `log` file, if one is configured, and writes the run header.
fn open_run_log(config: &ResolvedConfig, command_line: &[String]) -> Result<Option<LogFile>> {
    let Some(raw) = config.string("log") else {
        return Ok(None);
    };
    let path = paths::expand_user_path(raw)?;
    let mut file = logfile::open_logfile(&path)
        .with_context(|| format!("Could not open log file {}", paths::display_path(&path)))?;
    file.write_header(command_line)?;
    file.write_config(config)?;
    Ok(Some(file))
}

/// Appends the failed run to the `log_file` log and tells the user where it is.
///
/// Problems writing this log are only logged; the command's own error is what gets reported.
fn store_failure(
    config: &ResolvedConfig,
    command_line: &[String],
    error: &anyhow::Error,
    err: &mut dyn Write,
) {
    let Some(raw) = config.string("log_file") else {
        return;
    };
    let written = paths::expand_user_path(raw)
        .map_err(anyhow::Error::from)
        .and_then(|path| {
            let mut file = logfile::open_logfile(&path)?;
            file.write_header(command_line)?;
            file.write_config(config)?;
            writeln!(file, "{}: {:#}", t!("error.label"), error)?;
            Ok(path)
        });

    match written {
        Ok(path) => {
            let _ = writeln!(
                err,
                "{}",
                format!(
                    t!("error.storing_log"),
                    path = paths::display_path(&path)
                )
            );
        }
        Err(e) => log::warn!("Could not store the failure log in {}: {:#}", raw, e),
    }
}

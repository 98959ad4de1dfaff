// src/bin/pip.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use pipcore::{
    cli::{
        Cli, completion,
        dispatcher::{self, Session},
    },
    constants::{AUTO_COMPLETE_ENV, ERROR},
    core::{config_loader::ConfigLoader, environment::Environment},
    system::executor::ReportExecutor,
    t,
};
use std::io::{self, Write};

/// `RUST_LOG` wins when set; otherwise everything passes the logger's own
/// filter and the run's verbosity decides through `log::set_max_level`.
fn init_logging(env: &Environment) {
    let mut builder = env_logger::Builder::new();
    match env.get("RUST_LOG") {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
    if env.get("RUST_LOG").is_none() {
        log::set_max_level(dispatcher::level_for_verbosity(0));
    }
}

/// The main entry point of the `pip` application.
/// It captures the environment, sets up logging, dispatches the command line
/// and performs centralized error handling.
fn main() {
    let env = Environment::capture();
    init_logging(&env);

    let status = match run(&env) {
        Ok(status) => status,
        Err(e) => {
            // --- Centralized Error Handling ---
            eprintln!("{}: {:#}", t!("error.label").red().bold(), e);
            ERROR
        }
    };
    std::process::exit(status);
}

fn run(env: &Environment) -> Result<i32> {
    // The shell completion function re-invokes the binary with this set.
    if env.contains(AUTO_COMPLETE_ENV) {
        let context = completion::context_from_env(env)?;
        log::debug!("Completing {:?}", context);
        println!("{}", completion::complete(&context).join(" "));
        return Ok(ERROR);
    }

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);

    let config = ConfigLoader::new(env).load()?;
    if config.is_empty() {
        log::debug!("No configuration sections; using defaults, environment and flags only.");
    }
    let session = Session {
        env,
        config: &config,
        executor: &ReportExecutor,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut err = io::stderr();
    let status = dispatcher::dispatch(&cli.args, &session, &mut out, &mut err);
    out.flush()?;
    status
}

// src/cli/mod.rs

use crate::constants::PROGRAM_NAME;
use crate::core::schema;
use crate::models::{CommandDescriptor, OptionSpec};
use clap::Parser;

pub mod completion;
pub mod dispatcher;
pub mod handlers;
pub mod registry;

/// Width of the flag column in help output.
const HELP_COLUMN: usize = 24;

/// pip: the Python package installer.
///
/// Option parsing is driven by the option schema, so clap only collects the
/// raw argument list here; `--help` and `--version` are handled by the
/// dispatcher to keep every help path identical.
#[derive(Parser, Debug)]
#[command(name = "pip", version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command and its arguments, passed through untouched.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Replaces the semantic tags of a catalog message with ANSI styles, or strips
/// them when colors are disabled.
fn stylize(template: &str) -> String {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset)
}

/// `-i URL, --index-url=URL` style label for an option.
fn option_label(option: &OptionSpec) -> String {
    let takes_value = option.kind.takes_value();
    let metavar = if option.metavar.is_empty() {
        option.name.to_uppercase()
    } else {
        option.metavar.to_string()
    };
    let long = if takes_value {
        format!("--{}={}", option.long, metavar)
    } else {
        format!("--{}", option.long)
    };
    match option.short {
        Some(c) if takes_value => format!("-{} {}, {}", c, metavar, long),
        Some(c) => format!("-{}, {}", c, long),
        None => long,
    }
}

fn push_option_rows(out: &mut String, options: &[&OptionSpec]) {
    for option in options.iter().filter(|o| !o.hidden) {
        let label = option_label(option);
        if label.len() + 2 < HELP_COLUMN {
            out.push_str(&format!("  {:<width$}{}\n", label, option.help, width = HELP_COLUMN - 2));
        } else {
            out.push_str(&format!("  {}\n{:width$}{}\n", label, "", option.help, width = HELP_COLUMN));
        }
    }
}

/// Overall usage: top-level options and the listing of visible commands.
pub fn render_main_help() -> String {
    let mut out = String::new();
    out.push_str(&stylize(&format!(
        t!("help.usage"),
        prog = PROGRAM_NAME,
        usage = t!("help.main.usage")
    )));
    out.push_str("\n\n");

    out.push_str(&stylize(t!("help.heading.options")));
    out.push('\n');
    push_option_rows(&mut out, &schema::top_level_options());
    out.push('\n');

    out.push_str(&stylize(t!("help.heading.commands")));
    out.push('\n');
    for command in registry::visible_commands() {
        out.push_str(&stylize(&format!(
            "  <cmd>{:<width$}</cmd>{}\n",
            command.name,
            command.summary,
            width = HELP_COLUMN - 2
        )));
    }
    out.push('\n');
    out.push_str(&stylize(&format!(t!("help.main.footer"), prog = PROGRAM_NAME)));
    out.push('\n');
    out
}

/// Help for a single command: usage, summary, its own options, then the general ones.
pub fn render_command_help(command: &CommandDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&stylize(&format!(
        t!("help.usage"),
        prog = PROGRAM_NAME,
        usage = command.usage
    )));
    out.push_str("\n\n");
    out.push_str(command.summary);
    out.push_str("\n\n");

    let own = schema::command_options(command);
    if own.iter().any(|o| !o.hidden) {
        let mut heading = command.name.to_string();
        if let Some(first) = heading.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        out.push_str(&stylize(&format!(
            t!("help.heading.command_options"),
            command = heading
        )));
        out.push('\n');
        push_option_rows(&mut out, &own);
        out.push('\n');
    }

    out.push_str(&stylize(t!("help.heading.general_options")));
    out.push('\n');
    push_option_rows(&mut out, &schema::general_options());
    out
}

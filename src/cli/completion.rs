// src/cli/completion.rs

//! The shell completion protocol.
//!
//! The shell re-invokes the binary with `PIP_AUTO_COMPLETE` set, the words of
//! the command line in `COMP_WORDS` and the index of the word under the cursor
//! in `COMP_CWORD`. Candidates are printed as one space-separated line.

use crate::cli::registry;
use crate::constants::{COMP_CWORD_ENV, COMP_WORDS_ENV};
use crate::core::environment::Environment;
use crate::core::flags::UsageError;
use crate::core::schema;
use crate::models::{CommandDescriptor, CompletionContext, OptionSpec};

/// Body of the snippet printed by `pip completion --bash`.
pub const BASH_SNIPPET: &str = r#"_pip_completion()
{
    COMPREPLY=( $( COMP_WORDS="${COMP_WORDS[*]}" \
                   COMP_CWORD=$COMP_CWORD \
                   PIP_AUTO_COMPLETE=1 $1 ) )
}
complete -o default -F _pip_completion pip"#;

/// Body of the snippet printed by `pip completion --zsh`.
pub const ZSH_SNIPPET: &str = r#"function _pip_completion {
  local words cword
  read -Ac words
  read -cn cword
  reply=( $( COMP_WORDS="$words[*]" \
             COMP_CWORD=$(( cword-1 )) \
             PIP_AUTO_COMPLETE=1 $words[1] ) )
}
compctl -K _pip_completion pip"#;

/// Shells a completion snippet can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
}

impl Shell {
    pub const ALL: [Shell; 2] = [Shell::Bash, Shell::Zsh];

    /// Name of the option that selects this shell.
    pub fn option_name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Shell::Bash => BASH_SNIPPET,
            Shell::Zsh => ZSH_SNIPPET,
        }
    }
}

/// The framed snippet printed by `pip completion --<shell>`.
pub fn snippet(shell: Shell) -> String {
    let name = shell.option_name();
    format!(
        "\n# pip {name} completion start\n{}\n# pip {name} completion end\n",
        shell.body()
    )
}

/// Reads the completion request from the environment.
pub fn context_from_env(env: &Environment) -> Result<CompletionContext, UsageError> {
    let words: Vec<String> = env
        .get(COMP_WORDS_ENV)
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let raw_cursor = env.get(COMP_CWORD_ENV).unwrap_or("");
    let cursor_index =
        raw_cursor
            .trim()
            .parse::<usize>()
            .map_err(|_| UsageError::InvalidCompletionIndex {
                var: COMP_CWORD_ENV,
                value: raw_cursor.to_string(),
            })?;
    Ok(CompletionContext::new(words, cursor_index))
}

/// The first visible command named before the cursor, if any.
fn active_command(ctx: &CompletionContext) -> Option<&'static CommandDescriptor> {
    ctx.preceding().iter().find_map(|word| {
        registry::visible_commands().find(|cmd| {
            cmd.name == word.as_str() || cmd.aliases.iter().any(|a| *a == word.as_str())
        })
    })
}

fn already_used(option: &OptionSpec, preceding: &[String]) -> bool {
    let spelling = option.flag_spelling();
    preceding.iter().any(|word| {
        word == &spelling
            || word
                .strip_prefix(spelling.as_str())
                .is_some_and(|rest| rest.starts_with('='))
    })
}

/// Candidates for the word under the cursor.
pub fn complete(ctx: &CompletionContext) -> Vec<String> {
    let current = ctx.current();

    match active_command(ctx) {
        None if current.starts_with('-') => schema::top_level_options()
            .into_iter()
            .filter(|o| !o.hidden)
            .map(|o| o.flag_spelling())
            .filter(|spelling| spelling.starts_with(current))
            .collect(),
        None => {
            let mut names: Vec<&str> = registry::visible_commands()
                .flat_map(|cmd| std::iter::once(cmd.name).chain(cmd.aliases.iter().copied()))
                .filter(|name| name.starts_with(current))
                .collect();
            names.sort_unstable();
            names.into_iter().map(str::to_string).collect()
        }
        Some(command) if current.starts_with('-') => {
            let preceding = ctx.preceding();
            schema::options_for(command)
                .into_iter()
                .filter(|o| !o.hidden && !already_used(o, preceding))
                .map(|o| {
                    let mut label = o.flag_spelling();
                    if o.kind.takes_value() {
                        label.push('=');
                    }
                    label
                })
                .filter(|label| label.starts_with(current))
                .collect()
        }
        Some(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(line: &str, cursor: usize) -> CompletionContext {
        CompletionContext::new(line.split_whitespace().map(str::to_string).collect(), cursor)
    }

    #[test]
    fn test_completes_command_names_by_prefix() {
        assert_eq!(complete(&ctx("pip un", 1)), vec!["uninstall", "unzip"]);
    }

    #[test]
    fn test_completes_aliases_but_not_hidden_commands() {
        assert_eq!(complete(&ctx("pip re", 1)), vec!["remove"]);
        assert!(complete(&ctx("pip co", 1)).is_empty());
    }

    #[test]
    fn test_empty_token_lists_every_visible_command_sorted() {
        let all = complete(&ctx("pip", 1));
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
        assert!(all.contains(&"install".to_string()));
        assert!(!all.contains(&"completion".to_string()));
    }

    #[test]
    fn test_top_level_flags_without_command() {
        let candidates = complete(&ctx("pip --h", 1));
        assert_eq!(candidates, vec!["--help"]);
        assert!(complete(&ctx("pip --", 1)).contains(&"--version".to_string()));
    }

    #[test]
    fn test_command_flags_with_value_marker() {
        let candidates = complete(&ctx("pip install --index", 2));
        assert_eq!(candidates, vec!["--index-url="]);
        assert_eq!(complete(&ctx("pip install --no-ind", 2)), vec!["--no-index"]);
    }

    #[test]
    fn test_used_flags_are_dropped() {
        let candidates = complete(&ctx("pip install --no-index --index-url=x --", 4));
        assert!(!candidates.contains(&"--no-index".to_string()));
        assert!(!candidates.contains(&"--index-url=".to_string()));
        assert!(candidates.contains(&"--upgrade".to_string()));
    }

    #[test]
    fn test_positional_in_command_has_no_candidates() {
        assert!(complete(&ctx("pip install INI", 2)).is_empty());
    }

    #[test]
    fn test_command_after_cursor_is_ignored() {
        assert_eq!(complete(&ctx("pip un install", 1)), vec!["uninstall", "unzip"]);
    }

    #[test]
    fn test_context_from_env() {
        let env = Environment::from_pairs([(COMP_WORDS_ENV, "pip un"), (COMP_CWORD_ENV, "1")]);
        let parsed = context_from_env(&env).unwrap();
        assert_eq!(parsed.current(), "un");
    }

    #[test]
    fn test_context_from_env_rejects_bad_index() {
        let env = Environment::from_pairs([(COMP_WORDS_ENV, "pip"), (COMP_CWORD_ENV, "x")]);
        assert!(matches!(
            context_from_env(&env),
            Err(UsageError::InvalidCompletionIndex { .. })
        ));
    }

    #[test]
    fn test_snippets_are_framed() {
        let bash = snippet(Shell::Bash);
        assert!(bash.contains("# pip bash completion start\n_pip_completion()"));
        assert!(bash.ends_with("complete -o default -F _pip_completion pip\n# pip bash completion end\n"));
        let zsh = snippet(Shell::Zsh);
        assert!(zsh.contains("compctl -K _pip_completion pip"));
    }
}

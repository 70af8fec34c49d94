//! Text commands understood by the interactive session and `--exec`.
//!
//! Positions typed by the user are 1-based; [`Command`] holds 0-based
//! positions ready for the registry.

use std::path::PathBuf;

use crate::error::{Result, StitchError};

/// Usage summary printed by `help`.
pub const HELP_TEXT: &str = "\
Commands:
  add <path|glob>...   Add PDF files to the list
  rm <n>               Remove the file at position n
  mv <from> <to>       Move the file at position <from> to position <to>
  ls                   Show the list with previews
  merge [output]       Merge the list and save it (default: merged.pdf)
  clear                Remove every file from the list
  help                 Show this help
  quit                 Leave the session";

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select files by path or glob pattern.
    Add(Vec<String>),
    /// Remove the entry at a 0-based position.
    Remove(usize),
    /// Move the entry at `from` to `to` (both 0-based).
    Move {
        /// Current position.
        from: usize,
        /// Target position.
        to: usize,
    },
    /// Show the list.
    List,
    /// Merge, optionally to a specific output path.
    Merge(Option<PathBuf>),
    /// Drop the whole selection.
    Clear,
    /// Show usage.
    Help,
    /// End the session.
    Quit,
}

impl Command {
    /// Parse one command line.
    ///
    /// Arguments may be quoted with `"` or `'` to include spaces.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidCommand`] for unknown commands, missing
    /// or extra arguments, and positions that are not positive integers.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| StitchError::invalid_command(input.trim(), reason);

        let tokens = tokenize(input).ok_or_else(|| invalid("unterminated quote"))?;
        let Some((name, args)) = tokens.split_first() else {
            return Err(invalid("empty command"));
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "add" | "a" => {
                if args.is_empty() {
                    return Err(invalid("expected at least one path"));
                }
                Self::Add(args.to_vec())
            }
            "rm" | "remove" => match args {
                [n] => Self::Remove(parse_position(n).map_err(|r| invalid(&r))?),
                _ => return Err(invalid("expected exactly one position")),
            },
            "mv" | "move" => match args {
                [from, to] => Self::Move {
                    from: parse_position(from).map_err(|r| invalid(&r))?,
                    to: parse_position(to).map_err(|r| invalid(&r))?,
                },
                _ => return Err(invalid("expected two positions")),
            },
            "ls" | "list" => {
                Self::no_args(args, Self::List).ok_or_else(|| invalid("takes no arguments"))?
            }
            "merge" => match args {
                [] => Self::Merge(None),
                [output] => Self::Merge(Some(PathBuf::from(output))),
                _ => return Err(invalid("expected at most one output path")),
            },
            "clear" => {
                Self::no_args(args, Self::Clear).ok_or_else(|| invalid("takes no arguments"))?
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(invalid("unknown command (type 'help' for a list)")),
        };

        Ok(command)
    }

    fn no_args(args: &[String], command: Self) -> Option<Self> {
        args.is_empty().then_some(command)
    }
}

/// Turn a 1-based user position into a 0-based index.
fn parse_position(token: &str) -> std::result::Result<usize, String> {
    match token.parse::<usize>() {
        Ok(0) => Err("positions start at 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(format!("'{token}' is not a position")),
    }
}

/// Split on whitespace, honouring simple quotes. `None` on an open quote.
fn tokenize(input: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_token {
        tokens.push(current);
    }
    Some(tokens)
}

use std::path::PathBuf;

use thiserror::Error;

use crate::config::expand_home;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for :{0}")]
    MissingArgument(&'static str),

    #[error("Invalid queue index.")]
    InvalidQueueIndex,
}

/// Everything that can be typed after `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:a <folder>`
    AddFolder(PathBuf),
    /// `:refresh`
    Refresh,
    /// `:clear`
    ClearQueue,
    /// `:remove <n>`, stored zero-based.
    RemoveFromQueue(usize),
    /// `:q`
    Quit,
    /// `:v`, `:version`
    Version,
    /// `:help`
    Help,
    /// Nothing typed.
    Empty,
}

impl Command {
    /// Parse a command line. The leading `:` is optional.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix(':').unwrap_or(trimmed).trim();
        if body.is_empty() {
            return Ok(Command::Empty);
        }

        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (body, ""),
        };

        match name {
            "a" if arg.is_empty() => Err(CommandError::MissingArgument("a")),
            "a" => Ok(Command::AddFolder(expand_home(arg))),
            "refresh" if arg.is_empty() => Ok(Command::Refresh),
            "clear" if arg.is_empty() => Ok(Command::ClearQueue),
            "remove" if arg.is_empty() => Err(CommandError::MissingArgument("remove")),
            "remove" => match arg.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Command::RemoveFromQueue(n - 1)),
                _ => Err(CommandError::InvalidQueueIndex),
            },
            "q" if arg.is_empty() => Ok(Command::Quit),
            "v" | "version" if arg.is_empty() => Ok(Command::Version),
            "help" if arg.is_empty() => Ok(Command::Help),
            _ => Err(CommandError::Unknown(trimmed.to_string())),
        }
    }
}

/// One line per command, as listed in the help popup.
pub const COMMAND_HELP: &[(&str, &str)] = &[
    (":a <folder>", "Add/change music folder"),
    (":refresh", "Rescan music folder and update library"),
    (":clear", "Clear queue"),
    (":remove <n>", "Remove nth song from queue"),
    (":q", "Quit"),
    (":v or :version", "Show version"),
    (":help", "Show this help"),
];

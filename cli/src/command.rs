//! Parsing of the interactive command line.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add {
        title: String,
        description: Option<String>,
    },
    Toggle(usize),
    Edit(usize),
    Title(String),
    Desc(String),
    Save,
    Cancel,
    Delete(usize),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("{0:?} is not a row number")]
    InvalidRow(String),
}

pub const HELP: &str = "\
commands:
  list                            reload and show all todos
  add <title> [| <description>]   create a todo
  toggle <n>                      mark row n complete / pending
  edit <n>                        start editing row n
  title <text>                    set the edited title
  desc <text>                     set the edited description
  save                            save the edit
  cancel                          discard the edit
  delete <n>                      delete row n
  help                            show this help
  quit                            exit";

impl Command {
    /// Whether the page should be redrawn even if the store did not change.
    pub fn redraws(&self) -> bool {
        matches!(
            self,
            Command::List | Command::Edit(_) | Command::Title(_) | Command::Desc(_) | Command::Cancel
        )
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "list" | "ls" => Ok(Command::List),
            "add" => {
                let (title, description) = match rest.split_once('|') {
                    Some((title, description)) => (title.trim(), Some(description.trim())),
                    None => (rest, None),
                };
                if title.is_empty() {
                    return Err(CommandError::MissingArgument("add"));
                }
                Ok(Command::Add {
                    title: title.to_string(),
                    description: description.filter(|d| !d.is_empty()).map(str::to_string),
                })
            }
            "toggle" | "done" => row("toggle", rest).map(Command::Toggle),
            "edit" => row("edit", rest).map(Command::Edit),
            "delete" | "rm" => row("delete", rest).map(Command::Delete),
            "title" => Ok(Command::Title(rest.to_string())),
            "desc" => Ok(Command::Desc(rest.to_string())),
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn row(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidRow(arg.to_string())),
    }
}

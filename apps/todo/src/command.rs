//! Line commands for the terminal view.
//!
//! Each command maps onto one `TodoStore` intent (or a pure view action such
//! as `list`). Rows are 1-based as rendered.

use crate::store::TodoStore;
use crate::types::{Outcome, TodoId, View};
use std::str::FromStr;
use thiserror::Error;
use todolist_runtime::StoreError;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  name <text>       set the name field
  email <text>      set the e-mail field
  submit            add the todo, or update the one being edited
  cancel            cancel the current edit
  edit <row>        edit an active row
  delete <id>       delete a todo by id
  archive <row>     archive an active row
  unarchive <row>   unarchive an archived row
  validate <row>    validate an active row
  list              show the lists
  help              show this help
  quit              exit";

/// A parsed line command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the name field
    Name(String),
    /// Set the email field
    Email(String),
    /// Add or update
    Submit,
    /// Cancel the current edit
    Cancel,
    /// Edit active row at this position
    Edit(usize),
    /// Delete by id
    Delete(TodoId),
    /// Archive active row at this position
    Archive(usize),
    /// Unarchive archived row at this position
    Unarchive(usize),
    /// Validate active row at this position
    Validate(usize),
    /// Re-render
    List,
    /// Print help
    Help,
    /// Exit
    Quit,
}

/// Errors parsing a line command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank input line
    #[error("empty command, type `help` for a list")]
    Empty,

    /// Unrecognised command word
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    /// A row or id argument was missing or not a positive number
    #[error("`{command}` expects a {expected}, got `{got}`")]
    InvalidArgument {
        /// Command word
        command: String,
        /// What was expected
        expected: &'static str,
        /// What was given
        got: String,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let word = word.trim_end();

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "name" => Ok(Self::Name(rest.trim_end().to_string())),
            "email" | "e-mail" => Ok(Self::Email(rest.trim_end().to_string())),
            "submit" | "add" | "update" => Ok(Self::Submit),
            "cancel" => Ok(Self::Cancel),
            "edit" => parse_row(word, rest).map(Self::Edit),
            "delete" | "rm" => parse_number(word, rest, "todo id")
                .map(|id| Self::Delete(TodoId::new(id))),
            "archive" => parse_row(word, rest).map(Self::Archive),
            "unarchive" => parse_row(word, rest).map(Self::Unarchive),
            "validate" => parse_row(word, rest).map(Self::Validate),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_number(command: &str, arg: &str, expected: &'static str) -> Result<u64, CommandError> {
    let arg = arg.trim();
    arg.parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| CommandError::InvalidArgument {
            command: command.to_string(),
            expected,
            got: arg.to_string(),
        })
}

/// Parse a 1-based row into a 0-based position
fn parse_row(command: &str, arg: &str) -> Result<usize, CommandError> {
    let row = parse_number(command, arg, "row number")?;
    usize::try_from(row - 1).map_err(|_| CommandError::InvalidArgument {
        command: command.to_string(),
        expected: "row number",
        got: arg.trim().to_string(),
    })
}

/// What the view loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands, reporting the intent's outcome if one ran
    Continue(Option<Outcome>),
    /// Print help and keep reading
    Help,
    /// Stop
    Quit,
}

/// Runs `command` against `store`
///
/// # Errors
///
/// Returns a [`StoreError`] if the store runtime fails.
pub fn execute(store: &mut TodoStore, command: Command) -> Result<Flow, StoreError> {
    let outcome = match command {
        Command::Name(name) => {
            let draft = store.draft();
            store.update_draft(name, draft.email)?
        },
        Command::Email(email) => {
            let draft = store.draft();
            store.update_draft(draft.name, email)?
        },
        Command::Submit => {
            let draft = store.draft();
            store.submit(draft.name, draft.email)?
        },
        Command::Cancel => store.cancel_edit()?,
        Command::Edit(position) => store.begin_edit(position)?,
        Command::Delete(id) => store.remove(id)?,
        Command::Archive(position) => store.toggle_archive(View::Active, position)?,
        Command::Unarchive(position) => store.toggle_archive(View::Archived, position)?,
        Command::Validate(position) => store.validate(position)?,
        Command::List => return Ok(Flow::Continue(None)),
        Command::Help => return Ok(Flow::Help),
        Command::Quit => return Ok(Flow::Quit),
    };

    Ok(Flow::Continue(Some(outcome)))
}

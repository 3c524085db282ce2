// Parsing of the commands typed by the user.

use snafu::{prelude::*, Snafu};

/// Commands that do not change the tally.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ViewCommand {
    Show,
    Positions,
    Ranking,
    Info,
    /// The optional directory in which to write the report.
    Report(Option<String>),
    Help,
    Quit,
}

/// A parsed line of input.
///
/// Candidate ids refer to the candidates of the active position.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Command {
    Vote(String),
    Unvote(String),
    Add(String),
    Rename { id: String, name: String },
    Delete(String),
    Reset,
    PositionAdd(String),
    PositionRename(String),
    PositionSelect(String),
    PositionDelete(String),
    View(ViewCommand),
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum CommandError {
    #[snafu(display("Comando desconhecido {name:?}. Digite \"help\" para ver os comandos."))]
    Unknown { name: String },
    #[snafu(display("Uso: {usage}"))]
    Usage { usage: &'static str },
}

/// Parses one line of input.
///
/// Returns None for blank lines and comments (starting with `#`).
/// Names are not validated here: a missing name is passed as an empty string
/// and rejected by the tally.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = split_first(line);
    let cmd = match head {
        "vote" => Command::Vote(single_id(rest, "vote <id>")?),
        "unvote" => Command::Unvote(single_id(rest, "unvote <id>")?),
        "add" => Command::Add(rest.to_string()),
        "rename" => {
            let (id, name) = split_first(rest);
            ensure!(!id.is_empty(), UsageSnafu { usage: "rename <id> <nome>" });
            Command::Rename {
                id: id.to_string(),
                name: name.to_string(),
            }
        }
        "delete" => Command::Delete(single_id(rest, "delete <id>")?),
        "reset" => Command::Reset,
        "position" => parse_position(rest)?,
        "show" => Command::View(ViewCommand::Show),
        "positions" => Command::View(ViewCommand::Positions),
        "ranking" => Command::View(ViewCommand::Ranking),
        "info" => Command::View(ViewCommand::Info),
        "report" if rest.is_empty() => Command::View(ViewCommand::Report(None)),
        "report" => Command::View(ViewCommand::Report(Some(rest.to_string()))),
        "help" | "?" => Command::View(ViewCommand::Help),
        "quit" | "exit" => Command::View(ViewCommand::Quit),
        x => return UnknownSnafu { name: x }.fail(),
    };
    Ok(Some(cmd))
}

fn parse_position(rest: &str) -> Result<Command, CommandError> {
    let (sub, arg) = split_first(rest);
    let cmd = match sub {
        "add" => Command::PositionAdd(arg.to_string()),
        "rename" => Command::PositionRename(arg.to_string()),
        "select" => Command::PositionSelect(single_id(arg, "position select <id>")?),
        "delete" => Command::PositionDelete(single_id(arg, "position delete <id>")?),
        _ => {
            return UsageSnafu {
                usage: "position add|rename|select|delete ...",
            }
            .fail()
        }
    };
    Ok(cmd)
}

fn split_first(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn single_id(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    let (id, extra) = split_first(rest);
    ensure!(!id.is_empty() && extra.is_empty(), UsageSnafu { usage });
    Ok(id.to_string())
}

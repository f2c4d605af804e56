//! Text command parsing.
//!
//! Lines starting with `/` are commands; anything else is table chat.

use pokerlink_app::Intent;
use pokerlink_proto::payloads::client::PokerAction;
use thiserror::Error;

/// Help text listing every command.
pub const HELP: &str = "\
/fold /check /call /bet N /raise N /allin
/rebuy yes|no /addon yes|no /sitout /back
/kick PLAYER_ID /pause /resume
/quit   anything else is sent as chat";

/// Command parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Not a known command.
    #[error("unknown command /{0}")]
    Unknown(String),

    /// A required argument is missing.
    #[error("/{command} needs {expected}")]
    MissingArgument {
        /// Command name.
        command: String,
        /// What was expected.
        expected: &'static str,
    },

    /// An argument did not parse.
    #[error("/{command}: invalid argument {value:?}")]
    InvalidArgument {
        /// Command name.
        command: String,
        /// Offending input.
        value: String,
    },
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward to the session.
    Intent(Intent),
    /// Show [`HELP`].
    Help,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Intent(Intent::Chat {
            message: line.to_string(),
            table_chat: true,
        })));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default().to_ascii_lowercase();
    let arg = words.next();

    let intent = match name.as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "fold" => action(PokerAction::Fold, 0),
        "check" => action(PokerAction::Check, 0),
        "call" => action(PokerAction::Call, 0),
        "allin" | "all-in" => action(PokerAction::AllIn, 0),
        "bet" => action(PokerAction::Bet, number(&name, arg, "an amount")?),
        "raise" => action(PokerAction::Raise, number(&name, arg, "an amount")?),
        "rebuy" => Intent::RebuyDecision(yes_no(&name, arg)?),
        "addon" => Intent::AddonDecision(yes_no(&name, arg)?),
        "sitout" => Intent::SitOut,
        "back" => Intent::ComeBack,
        "kick" => Intent::AdminKick(number(&name, arg, "a player id")?),
        "pause" => Intent::AdminPause,
        "resume" => Intent::AdminResume,
        "quit" | "exit" => Intent::Quit,
        _ => return Err(CommandError::Unknown(name)),
    };

    Ok(Some(Command::Intent(intent)))
}

fn action(action: PokerAction, amount: i64) -> Intent {
    Intent::Action { action, amount }
}

fn number(command: &str, arg: Option<&str>, expected: &'static str) -> Result<i64, CommandError> {
    let value = arg.ok_or_else(|| CommandError::MissingArgument {
        command: command.to_string(),
        expected,
    })?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command: command.to_string(),
        value: value.to_string(),
    })
}

fn yes_no(command: &str, arg: Option<&str>) -> Result<bool, CommandError> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("yes" | "y") => Ok(true),
        Some("no" | "n") => Ok(false),
        Some(other) => Err(CommandError::InvalidArgument {
            command: command.to_string(),
            value: other.to_string(),
        }),
        None => Err(CommandError::MissingArgument {
            command: command.to_string(),
            expected: "yes or no",
        }),
    }
}

//! Line-oriented command protocol spoken with a match controller
//!
//! One command per line, arguments separated by whitespace. Commands that
//! only mutate state print nothing; `show_board`, `make_move` and `check_win`
//! print exactly one line.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::coord::Move;
use crate::engine::HexBot;
use crate::error::HexError;

/// Command table printed by `help` and after malformed commands
pub const HELP: &str = "\
Command          Description
init_board <n>   Reset to an empty n x n board
show_board       Print the board, one `|`-terminated row per board row
make_move        Play a random legal move and print it
seto <move>      Record the opponent's move (e.g. seto f18, or seto swap)
sety <move>      Record one of our own moves
unset <move>     Clear a cell
check_win        Print 1 if we won, -1 if the opponent won, 0 otherwise
swap             Pie-rule exchange (acknowledged, no effect)
help             Print this table
quit             End the session";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` takes {expected} argument(s), got {found}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("`{command}` got invalid argument `{argument}`")]
    InvalidArgument {
        command: &'static str,
        argument: String,
    },

    #[error(transparent)]
    Engine(#[from] HexError),
}

impl ProtocolError {
    /// Malformed command line, as opposed to a rejected move
    fn is_usage_error(&self) -> bool {
        !matches!(self, ProtocolError::Engine(_))
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// One parsed protocol command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Raw size as sent; range checking happens when it is applied
    InitBoard(i64),
    ShowBoard,
    MakeMove,
    SetOpponent(String),
    SetOwn(String),
    Unset(String),
    CheckWin,
    Swap,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ProtocolError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            "init_board" => {
                let [size] = expect_args::<1>("init_board", &args)?;
                let size = size.parse().map_err(|_| ProtocolError::InvalidArgument {
                    command: "init_board",
                    argument: size.to_string(),
                })?;
                Command::InitBoard(size)
            }
            "show_board" => {
                expect_args::<0>("show_board", &args)?;
                Command::ShowBoard
            }
            "make_move" => {
                expect_args::<0>("make_move", &args)?;
                Command::MakeMove
            }
            "seto" => {
                let [mv] = expect_args::<1>("seto", &args)?;
                Command::SetOpponent(mv.to_string())
            }
            "sety" => {
                let [mv] = expect_args::<1>("sety", &args)?;
                Command::SetOwn(mv.to_string())
            }
            "unset" => {
                let [mv] = expect_args::<1>("unset", &args)?;
                Command::Unset(mv.to_string())
            }
            "check_win" => {
                expect_args::<0>("check_win", &args)?;
                Command::CheckWin
            }
            "swap" => {
                expect_args::<0>("swap", &args)?;
                Command::Swap
            }
            "help" | "h" => {
                expect_args::<0>("help", &args)?;
                Command::Help
            }
            "quit" | "exit" => {
                expect_args::<0>("quit", &args)?;
                Command::Quit
            }
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn expect_args<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ProtocolError> {
    <[&str; N]>::try_from(args).map_err(|_| ProtocolError::WrongArity {
        command,
        expected: N,
        found: args.len(),
    })
}

// ============================================================================
// SESSION
// ============================================================================

/// What the session sends back for one line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Silent,
    Text(String),
    Quit,
}

/// A bot driven by protocol commands
pub struct Session {
    bot: HexBot,
}

impl Session {
    pub fn new(bot: HexBot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> &HexBot {
        &self.bot
    }

    /// Apply one command
    pub fn execute(&mut self, command: Command) -> Result<Reply, ProtocolError> {
        let reply = match command {
            Command::InitBoard(size) => {
                let size = usize::try_from(size).map_err(|_| HexError::InvalidSize(size))?;
                self.bot.init_board(size)?;
                Reply::Silent
            }
            Command::ShowBoard => Reply::Text(self.bot.show_board()),
            Command::MakeMove => Reply::Text(self.bot.make_move()?),
            // The opponent may answer with the pie-rule token instead of a cell
            Command::SetOpponent(mv) => {
                match Move::parse(&mv, self.bot.size())? {
                    Move::Swap => self.bot.swap(),
                    Move::Place(_) => {
                        self.bot.place_opponent(&mv)?;
                    }
                }
                Reply::Silent
            }
            Command::SetOwn(mv) => {
                self.bot.place_own(&mv)?;
                Reply::Silent
            }
            Command::Unset(mv) => {
                self.bot.clear(&mv)?;
                Reply::Silent
            }
            Command::CheckWin => Reply::Text(self.bot.check_win().protocol_value().to_string()),
            Command::Swap => {
                self.bot.swap();
                Reply::Silent
            }
            Command::Help => Reply::Text(HELP.to_string()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Parse and apply one line; failures become an error reply
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let result = Command::parse(line).and_then(|command| match command {
            Some(command) => self.execute(command),
            None => Ok(Reply::Silent),
        });

        match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(line, error = %e, "command rejected");
                if e.is_usage_error() {
                    Reply::Text(format!("error: {}\n{}", e, HELP))
                } else {
                    Reply::Text(format!("error: {}", e))
                }
            }
        }
    }

    /// Serve commands until `quit` or end of input.
    ///
    /// Bytes that are not UTF-8 are replaced rather than ending the session,
    /// so such a line is answered like any other unknown command.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(&['\r', '\n'][..]);
            tracing::trace!(line, "received");

            match self.handle_line(line) {
                Reply::Silent => {}
                Reply::Text(text) => {
                    writeln!(output, "{}", text)?;
                    output.flush()?;
                }
                Reply::Quit => break,
            }
        }
        Ok(())
    }
}

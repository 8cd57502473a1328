//! Matchup command - referee a game of Hex between two bot executables
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: Referee::repl(), Referee::play_out()
//! - Level 3: Referee::play_turn(), relaying moves, exchanging seats
//! - Level 4: command arguments and prompt commands
//!
//! The referee keeps its own board. Every move a bot plays is checked against
//! it and relayed to the other bot with `seto`; a bot that answers with
//! anything but a legal move forfeits.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use hexbot_core::{encode, winner, Board, Cell, Color, Move};

use crate::bot_link::{BotLink, BotProcess};

/// Prompt commands printed by `help`
pub const REPL_HELP: &str = "\
Command      Description
h | help     Print this table
n | next     Ask the bot whose turn it is for a move
run <n>      Play up to n moves
s | show     Show the referee's board
S | showall  Show the referee's board and both bots' boards
c | check    Report whether someone has won
exit | quit  Shut both bots down and exit";

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct MatchupArgs {
    /// Board side length (1-26)
    pub size: usize,

    /// Bot executable playing black (top-bottom)
    pub black: PathBuf,

    /// Bot executable playing white (left-right)
    pub white: PathBuf,

    /// Play the game to the end without prompting
    #[arg(long)]
    pub auto: bool,
}

/// One line typed at the matchup prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptCommand {
    Help,
    Next,
    Run(usize),
    Show,
    ShowAll,
    Check,
    Quit,
}

impl PromptCommand {
    /// `None` for anything that is not a prompt command
    pub fn parse(line: &str) -> Option<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["h" | "help"] => PromptCommand::Help,
            ["n" | "next"] => PromptCommand::Next,
            ["run", count] => PromptCommand::Run(count.parse().ok()?),
            ["s" | "show"] => PromptCommand::Show,
            ["S" | "showall"] => PromptCommand::ShowAll,
            ["c" | "check"] => PromptCommand::Check,
            ["exit" | "quit"] => PromptCommand::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// What happened on one turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Stone placed; the game goes on
    Placed { color: Color, mv: String },
    /// Pie rule claimed: the bots exchanged colors
    Swapped { color: Color },
    /// Stone placed and it completed a connection
    Won { color: Color, mv: String },
    /// The bot answered with something that is not a legal move
    Forfeit { color: Color, reply: String },
}

impl TurnOutcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            TurnOutcome::Won { color, .. } => Some(*color),
            TurnOutcome::Forfeit { color, .. } => Some(color.opponent()),
            TurnOutcome::Placed { .. } | TurnOutcome::Swapped { .. } => None,
        }
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOutcome::Placed { color, mv } => write!(f, "{} plays {}", color, mv),
            TurnOutcome::Swapped { color } => {
                write!(f, "{} swaps; the bots exchange colors", color)
            }
            TurnOutcome::Won { color, mv } => write!(f, "{} plays {} and has won", color, mv),
            TurnOutcome::Forfeit { color, reply } => write!(
                f,
                "{} forfeits: `{}` is not a legal move, {} has won",
                color,
                reply,
                color.opponent()
            ),
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run matchup command
pub fn run(args: MatchupArgs) -> Result<()> {
    let black = BotProcess::spawn(&args.black, Color::Black)?;
    let white = BotProcess::spawn(&args.white, Color::White)?;
    let mut referee = Referee::new(args.size, black, white)?;

    tracing::info!(size = args.size, auto = args.auto, "match started");

    let stdout = io::stdout();
    if args.auto {
        referee.play_out(stdout.lock())?;
    } else {
        let stdin = io::stdin();
        referee.repl(stdin.lock(), stdout.lock())?;
    }

    let (black, white) = referee.into_seats();
    black.shutdown()?;
    white.shutdown()?;
    Ok(())
}

// ============================================================================
// REFEREE
// ============================================================================

/// Authoritative board plus the two bots seated at it
pub struct Referee<B> {
    board: Board,
    black: B,
    white: B,
    to_move: Color,
    plies: usize,
    result: Option<Color>,
}

impl<B: BotLink> Referee<B> {
    /// Seat both bots and give them an empty `size` board
    pub fn new(size: usize, mut black: B, mut white: B) -> Result<Self> {
        let board = Board::new(size)?;
        let init = format!("init_board {}", size);
        black.send(&init)?;
        white.send(&init)?;

        Ok(Self {
            board,
            black,
            white,
            to_move: Color::Black,
            plies: 0,
            result: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Winner, once the game is decided
    pub fn result(&self) -> Option<Color> {
        self.result
    }

    pub fn seat(&self, color: Color) -> &B {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn seat_mut(&mut self, color: Color) -> &mut B {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    pub fn into_seats(self) -> (B, B) {
        (self.black, self.white)
    }

    // ========================================================================
    // LEVEL 2 - PHASES
    // ========================================================================

    /// Play until someone wins, printing each turn
    pub fn play_out<W: Write>(&mut self, mut output: W) -> Result<Color> {
        loop {
            if let Some(color) = self.result {
                return Ok(color);
            }
            let outcome = self.play_turn()?;
            writeln!(output, "{}", outcome)?;
        }
    }

    /// Interactive prompt; ends on `quit`, end of input or a decided game
    pub fn repl<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        writeln!(output, "{}", REPL_HELP)?;

        let mut buf = Vec::new();
        while self.result.is_none() {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim();
            if line.is_empty() {
                continue;
            }

            match PromptCommand::parse(line) {
                Some(PromptCommand::Help) => writeln!(output, "{}", REPL_HELP)?,
                Some(PromptCommand::Next) => self.advance(1, &mut output)?,
                Some(PromptCommand::Run(count)) => self.advance(count, &mut output)?,
                Some(PromptCommand::Show) => writeln!(output, "{}", self.board)?,
                Some(PromptCommand::ShowAll) => self.show_all(&mut output)?,
                Some(PromptCommand::Check) => match self.result.or_else(|| winner(&self.board)) {
                    Some(color) => writeln!(output, "{} has won", color)?,
                    None => writeln!(output, "Nobody has won yet")?,
                },
                Some(PromptCommand::Quit) => {
                    writeln!(output, "Shutting down")?;
                    break;
                }
                None => writeln!(
                    output,
                    "Command `{}` not found. See `help` for a list of commands",
                    line
                )?,
            }
            output.flush()?;
        }
        Ok(())
    }

    fn advance<W: Write>(&mut self, count: usize, output: &mut W) -> Result<()> {
        for _ in 0..count {
            let outcome = self.play_turn()?;
            writeln!(output, "{}", outcome)?;
            if outcome.winner().is_some() {
                break;
            }
        }
        Ok(())
    }

    /// The referee's board followed by each bot's own view of it
    fn show_all<W: Write>(&mut self, output: &mut W) -> Result<()> {
        writeln!(output, "Referee board\n{}", self.board)?;
        for color in [Color::Black, Color::White] {
            let seen = self.seat_mut(color).board()?;
            let note = if seen == self.board { "" } else { " (differs from the referee)" };
            writeln!(output, "{} bot, {}{}\n{}", color, self.seat(color).name(), note, seen)?;
        }
        Ok(())
    }

    // ========================================================================
    // LEVEL 3 - TURNS
    // ========================================================================

    /// Ask the bot to move and apply its answer
    pub fn play_turn(&mut self) -> Result<TurnOutcome> {
        if let Some(color) = self.result {
            bail!("the game is over, {} has won", color);
        }

        let color = self.to_move;
        let reply = self.seat_mut(color).request("make_move")?;
        let size = self.board.size();

        let outcome = match Move::parse(&reply, size) {
            Ok(Move::Swap) if self.swap_open() => {
                self.seat_mut(color.opponent()).send("swap")?;
                self.exchange_seats();
                self.plies += 1;
                TurnOutcome::Swapped { color }
            }
            Ok(Move::Place(index)) if self.board.get(index).is_empty() => {
                let mv = encode(index, size);
                self.board.set(index, Cell::Stone(color));
                self.plies += 1;
                self.seat_mut(color.opponent()).send(&format!("seto {}", mv))?;

                match winner(&self.board) {
                    Some(won) => {
                        self.result = Some(won);
                        TurnOutcome::Won { color: won, mv }
                    }
                    None => {
                        self.to_move = color.opponent();
                        TurnOutcome::Placed { color, mv }
                    }
                }
            }
            _ => {
                tracing::warn!(%color, reply = %reply, "illegal move");
                self.result = Some(color.opponent());
                TurnOutcome::Forfeit { color, reply }
            }
        };

        tracing::debug!(%outcome, plies = self.plies, "turn played");
        Ok(outcome)
    }

    /// The pie rule may be claimed only as the second move of the game
    fn swap_open(&self) -> bool {
        self.plies == 1
    }

    // The claimant takes over the opening stone's color, and the bot that
    // played it moves next under the other color
    fn exchange_seats(&mut self) {
        std::mem::swap(&mut self.black, &mut self.white);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot_link::testing::LocalBot;
    use std::collections::VecDeque;

    /// Bot that plays a fixed list of replies and records what it was told
    struct ScriptedBot {
        name: &'static str,
        replies: VecDeque<&'static str>,
        received: Vec<String>,
    }

    impl ScriptedBot {
        fn new(name: &'static str, replies: &[&'static str]) -> Self {
            Self {
                name,
                replies: replies.iter().copied().collect(),
                received: Vec::new(),
            }
        }
    }

    impl BotLink for ScriptedBot {
        fn name(&self) -> &str {
            self.name
        }

        fn send(&mut self, line: &str) -> Result<()> {
            self.received.push(line.to_string());
            Ok(())
        }

        fn request(&mut self, line: &str) -> Result<String> {
            self.received.push(line.to_string());
            match self.replies.pop_front() {
                Some(reply) => Ok(reply.to_string()),
                None => bail!("{} ran out of moves", self.name),
            }
        }
    }

    fn scripted(size: usize, black: &[&'static str], white: &[&'static str]) -> Referee<ScriptedBot> {
        Referee::new(
            size,
            ScriptedBot::new("first", black),
            ScriptedBot::new("second", white),
        )
        .unwrap()
    }

    #[test]
    fn test_prompt_commands() {
        assert_eq!(PromptCommand::parse("n"), Some(PromptCommand::Next));
        assert_eq!(PromptCommand::parse(" next "), Some(PromptCommand::Next));
        assert_eq!(PromptCommand::parse("run 12"), Some(PromptCommand::Run(12)));
        assert_eq!(PromptCommand::parse("S"), Some(PromptCommand::ShowAll));
        assert_eq!(PromptCommand::parse("s"), Some(PromptCommand::Show));
        assert_eq!(PromptCommand::parse("c"), Some(PromptCommand::Check));
        assert_eq!(PromptCommand::parse("exit"), Some(PromptCommand::Quit));
        assert_eq!(PromptCommand::parse("run"), None);
        assert_eq!(PromptCommand::parse("run many"), None);
        assert_eq!(PromptCommand::parse("next please"), None);
        assert_eq!(PromptCommand::parse("make_move"), None);
    }

    #[test]
    fn test_moves_are_relayed_with_seto() {
        let mut referee = scripted(3, &["a1", "c1"], &["B2"]);
        for _ in 0..3 {
            referee.play_turn().unwrap();
        }
        assert_eq!(referee.board().render(), "B..|.W.|B..|");
        assert_eq!(referee.to_move(), Color::White);

        let (black, white) = referee.into_seats();
        assert_eq!(black.received, vec!["init_board 3", "make_move", "seto b2", "make_move"]);
        assert_eq!(white.received, vec!["init_board 3", "seto a1", "make_move", "seto c1"]);
    }

    #[test]
    fn test_winning_move_ends_the_game() {
        let mut referee = scripted(2, &["a1", "b1"], &["a2"]);
        assert_eq!(
            referee.play_turn().unwrap(),
            TurnOutcome::Placed { color: Color::Black, mv: "a1".into() }
        );
        referee.play_turn().unwrap();
        let last = referee.play_turn().unwrap();
        assert_eq!(last, TurnOutcome::Won { color: Color::Black, mv: "b1".into() });
        assert_eq!(referee.result(), Some(Color::Black));
        assert!(referee.play_turn().is_err());
    }

    #[test]
    fn test_illegal_replies_forfeit() {
        for bad in ["z9", "hello", "", "a1"] {
            // "a1" is taken by black's opening stone
            let mut referee = scripted(3, &["a1"], &[bad]);
            referee.play_turn().unwrap();
            let outcome = referee.play_turn().unwrap();
            assert_eq!(
                outcome,
                TurnOutcome::Forfeit { color: Color::White, reply: bad.into() }
            );
            assert_eq!(outcome.winner(), Some(Color::Black));
            assert_eq!(referee.board().stone_count(), 1);
        }
    }

    #[test]
    fn test_swap_exchanges_seats() {
        let mut referee = scripted(3, &["b2", "a1"], &["swap"]);
        referee.play_turn().unwrap();

        assert_eq!(
            referee.play_turn().unwrap(),
            TurnOutcome::Swapped { color: Color::White }
        );
        // The claimant now owns black and the opening stone; the opener moves
        // next, as white
        assert_eq!(referee.seat(Color::Black).name(), "second");
        assert_eq!(referee.seat(Color::White).name(), "first");
        assert_eq!(referee.to_move(), Color::White);
        assert_eq!(referee.board().render(), "...|.B.|...|");

        assert_eq!(
            referee.play_turn().unwrap(),
            TurnOutcome::Placed { color: Color::White, mv: "a1".into() }
        );
        let (black, white) = referee.into_seats();
        assert_eq!(white.received, vec!["init_board 3", "make_move", "swap", "make_move"]);
        assert_eq!(black.received, vec!["init_board 3", "seto b2", "make_move", "seto a1"]);
    }

    #[test]
    fn test_swap_outside_the_window_forfeits() {
        let mut referee = scripted(3, &["swap"], &[]);
        assert_eq!(
            referee.play_turn().unwrap(),
            TurnOutcome::Forfeit { color: Color::Black, reply: "swap".into() }
        );

        let mut referee = scripted(3, &["a1", "swap"], &["b2"]);
        referee.play_turn().unwrap();
        referee.play_turn().unwrap();
        assert_eq!(referee.play_turn().unwrap().winner(), Some(Color::White));
    }

    #[test]
    fn test_local_bots_play_to_a_decision() {
        for size in [1, 3, 8, 11] {
            let black = LocalBot::new(Color::Black, size as u64);
            let white = LocalBot::new(Color::White, 100 + size as u64);
            let mut referee = Referee::new(size, black, white).unwrap();

            let mut out = Vec::new();
            let won = referee.play_out(&mut out).unwrap();
            assert_eq!(winner(referee.board()), Some(won));

            let out = String::from_utf8(out).unwrap();
            assert!(out.trim_end().ends_with("has won"), "{}", out);
            assert_eq!(out.lines().count(), referee.board().stone_count());

            // Both bots saw every move
            let board = referee.board().clone();
            let (mut black, mut white) = referee.into_seats();
            assert_eq!(black.board().unwrap(), board);
            assert_eq!(white.board().unwrap(), board);
        }
    }

    #[test]
    fn test_repl_session() {
        let black = LocalBot::new(Color::Black, 5);
        let white = LocalBot::new(Color::White, 6);
        let mut referee = Referee::new(4, black, white).unwrap();

        let input = "help\nn\nbogus\nc\nS\nrun 1000\nn\n";
        let mut out = Vec::new();
        referee.repl(input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with(REPL_HELP));
        assert!(out.contains("black plays "));
        assert!(out.contains("Command `bogus` not found"));
        assert!(out.contains("Nobody has won yet"));
        assert!(out.contains("Referee board"));
        assert!(!out.contains("differs from the referee"));
        assert!(out.trim_end().ends_with("has won"));
        assert!(referee.result().is_some());
    }

    #[test]
    fn test_repl_quit() {
        let mut referee = scripted(3, &[], &[]);
        let mut out = Vec::new();
        referee.repl(&b"quit\nn\n"[..], &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("Shutting down\n"));

        let (black, _) = referee.into_seats();
        assert_eq!(black.received, vec!["init_board 3"]);
    }
}

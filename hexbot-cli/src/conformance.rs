//! Conformance command - check a bot executable against the line protocol
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: cases(), run_case(), report()
//! - Level 3: per-command case builders
//! - Level 4: command arguments
//!
//! Every case starts a fresh bot, replays a short script and compares the
//! single reply to one query against the expected line.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use hexbot_core::Color;

use crate::bot_link::{BotLink, BotProcess};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct ConformanceArgs {
    /// Bot executable to check
    pub bot: PathBuf,

    /// Color the bot is started with: black or white
    pub color: Color,
}

/// One scripted check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub name: String,
    /// Commands sent before the query; none of them has a reply
    pub script: Vec<String>,
    pub query: &'static str,
    pub expected: String,
}

impl Case {
    /// Fresh `size` board with our stones then the opponent's
    fn on_board(name: impl Into<String>, size: usize, own: &[&str], opponent: &[&str]) -> Self {
        let mut script = vec![format!("init_board {}", size)];
        script.extend(own.iter().map(|mv| format!("sety {}", mv)));
        script.extend(opponent.iter().map(|mv| format!("seto {}", mv)));
        Self {
            name: name.into(),
            script,
            query: "show_board",
            expected: String::new(),
        }
    }

    fn then(mut self, commands: &[&str]) -> Self {
        self.script.extend(commands.iter().map(|c| c.to_string()));
        self
    }

    fn expect(mut self, query: &'static str, expected: impl Into<String>) -> Self {
        self.query = query;
        self.expected = expected.into();
        self
    }
}

/// What a bot answered to one case
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseResult {
    pub name: String,
    pub expected: String,
    pub actual: String,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run conformance command
pub fn run(args: ConformanceArgs) -> Result<()> {
    let cases = cases(args.color);
    tracing::info!(bot = %args.bot.display(), color = %args.color, cases = cases.len(), "checking bot");

    let mut results = Vec::with_capacity(cases.len());
    for case in &cases {
        let mut bot = BotProcess::spawn(&args.bot, args.color)?;
        let actual = match run_case(&mut bot, case) {
            Ok(reply) => reply,
            Err(e) => format!("<no reply: {:#}>", e),
        };
        bot.shutdown()?;

        let result = CaseResult {
            name: case.name.clone(),
            expected: case.expected.clone(),
            actual,
        };
        println!("{}", report(&result));
        results.push(result);
    }

    let failed = results.iter().filter(|r| !r.passed()).count();
    println!("{} passed, {} failed", results.len() - failed, failed);
    if failed > 0 {
        bail!("{} of {} conformance checks failed", failed, results.len());
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Replay the case's script and return the reply to its query
pub fn run_case<B: BotLink>(bot: &mut B, case: &Case) -> Result<String> {
    for line in &case.script {
        bot.send(line)?;
    }
    bot.request(case.query)
}

/// One line for a pass, a short diff for a failure
pub fn report(result: &CaseResult) -> String {
    if result.passed() {
        format!("ok    {}", result.name)
    } else {
        format!(
            "FAIL  {}\n      expected: {}\n      actual:   {}",
            result.name, result.expected, result.actual
        )
    }
}

/// The full suite for a bot playing `color`
pub fn cases(color: Color) -> Vec<Case> {
    let own = color.symbol();
    let other = color.opponent().symbol();

    let mut cases = Vec::new();
    cases.extend(init_board_cases());
    cases.extend(placement_cases("sety", own));
    cases.extend(placement_cases("seto", other));
    cases.extend(unset_cases(own, other));
    cases.extend(win_cases(color));
    cases.extend(edge_cases(own, other));
    cases
}

// ============================================================================
// LEVEL 3 - CASE BUILDERS
// ============================================================================

fn blank(size: usize) -> String {
    format!("{}|", ".".repeat(size)).repeat(size)
}

/// Render rows given as strings of `X` (stone) and `.` (empty)
fn rows(rows: &[&str], stone: char) -> String {
    rows.iter().map(|r| format!("{}|", r.replace('X', &stone.to_string()))).collect()
}

fn init_board_cases() -> Vec<Case> {
    [1, 2, 3, 8, 11, 26]
        .into_iter()
        .map(|size| {
            Case::on_board(format!("init_board {0} creates a blank {0}x{0} board", size), size, &[], &[])
                .expect("show_board", blank(size))
        })
        .collect()
}

/// The same placements, once as our moves (`sety`) and once as theirs (`seto`)
fn placement_cases(command: &'static str, stone: char) -> Vec<Case> {
    let place = |name: &str, size: usize, moves: &[&str], expected: String| {
        let (own, opponent): (&[&str], &[&str]) = if command == "sety" {
            (moves, &[])
        } else {
            (&[], moves)
        };
        Case::on_board(format!("{} {}", command, name), size, own, opponent).expect("show_board", expected)
    };

    let mut c8 = vec![".........."; 10];
    c8[2] = ".......X..";

    let mut diagonal = Vec::new();
    let mut big_diagonal = Vec::new();
    let mut big_fill = Vec::new();
    for (r, letter) in ('a'..='l').enumerate() {
        let mut row = vec!['.'; 12];
        row[r] = 'X';
        big_diagonal.push(row.into_iter().collect::<String>());
        diagonal.push(format!("{}{}", letter, r + 1));
        for number in 1..=12 {
            big_fill.push(format!("{}{}", letter, number));
        }
    }
    let big_diagonal: Vec<&str> = big_diagonal.iter().map(String::as_str).collect();
    let diagonal: Vec<&str> = diagonal.iter().map(String::as_str).collect();
    let big_fill: Vec<&str> = big_fill.iter().map(String::as_str).collect();

    vec![
        place("a1", 3, &["a1"], rows(&["X..", "...", "..."], stone)),
        place("c8 is row c, column 8", 10, &["c8"], rows(&c8[..], stone)),
        place("down the first column", 3, &["a1", "b1", "c1"], rows(&["X..", "X..", "X.."], stone)),
        place(
            "on every cell",
            3,
            &["a1", "a2", "a3", "b1", "b2", "b3", "c1", "c2", "c3"],
            rows(&["XXX", "XXX", "XXX"], stone),
        ),
        place("diagonally", 3, &["a1", "b2", "c3"], rows(&["X..", ".X.", "..X"], stone)),
        place("twice on the same cell", 3, &["a1", "a1", "c3"], rows(&["X..", "...", "..X"], stone)),
        place("diagonally on a 12x12 board", 12, &diagonal[..], rows(&big_diagonal[..], stone)),
        place("on every cell of a 12x12 board", 12, &big_fill[..], rows(&["XXXXXXXXXXXX"; 12], stone)),
    ]
}

/// `unset` stages, each replaying the stages before it on a fresh bot
fn unset_cases(own: char, other: char) -> Vec<Case> {
    let render = |s: &str| s.replace('X', &own.to_string()).replace('O', &other.to_string());
    let setup = Case::on_board("", 4, &["a1", "a2", "d3", "d4"], &["d1", "d2", "a3", "a4"]);

    let first = setup.then(&["unset a2"]);
    let second = first.clone().then(&["unset a3", "unset d2", "unset d3"]);
    let third = second.clone().then(&["unset a1", "unset a4", "unset d1", "unset d4"]);
    let fourth = third.clone().then(&["unset a1", "unset a4", "unset d1", "unset d4"]);
    let fifth = fourth
        .clone()
        .then(&["sety a1", "sety a4", "sety d1", "sety d4", "init_board 4"]);

    let named = |case: Case, name: &str, expected: String| Case {
        name: name.to_string(),
        ..case.expect("show_board", expected)
    };

    vec![
        named(first, "unset one of our stones", render("X.OO|....|....|OOXX|")),
        named(second, "unset stones of both sides", render("X..O|....|....|O..X|")),
        named(third, "unset every remaining stone", blank(4)),
        named(fourth, "unset on empty cells", blank(4)),
        named(fifth, "init_board clears every stone", blank(4)),
    ]
}

fn win_cases(color: Color) -> Vec<Case> {
    // Stones of `side`, sent with `sety` or `seto` depending on who we are
    let placed_by = |side: Color, name: &str, size: usize, moves: &[&str]| {
        let none: &[&str] = &[];
        if side == color {
            Case::on_board(name, size, moves, none)
        } else {
            Case::on_board(name, size, none, moves)
        }
    };
    let result_for = |winner: Color| if winner == color { "1" } else { "-1" };

    let mut cases: Vec<Case> = [1, 3, 8, 20, 26]
        .into_iter()
        .map(|size| {
            Case::on_board(format!("no win on a blank {0}x{0} board", size), size, &[], &[])
                .expect("check_win", "0")
        })
        .collect();

    let top_row = ["a1", "a2", "a3"];
    let winding = [
        "a3", "b3", "c3", "c4", "c5", "c6", "c7", "d7", "e7", "e6", "e5", "f5", "g5", "h5", "h6",
        "i6", "j6", "j7", "k7",
    ];

    cases.push(
        placed_by(Color::White, "white wins across the top row", 3, &top_row)
            .expect("check_win", result_for(Color::White)),
    );
    cases.push(
        placed_by(Color::Black, "black wins down the left column", 3, &["a1", "b1", "c1"])
            .expect("check_win", result_for(Color::Black)),
    );
    cases.push(
        placed_by(Color::Black, "black wins along a winding path on an 11x11 board", 11, &winding)
            .expect("check_win", result_for(Color::Black)),
    );
    cases.push(
        placed_by(Color::Black, "black stones across a row decide nothing", 3, &top_row)
            .expect("check_win", "0"),
    );
    cases
}

/// Behavior the protocol leaves to the bot but a controller relies on
fn edge_cases(own: char, other: char) -> Vec<Case> {
    vec![
        Case::on_board("an occupied cell keeps its first stone", 3, &["b2"], &["b2"])
            .expect("show_board", rows(&["...", ".X.", "..."], own)),
        Case::on_board("swap leaves the board alone", 3, &[], &["b2"])
            .then(&["swap"])
            .expect("show_board", rows(&["...", ".X.", "..."], other)),
        Case::on_board("upper-case rows are accepted", 3, &["C3"], &[])
            .expect("show_board", rows(&["...", "...", "..X"], own)),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot_link::testing::LocalBot;

    #[test]
    fn test_reference_bot_passes_every_case() {
        for color in [Color::Black, Color::White] {
            for case in cases(color) {
                let mut bot = LocalBot::new(color, 3);
                let reply = run_case(&mut bot, &case).unwrap();
                assert_eq!(reply, case.expected, "{} ({})", case.name, color);
            }
        }
    }

    #[test]
    fn test_case_expectations_follow_color() {
        let black = cases(Color::Black);
        let white = cases(Color::White);
        assert_eq!(black.len(), white.len());

        let a1 = |cases: &[Case]| {
            cases
                .iter()
                .find(|c| c.name == "sety a1")
                .map(|c| c.expected.clone())
                .unwrap()
        };
        assert_eq!(a1(&black), "B..|...|...|");
        assert_eq!(a1(&white), "W..|...|...|");
    }

    #[test]
    fn test_c8_expectation() {
        let case = cases(Color::White)
            .into_iter()
            .find(|c| c.name == "seto c8 is row c, column 8")
            .unwrap();
        assert_eq!(case.script, vec!["init_board 10", "seto c8"]);
        assert_eq!(
            case.expected,
            "..........|..........|.......B..|..........|..........|\
             ..........|..........|..........|..........|..........|"
        );
    }

    #[test]
    fn test_wrong_reply_is_reported() {
        let result = CaseResult {
            name: "sety a1".to_string(),
            expected: "B..|...|...|".to_string(),
            actual: "W..|...|...|".to_string(),
        };
        assert!(!result.passed());
        let text = report(&result);
        assert!(text.starts_with("FAIL  sety a1"));
        assert!(text.contains("expected: B..|...|...|"));
        assert!(text.contains("actual:   W..|...|...|"));

        let ok = CaseResult { actual: result.expected.clone(), ..result };
        assert_eq!(report(&ok), "ok    sety a1");
    }
}

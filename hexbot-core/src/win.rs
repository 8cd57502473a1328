//! Win detection by border-to-border connectivity search
//!
//! Each color gets one iterative depth-first search seeded from all of its
//! stones on its starting border. A visited bitmap guarantees every cell is
//! pushed at most once per search, so a full check is O(N^2).

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Color};

/// Game outcome from the point of view of one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    OwnWin,
    OpponentWin,
    NoWinnerYet,
}

impl Outcome {
    /// Outcome for `own` given the board's winner
    pub fn for_side(own: Color, winner: Option<Color>) -> Self {
        match winner {
            Some(color) if color == own => Outcome::OwnWin,
            Some(_) => Outcome::OpponentWin,
            None => Outcome::NoWinnerYet,
        }
    }

    /// Value printed by `check_win`: 1, -1 or 0
    pub fn protocol_value(self) -> i8 {
        match self {
            Outcome::OwnWin => 1,
            Outcome::OpponentWin => -1,
            Outcome::NoWinnerYet => 0,
        }
    }
}

/// Result and work counters of one connectivity search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// A chain of stones joins both borders
    pub connected: bool,
    /// Cells popped from the stack
    pub visited: usize,
    /// Neighbor entries examined
    pub neighbor_checks: usize,
}

/// Whether `index` lies on the border `color` starts from
fn on_start_border(board: &Board, color: Color, index: usize) -> bool {
    let (row, col) = board.row_col(index);
    match color {
        Color::Black => row == 0,
        Color::White => col == 0,
    }
}

/// Whether `index` lies on the border `color` must reach
fn on_target_border(board: &Board, color: Color, index: usize) -> bool {
    let (row, col) = board.row_col(index);
    let last = board.size() - 1;
    match color {
        Color::Black => row == last,
        Color::White => col == last,
    }
}

/// Search for a chain of `color` stones joining its two borders
pub fn search(board: &Board, color: Color) -> SearchReport {
    let stone = Cell::Stone(color);
    let mut report = SearchReport::default();
    let mut seen = vec![false; board.cell_count()];

    // Seed from every stone on the starting border
    let mut stack: Vec<usize> = (0..board.cell_count())
        .filter(|&index| on_start_border(board, color, index) && board.get(index) == stone)
        .collect();
    for &index in &stack {
        seen[index] = true;
    }

    while let Some(index) = stack.pop() {
        report.visited += 1;
        if on_target_border(board, color, index) {
            report.connected = true;
            break;
        }

        for &next in board.neighbors(index) {
            report.neighbor_checks += 1;
            if !seen[next] && board.get(next) == stone {
                seen[next] = true;
                stack.push(next);
            }
        }
    }

    report
}

/// Color holding a border-to-border chain, if any
#[cfg(not(feature = "parallel"))]
pub fn winner(board: &Board) -> Option<Color> {
    let black = search(board, Color::Black).connected;
    let white = search(board, Color::White).connected;
    pick_winner(black, white)
}

/// Color holding a border-to-border chain, if any.
///
/// Both searches only read the board, so they run side by side.
#[cfg(feature = "parallel")]
pub fn winner(board: &Board) -> Option<Color> {
    let (black, white) = rayon::join(
        || search(board, Color::Black).connected,
        || search(board, Color::White).connected,
    );
    pick_winner(black, white)
}

fn pick_winner(black: bool, white: bool) -> Option<Color> {
    debug_assert!(!(black && white), "both colors report a connection");
    match (black, white) {
        (true, _) => Some(Color::Black),
        (false, true) => Some(Color::White),
        (false, false) => None,
    }
}

/// Outcome of `board` for the side playing `own`
pub fn check_win(board: &Board, own: Color) -> Outcome {
    Outcome::for_side(own, winner(board))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::decode;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn board_with(size: usize, black: &[&str], white: &[&str]) -> Board {
        let mut board = Board::new(size).unwrap();
        for mv in black {
            board.set(decode(mv, size).unwrap(), Cell::Stone(Color::Black));
        }
        for mv in white {
            board.set(decode(mv, size).unwrap(), Cell::Stone(Color::White));
        }
        board
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        for size in [1, 3, 8, 20, 26] {
            let board = Board::new(size).unwrap();
            assert_eq!(winner(&board), None);
            assert_eq!(check_win(&board, Color::Black), Outcome::NoWinnerYet);
        }
    }

    #[test]
    fn test_white_wins_across_row() {
        let board = board_with(3, &[], &["a1", "a2", "a3"]);
        assert_eq!(winner(&board), Some(Color::White));
        assert_eq!(check_win(&board, Color::White), Outcome::OwnWin);
        assert_eq!(check_win(&board, Color::Black), Outcome::OpponentWin);
    }

    #[test]
    fn test_black_wins_down_column() {
        let board = board_with(3, &["a1", "b1", "c1"], &[]);
        assert_eq!(winner(&board), Some(Color::Black));
    }

    #[test]
    fn test_single_cell_board() {
        let board = board_with(1, &["a1"], &[]);
        assert_eq!(winner(&board), Some(Color::Black));
        let board = board_with(1, &[], &["a1"]);
        assert_eq!(winner(&board), Some(Color::White));
    }

    #[test]
    fn test_diagonal_follows_hex_adjacency() {
        // a1-b2-c3-d4 steps along +N+1, which is adjacent
        let board = board_with(4, &["a1", "b2", "c3", "d4"], &[]);
        assert_eq!(winner(&board), Some(Color::Black));

        // a4-b3-c2-d1 steps along +N-1, which is not
        let board = board_with(4, &["a4", "b3", "c2", "d1"], &[]);
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_blocked_path_is_not_a_win() {
        let board = board_with(4, &["a1", "a2", "a3", "a4"], &["b1", "c1", "d1"]);
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_winding_black_path_on_big_board() {
        // Snakes right, down, back left and down again
        let black = [
            "a3", "b3", "c3", "c4", "c5", "c6", "c7", "d7", "e7", "e6", "e5", "f5", "g5",
            "h5", "h6", "i6", "j6", "j7", "k7",
        ];
        let board = board_with(11, &black, &["d3", "d4", "d5", "d6", "f6", "f7"]);
        assert_eq!(winner(&board), Some(Color::Black));

        let mut cut = board.clone();
        cut.set(decode("i6", 11).unwrap(), Cell::Empty);
        assert_eq!(winner(&cut), None);
    }

    #[test]
    fn test_win_toggles_with_single_cell() {
        let mut board = board_with(4, &["a2", "b2", "d2"], &["c1", "c3", "c4"]);
        assert_eq!(winner(&board), None);

        let c2 = decode("c2", 4).unwrap();
        board.set(c2, Cell::Stone(Color::Black));
        assert_eq!(winner(&board), Some(Color::Black));

        board.set(c2, Cell::Stone(Color::White));
        assert_eq!(winner(&board), Some(Color::White));

        board.set(c2, Cell::Empty);
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_full_board_has_exactly_one_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for size in 1..=12 {
            for _ in 0..25 {
                let mut board = Board::new(size).unwrap();
                for index in 0..board.cell_count() {
                    let color = if rng.gen_bool(0.5) { Color::Black } else { Color::White };
                    board.set(index, Cell::Stone(color));
                }
                let black = search(&board, Color::Black).connected;
                let white = search(&board, Color::White).connected;
                assert!(black != white, "size {}: black={} white={}\n{}", size, black, white, board);
            }
        }
    }

    #[test]
    fn test_search_visits_each_cell_once() {
        // Comb of long vertical black columns joined at the top with no way
        // to the bottom row: maximal redundancy for a naive restart search
        let size = 26;
        let mut board = Board::new(size).unwrap();
        for row in 0..size - 1 {
            for col in (0..size).step_by(2) {
                board.set(board.index_of(row, col), Cell::Stone(Color::Black));
            }
        }
        for col in 0..size {
            board.set(board.index_of(0, col), Cell::Stone(Color::Black));
        }

        let report = search(&board, Color::Black);
        assert!(!report.connected);
        assert_eq!(report.visited, board.stone_count());
        assert!(report.neighbor_checks <= 6 * board.cell_count());
    }

    #[test]
    fn test_search_reports_nothing_without_seeds() {
        let board = board_with(5, &["c3", "d3", "e3"], &[]);
        let report = search(&board, Color::Black);
        assert_eq!(report, SearchReport::default());
    }

    #[test]
    fn test_outcome_protocol_values() {
        assert_eq!(Outcome::OwnWin.protocol_value(), 1);
        assert_eq!(Outcome::OpponentWin.protocol_value(), -1);
        assert_eq!(Outcome::NoWinnerYet.protocol_value(), 0);
    }
}

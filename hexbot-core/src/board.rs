//! Hex board geometry, cell storage and the adjacency table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HexError, Result};

/// Largest supported side length (one letter per row)
pub const MAX_BOARD_SIZE: usize = 26;

/// Side length used when nothing else is configured
pub const DEFAULT_BOARD_SIZE: usize = 26;

/// Neighbor steps as (row, column) deltas.
///
/// In linear-index space these are the offsets `-1, +1, -N, -N-1, +N, +N+1`.
pub const DIRECTIONS: [(isize, isize); 6] = [
    (0, -1),  // W
    (0, 1),   // E
    (-1, 0),  // NE
    (-1, -1), // NW
    (1, 0),   // SW
    (1, 1),   // SE
];

/// Symbol written for an empty cell
const EMPTY_SYMBOL: char = '.';

/// Row terminator in the protocol rendering
const ROW_END: char = '|';

// ============================================================================
// CORE TYPES
// ============================================================================

/// Stone color.
///
/// Black connects the top edge to the bottom edge, White connects left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Color::Black),
            "white" | "w" => Ok(Color::White),
            _ => Err(HexError::UnknownColor(s.to_string())),
        }
    }
}

/// Contents of one cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Stone(Color),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Stone(color) => Some(color),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => EMPTY_SYMBOL,
            Cell::Stone(color) => color.symbol(),
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            EMPTY_SYMBOL => Some(Cell::Empty),
            'B' => Some(Cell::Stone(Color::Black)),
            'W' => Some(Cell::Stone(Color::White)),
            _ => None,
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        Cell::Stone(color)
    }
}

/// In-bounds neighbors of one cell (2 to 6 entries)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Neighbors {
    cells: [usize; 6],
    len: u8,
}

impl Neighbors {
    fn as_slice(&self) -> &[usize] {
        &self.cells[..self.len as usize]
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Square Hex board stored as a flat row-major array.
///
/// `index = row * size + column`, row `a` is 0 and column `1` is 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    adjacency: Vec<Neighbors>,
}

impl Board {
    /// Create an empty `size`x`size` board
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(HexError::InvalidSize(size as i64));
        }

        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
            adjacency: build_adjacency(size),
        })
    }

    /// Erase everything and start over with a new side length.
    ///
    /// On error the board is left as it was.
    pub fn initialize(&mut self, size: usize) -> Result<()> {
        *self = Board::new(size)?;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (`size * size`)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell at `index`.
    ///
    /// Panics if `index` is off the board; callers go through the move codec,
    /// which already rejects out-of-range coordinates.
    pub fn get(&self, index: usize) -> Cell {
        self.check_index(index);
        self.cells[index]
    }

    pub fn set(&mut self, index: usize, cell: Cell) {
        self.check_index(index);
        self.cells[index] = cell;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Neighbors of `index` from the precomputed adjacency table
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.check_index(index);
        self.adjacency[index].as_slice()
    }

    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| i)
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Protocol rendering: each row's symbols followed by `|`.
    ///
    /// A 3x3 board with a black stone on `a1` renders as `B..|...|...|`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size);
        for row in self.cells.chunks(self.size) {
            out.extend(row.iter().map(|cell| cell.symbol()));
            out.push(ROW_END);
        }
        out
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.cells.len(),
            "cell index {} out of range for a {}x{} board",
            index,
            self.size,
            self.size
        );
    }
}

/// Precompute in-bounds neighbors for every cell
fn build_adjacency(size: usize) -> Vec<Neighbors> {
    let n = size as isize;
    (0..size * size)
        .map(|index| {
            let row = (index / size) as isize;
            let col = (index % size) as isize;
            let mut neighbors = Neighbors { cells: [0; 6], len: 0 };

            for (dr, dc) in DIRECTIONS {
                let (r, c) = (row + dr, col + dc);
                if (0..n).contains(&r) && (0..n).contains(&c) {
                    neighbors.cells[neighbors.len as usize] = (r * n + c) as usize;
                    neighbors.len += 1;
                }
            }
            neighbors
        })
        .collect()
}

// Human-oriented view. Each row is shifted one column left of the row above so
// that a cell's lower neighbors (+N, +N+1) sit directly beneath it:
//
//    . . B
//   . W .
//  B . .
// ------
// Black: B (top-bottom), White: W (left-right)
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.size).enumerate() {
            write!(f, "{}", " ".repeat(self.size - 1 - r))?;
            for cell in row {
                write!(f, "{} ", cell.symbol())?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{}\nBlack: B (top-bottom), White: W (left-right)",
            "-".repeat(2 * self.size)
        )
    }
}

/// Parse the protocol rendering produced by [`Board::render`]
impl FromStr for Board {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let rows: Vec<&str> = text
            .strip_suffix(ROW_END)
            .ok_or_else(|| HexError::InvalidBoardText(format!("missing final `{}`", ROW_END)))?
            .split(ROW_END)
            .collect();

        let size = rows.len();
        let mut board = Board::new(size)
            .map_err(|_| HexError::InvalidBoardText(format!("unsupported row count {}", size)))?;

        for (r, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().collect();
            if symbols.len() != size {
                return Err(HexError::InvalidBoardText(format!(
                    "row {} has {} cells, expected {}",
                    r + 1,
                    symbols.len(),
                    size
                )));
            }
            for (c, symbol) in symbols.into_iter().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or_else(|| {
                    HexError::InvalidBoardText(format!("unknown cell symbol `{}`", symbol))
                })?;
                board.cells[r * size + c] = cell;
            }
        }

        Ok(board)
    }
}

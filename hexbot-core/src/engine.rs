//! Move engine: the bot's authoritative board and its legal mutations

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Cell, Color};
use crate::coord::{decode, encode};
use crate::error::{HexError, Result};
use crate::win::{self, Outcome};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Moves played while the pie-rule exchange may still be claimed
const SWAP_WINDOW_MOVES: u32 = 1;

// ============================================================================
// TYPES
// ============================================================================

/// What a placement request did to the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Placed,
    /// Cell already held a stone; nothing changed
    Occupied,
}

/// Random Hex bot playing one color
#[derive(Clone, Debug)]
pub struct HexBot {
    color: Color,
    board: Board,
    move_count: u32,
    rng: ChaCha8Rng,
}

impl HexBot {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Bot with an entropy-seeded RNG
    pub fn new(color: Color, size: usize) -> Result<Self> {
        Self::with_rng(color, size, ChaCha8Rng::from_entropy())
    }

    /// Bot with a reproducible move sequence
    pub fn with_seed(color: Color, size: usize, seed: u64) -> Result<Self> {
        Self::with_rng(color, size, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(color: Color, size: usize, rng: ChaCha8Rng) -> Result<Self> {
        Ok(Self {
            color,
            board: Board::new(size)?,
            move_count: 0,
            rng,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Whether the pie-rule exchange would still be meaningful: exactly one
    /// move has been played since the board was initialized
    pub fn swap_available(&self) -> bool {
        self.move_count == SWAP_WINDOW_MOVES
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Throw the board away and start an empty `size`x`size` game
    pub fn init_board(&mut self, size: usize) -> Result<()> {
        self.board.initialize(size)?;
        self.move_count = 0;
        tracing::info!(size, color = %self.color, "board initialized");
        Ok(())
    }

    /// Place one of our own stones
    pub fn place_own(&mut self, mv: &str) -> Result<Placement> {
        self.place(mv, self.color)
    }

    /// Record the opponent's stone
    pub fn place_opponent(&mut self, mv: &str) -> Result<Placement> {
        self.place(mv, self.color.opponent())
    }

    /// Empty a cell, whatever it holds
    pub fn clear(&mut self, mv: &str) -> Result<()> {
        let index = decode(mv, self.size())?;
        self.board.set(index, Cell::Empty);
        tracing::debug!(mv, "cell cleared");
        Ok(())
    }

    /// Pick a uniformly random empty cell, play it and return its notation
    pub fn make_move(&mut self) -> Result<String> {
        let empties: Vec<usize> = self.board.empty_cells().collect();
        let &index = empties.choose(&mut self.rng).ok_or(HexError::BoardFull)?;

        self.board.set(index, Cell::Stone(self.color));
        self.move_count += 1;

        let mv = encode(index, self.size());
        tracing::debug!(mv = %mv, choices = empties.len(), "chose move");
        Ok(mv)
    }

    /// Pie-rule exchange.
    ///
    /// Acknowledged without changing the board, the color or the move count.
    pub fn swap(&mut self) {
        tracing::warn!(
            window_open = self.swap_available(),
            "swap received; pie rule is not supported, ignoring"
        );
    }

    pub fn check_win(&self) -> Outcome {
        let outcome = win::check_win(&self.board, self.color);
        tracing::debug!(?outcome, "win check");
        outcome
    }

    pub fn show_board(&self) -> String {
        self.board.render()
    }

    fn place(&mut self, mv: &str, color: Color) -> Result<Placement> {
        let index = decode(mv, self.size())?;

        if !self.board.get(index).is_empty() {
            tracing::warn!(mv, %color, "cell occupied, placement ignored");
            return Ok(Placement::Occupied);
        }

        self.board.set(index, Cell::Stone(color));
        self.move_count += 1;
        tracing::debug!(mv, %color, "stone placed");
        Ok(Placement::Placed)
    }
}

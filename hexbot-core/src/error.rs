//! Recoverable engine errors

use thiserror::Error;

/// Errors a caller can observe and recover from.
///
/// Every failing operation leaves the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("invalid move format: `{0}`")]
    InvalidMoveFormat(String),

    #[error("invalid board size: {0} (expected 1..={})", crate::board::MAX_BOARD_SIZE)]
    InvalidSize(i64),

    #[error("no empty cells left to play")]
    BoardFull,

    #[error("unknown color `{0}` (expected black or white)")]
    UnknownColor(String),

    #[error("invalid board text: {0}")]
    InvalidBoardText(String),
}

pub type Result<T> = std::result::Result<T, HexError>;

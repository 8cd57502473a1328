//! Move notation: `<letter><number>` strings to linear cell indices and back
//!
//! The letter selects the row (`a` = 0), the number selects the column
//! (`1` = 0). On an 8x8 board `a1` is 0, `b1` is 8 and `h8` is 63.

use serde::{Deserialize, Serialize};

use crate::error::{HexError, Result};

/// Token reserved for the pie-rule exchange
pub const SWAP_TOKEN: &str = "swap";

/// Decode a move string into a cell index on a `size`x`size` board
pub fn decode(mv: &str, size: usize) -> Result<usize> {
    let invalid = || HexError::InvalidMoveFormat(mv.to_string());

    let mut chars = mv.chars();
    let letter = chars.next().filter(|c| c.is_ascii_alphabetic()).ok_or_else(invalid)?;
    let digits = chars.as_str();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let row = (letter.to_ascii_lowercase() as u8 - b'a') as usize;
    // Anything too long to parse is off the board anyway
    let number: usize = digits.parse().map_err(|_| invalid())?;

    if row >= size || number == 0 || number > size {
        return Err(invalid());
    }

    Ok(row * size + (number - 1))
}

/// Encode a cell index as a move string.
///
/// `index` must be on the board and `size` at most 26.
pub fn encode(index: usize, size: usize) -> String {
    debug_assert!(index < size * size, "index {} off a {}x{} board", index, size, size);
    let row = index / size;
    let col = index % size;
    format!("{}{}", row_letter(row), col + 1)
}

fn row_letter(row: usize) -> char {
    debug_assert!(row < 26);
    (b'a' + row as u8) as char
}

/// A move as seen on the command surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Stone on a cell
    Place(usize),
    /// Pie-rule exchange
    Swap,
}

impl Move {
    pub fn parse(token: &str, size: usize) -> Result<Self> {
        if token == SWAP_TOKEN {
            Ok(Move::Swap)
        } else {
            decode(token, size).map(Move::Place)
        }
    }

    pub fn to_notation(self, size: usize) -> String {
        match self {
            Move::Place(index) => encode(index, size),
            Move::Swap => SWAP_TOKEN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_cells() {
        assert_eq!(decode("a1", 8), Ok(0));
        assert_eq!(decode("a8", 8), Ok(7));
        assert_eq!(decode("b1", 8), Ok(8));
        assert_eq!(decode("h8", 8), Ok(63));

        assert_eq!(decode("a1", 26), Ok(0));
        assert_eq!(decode("f18", 26), Ok(5 * 26 + 17));
        assert_eq!(decode("z26", 26), Ok(675));
    }

    #[test]
    fn test_decode_accepts_uppercase_row() {
        assert_eq!(decode("C3", 8), decode("c3", 8));
    }

    #[test]
    fn test_decode_failures() {
        for bad in ["", "1", "a", "1a", "i1", "a9", "a0", "a-1", "a+1", "ab", "a 1", "é1", "a99999999999999999999999"] {
            assert_eq!(
                decode(bad, 8),
                Err(HexError::InvalidMoveFormat(bad.to_string())),
                "`{}` should not decode",
                bad
            );
        }
    }

    #[test]
    fn test_encode_known_cells() {
        assert_eq!(encode(0, 8), "a1");
        assert_eq!(encode(7, 8), "a8");
        assert_eq!(encode(8, 8), "b1");
        assert_eq!(encode(63, 8), "h8");
        assert_eq!(encode(675, 26), "z26");
    }

    #[test]
    fn test_decode_encode_bijection() {
        for size in [1, 2, 3, 8, 11, 19, 26] {
            for index in 0..size * size {
                let mv = encode(index, size);
                assert_eq!(decode(&mv, size), Ok(index));
                assert_eq!(encode(decode(&mv, size).unwrap(), size), mv);
            }
        }
    }

    #[test]
    fn test_move_parse() {
        assert_eq!(Move::parse("swap", 8), Ok(Move::Swap));
        assert_eq!(Move::parse("c2", 8), Ok(Move::Place(17)));
        assert!(Move::parse("SWAP", 8).is_err());
        assert_eq!(Move::Place(17).to_notation(8), "c2");
        assert_eq!(Move::Swap.to_notation(8), "swap");
        assert_eq!(Move::Place(63).to_notation(8), "h8");
    }
}

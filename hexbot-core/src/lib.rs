//! Hex bot core - board model and decision engine
//!
//! This crate provides everything a Hex bot process needs:
//! - Board geometry (square board, six-neighbor hex adjacency)
//! - Move notation (`f18` <-> linear cell index)
//! - Legality-checked placement and removal, random move choice
//! - Border-to-border win detection
//! - The line protocol spoken with a match controller

pub mod board;
pub mod config;
pub mod coord;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod win;

// Re-exports for convenient access
pub use board::{Board, Cell, Color, DEFAULT_BOARD_SIZE, DIRECTIONS, MAX_BOARD_SIZE};
pub use config::BotConfig;
pub use coord::{decode, encode, Move};
pub use engine::{HexBot, Placement};
pub use error::HexError;
pub use protocol::{Command, ProtocolError, Reply, Session};
pub use win::{check_win, search, winner, Outcome, SearchReport};

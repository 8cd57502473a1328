//! Bot configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Color, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
use crate::engine::HexBot;
use crate::error::HexError;

/// Settings a bot starts with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Color the bot plays
    pub color: Color,
    /// Side length of the initial board
    pub board_size: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            color: Color::White,
            board_size: DEFAULT_BOARD_SIZE,
            seed: None,
        }
    }
}

impl BotConfig {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: BotConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HexError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(HexError::InvalidSize(self.board_size as i64));
        }
        Ok(())
    }

    /// Build the bot this configuration describes
    pub fn build(&self) -> Result<HexBot, HexError> {
        self.validate()?;
        match self.seed {
            Some(seed) => HexBot::with_seed(self.color, self.board_size, seed),
            None => HexBot::new(self.color, self.board_size),
        }
    }
}

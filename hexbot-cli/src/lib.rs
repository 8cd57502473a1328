//! Match controller side of the Hex bot protocol
//!
//! Bots are driven as child processes through [`bot_link::BotProcess`]:
//! - `conformance`: scripted checks of a single bot's replies
//! - `matchup`: a refereed game between two bots

pub mod bot_link;
pub mod conformance;
pub mod matchup;

pub use bot_link::{BotLink, BotProcess};

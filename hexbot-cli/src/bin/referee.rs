//! Hex referee - checks bots and runs games between them
//!
//! Commands:
//! - conformance: replay scripted protocol checks against one bot
//! - matchup: referee a game between two bots

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexbot_cli::conformance::{self, ConformanceArgs};
use hexbot_cli::matchup::{self, MatchupArgs};

#[derive(Parser)]
#[command(name = "hexbot-referee")]
#[command(version)]
#[command(about = "Check Hex bots against the line protocol and match them up")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every protocol check against one bot
    Conformance(ConformanceArgs),
    /// Referee a game between two bots
    Matchup(MatchupArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Conformance(args) => conformance::run(args),
        Commands::Matchup(args) => matchup::run(args),
    }
}

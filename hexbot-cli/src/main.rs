//! Hex bot CLI - speaks the line protocol on stdin/stdout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: main() - orchestration
//! - Level 2: init_logging(), resolve_config(), serve()
//! - Level 3: config file loading and flag overrides
//! - Level 4: command arguments
//!
//! Protocol replies go to stdout; logs go to stderr so a controller reading
//! our stdout never sees them.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hexbot_core::{BotConfig, Color, Session};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "hexbot")]
#[command(version)]
#[command(about = "Random Hex bot speaking the UAIS line protocol")]
struct Cli {
    /// Color this bot plays: black (top-bottom) or white (left-right)
    color: Option<Color>,

    /// Initial board size (1-26)
    #[arg(long)]
    size: Option<usize>,

    /// Random seed for reproducible play
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tracing::info!(?config, "starting bot");

    serve(&config)
}

// ============================================================================
// LEVEL 2 - STEPS
// ============================================================================

/// Log to stderr, `warn` unless RUST_LOG says otherwise
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line flags
fn resolve_config(cli: &Cli) -> Result<BotConfig> {
    let mut config = match &cli.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };

    if let Some(color) = cli.color {
        config.color = color;
    }
    if let Some(size) = cli.size {
        config.board_size = size;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    config.validate().context("invalid board size")?;
    Ok(config)
}

/// Run the protocol loop until quit or end of input
fn serve(config: &BotConfig) -> Result<()> {
    let bot = config.build()?;
    let mut session = Session::new(bot);

    let stdin = io::stdin();
    let stdout = io::stdout();
    session
        .run(stdin.lock(), stdout.lock())
        .context("protocol I/O failed")?;

    tracing::info!("session ended");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

//! EOS - unified CLI
//!
//! Serves games over HTTP and offers offline tools for rule tables and
//! finished games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use eos::{EosConfig, SessionManager};
use eos_rules::{Layout, MoveLogEntry, RuleTable, Side, Snapshot, Victory, final_score};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::CheckRules { path, layout } => check_rules(&path, layout.as_deref()),
        Command::Score { log, config } => score_game(&log, config.as_deref()),
    }
}

/// Run the HTTP game server
async fn run_server(config: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = EosConfig::resolve(config.as_deref())?.with_overrides(host, port);
    let rules = config.load_rules()?;
    let missing = rules.missing_types();
    if !missing.is_empty() {
        warn!(?missing, "Rule table lacks entries; those types use the fallback");
    }
    let layout = config.load_layout()?;
    let manager = SessionManager::new(rules, &layout, config.scoring().clone())?;

    info!(address = %config.bind_address(), "Starting EOS server");
    eos::serve(&config.bind_address(), manager).await
}

/// Validate a rule table and optional layout
#[instrument]
fn check_rules(path: &Path, layout: Option<&Path>) -> Result<()> {
    let rules = RuleTable::from_file(path)?;
    let missing = rules.missing_types();
    if missing.is_empty() {
        println!("{}: every piece type has an entry", path.display());
    } else {
        let names: Vec<_> = missing.iter().map(|t| t.name()).collect();
        println!(
            "{}: no entry for {} (fallback applies)",
            path.display(),
            names.join(", ")
        );
    }

    if let Some(layout_path) = layout {
        let board = Layout::from_file(layout_path)?.build_board()?;
        println!(
            "{}: {} pieces, {} per side",
            layout_path.display(),
            board.piece_count(),
            board.count(Side::Player1)
        );
        eos_rules::Game::new(std::sync::Arc::new(rules), board)
            .context("Layout does not form a valid starting position")?;
    }
    Ok(())
}

/// Print final scores for a finished game
#[instrument]
fn score_game(path: &Path, config: Option<&Path>) -> Result<()> {
    let config = EosConfig::resolve(config)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let (log, victory): (Vec<MoveLogEntry>, Option<Victory>) =
        if let Ok(snapshot) = serde_json::from_str::<Snapshot>(&content) {
            (snapshot.move_log, snapshot.winner)
        } else if let Ok(log) = serde_json::from_str::<Vec<MoveLogEntry>>(&content) {
            (log, None)
        } else {
            bail!("{} is neither a snapshot nor a move log", path.display());
        };

    match &victory {
        Some(v) => println!("Result: {}", v),
        None => println!("Result: undecided"),
    }
    for side in Side::BOTH {
        let score = final_score(&log, side, victory.as_ref(), config.scoring());
        println!(
            "{}: {} ({} capture points, {} captures, {} win bonus, {:.2} ratio bonus)",
            side,
            score.total,
            score.capture_points,
            score.captures,
            score.win_bonus,
            score.ratio_bonus
        );
    }
    Ok(())
}

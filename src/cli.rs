//! Command-line interface for eos.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EOS - authoritative server for the diagonal-lattice strategy game
#[derive(Parser, Debug)]
#[command(name = "eos")]
#[command(about = "Authoritative EOS game server and rules tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Configuration file (defaults to $EOS_CONFIG, then built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load a rule table (and optionally a layout) and report problems
    CheckRules {
        /// Rule table file (TOML, or JSON by extension)
        path: PathBuf,

        /// Starting layout to validate against the rule table
        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Score a finished game from a snapshot or a move log (JSON)
    Score {
        /// Snapshot or move log file
        log: PathBuf,

        /// Configuration file supplying the scoring table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

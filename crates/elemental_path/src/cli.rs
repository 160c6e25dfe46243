//! Command-line interface for elemental_path.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use elemental_grid::GameMode;

/// Elemental Path - connect two elements across the periodic table
#[derive(Parser, Debug)]
#[command(name = "elemental_path")]
#[command(about = "Periodic-table path puzzle with daily leaderboards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively; each input line is a guess or a `:command`
    Play {
        /// Puzzle mode (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<GameMode>,
    },

    /// Create the database and seed the element catalog
    Seed,

    /// Print the top scores of a day
    Leaderboard {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        day: Option<String>,
    },

    /// Print recently finished puzzles
    History {
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

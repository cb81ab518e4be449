//! Nexus CLI - Command-line interface for running AI-vs-AI tactics matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Nexus - A deterministic two-player grid tactics engine
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single AI-vs-AI match
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: 200)
        #[arg(short, long)]
        turns: Option<u32>,

        /// Board width and height (default: 11)
        #[arg(long)]
        size: Option<u16>,

        /// Rules file (partial JSON merged over the defaults)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the per-event log
        #[arg(short, long)]
        quiet: bool,

        /// Print the final board
        #[arg(short, long)]
        board: bool,
    },

    /// Run many parallel matches and aggregate statistics
    Tournament {
        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per game (default: 200)
        #[arg(short, long)]
        turns: Option<u32>,

        /// Board width and height (default: 11)
        #[arg(long)]
        size: Option<u16>,

        /// Rules file (partial JSON merged over the defaults)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print the unit catalog
    Catalog {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            seed,
            turns,
            size,
            rules,
            format,
            quiet,
            board,
        } => cli::run::execute(seed, turns, size, rules, format, quiet, board),

        Commands::Tournament {
            games,
            seed,
            threads,
            turns,
            size,
            rules,
            format,
            progress,
        } => cli::tournament::execute(games, seed, threads, turns, size, rules, format, progress),

        Commands::Catalog { format } => cli::catalog::execute(format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

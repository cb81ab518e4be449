//! CLI command implementations for Nexus Tactics.

pub(crate) mod catalog;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use nexus_tactics::RulesConfig;
use nexus_tactics::tournament::TournamentError;
use thiserror::Error;

/// Output format for the `run` and `catalog` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that could not be read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A rules file is not valid JSON for `RulesConfig`.
    #[error("invalid rules file {path}: {source}")]
    Rules {
        /// Offending file.
        path: String,
        /// Parse error.
        source: serde_json::Error,
    },
    /// Serializing output failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// A match could not be run.
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Rules from an optional partial JSON file, then flag overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub(crate) fn load_rules(
    path: Option<&Path>,
    turns: Option<u32>,
    size: Option<u16>,
) -> Result<RulesConfig, CliError> {
    let mut rules = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| CliError::Rules {
                path: path.display().to_string(),
                source,
            })?
        }
        None => RulesConfig::default(),
    };
    if let Some(turns) = turns {
        rules.max_turns = turns;
    }
    if let Some(size) = size {
        rules.board_size = size;
    }
    Ok(rules)
}

/// The given seed, or one drawn from the clock.
pub(crate) fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos() & u128::from(u64::MAX)).unwrap_or(42))
            .unwrap_or(42)
    })
}

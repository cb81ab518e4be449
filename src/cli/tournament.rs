//! Tournament command implementation.

use std::path::PathBuf;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use nexus_tactics::AiConfig;
use nexus_tactics::tournament::{MatchConfig, TournamentStats, run_match};
use rayon::prelude::*;
use tracing::warn;

use super::output::{JsonTournamentResult, format_tournament_csv, format_tournament_text};
use super::{CliError, TournamentFormat, load_rules, seed_or_clock};

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the rules cannot be loaded or output fails.
#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    turns: Option<u32>,
    size: Option<u16>,
    rules: Option<PathBuf>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = MatchConfig {
        rules: load_rules(rules.as_deref(), turns, size)?,
        ai: AiConfig::default(),
    };

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::Other(format!("invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each worker accumulates into its own TournamentStats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(TournamentStats::default, |mut local, i| {
            let game_seed = base_seed.wrapping_add(i);
            match run_match(game_seed, &config) {
                Ok(result) => local.add_result(&result),
                Err(err) => {
                    warn!(seed = game_seed, error = %err, "match failed");
                    local.add_error();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(TournamentStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} games/sec)",
                duration.as_secs_f64(),
                games_per_sec
            );
        }
        TournamentFormat::Json => {
            let json = JsonTournamentResult::from_stats(&stats);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats));
        }
    }

    Ok(())
}

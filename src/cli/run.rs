//! Run command implementation.

use std::path::PathBuf;

use nexus_tactics::game::StateObserver;
use nexus_tactics::tournament::{MatchConfig, play_match};
use nexus_tactics::{AiConfig, GameEvent, MatchState};

use super::output::{JsonRunResult, format_event, format_text, render_board};
use super::{CliError, OutputFormat, load_rules, seed_or_clock};

/// Prints every event as it happens.
struct EventPrinter;

impl StateObserver for EventPrinter {
    fn on_event(&mut self, event: &GameEvent, _state: &MatchState) {
        let line = format_event(event);
        if !line.is_empty() {
            println!("{line}");
        }
    }
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the rules cannot be loaded or the game fails to run.
#[allow(clippy::fn_params_excessive_bools)]
pub(crate) fn execute(
    seed: Option<u64>,
    turns: Option<u32>,
    size: Option<u16>,
    rules: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
    board: bool,
) -> Result<(), CliError> {
    let seed = seed_or_clock(seed);
    let config = MatchConfig {
        rules: load_rules(rules.as_deref(), turns, size)?,
        ai: AiConfig::default(),
    };
    let verbose = !quiet && format == OutputFormat::Text;

    if verbose {
        println!("Running match with seed {seed}...");
        println!();
    }

    let observer: Option<Box<dyn StateObserver>> = if verbose {
        Some(Box::new(EventPrinter))
    } else {
        None
    };
    let (result, state) = play_match(seed, &config, observer)?;

    match format {
        OutputFormat::Text => {
            if verbose {
                println!();
            }
            print!("{}", format_text(&result));
            if board {
                println!();
                print!("{}", render_board(&state));
            }
        }
        OutputFormat::Json => {
            let json = JsonRunResult {
                result: &result,
                board: board.then(|| state.snapshot()),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

//! Tournament runner for AI-vs-AI matches.
//!
//! Provides a pure function interface: `(seed, config) -> MatchResult`
//!
//! The runner handles:
//! - Deterministic map generation
//! - Seating two heuristic controllers
//! - Playing the match to its end through the session
//! - Aggregating results across many matches

mod mapgen;

pub use mapgen::{MIN_BOARD_SIZE, MapGenError, generate_layout};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ai::{AiConfig, AiPolicy};
use crate::error::ActionError;
use crate::game::{
    MatchState, Outcome, PLAYERS, PlayerId, RulesConfig, Seat, Session, StateObserver,
};

/// Configuration for one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Rules of the match.
    pub rules: RulesConfig,
    /// Tuning shared by both seats.
    pub ai: AiConfig,
}

/// End-of-match numbers for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    /// Player identifier.
    pub player: PlayerId,
    /// Remaining hp.
    pub hp: i32,
    /// Energy left unspent.
    pub energy: u32,
    /// Units alive at the end.
    pub units: usize,
    /// Nexuses held at the end.
    pub nexuses: usize,
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The seed used for this match.
    pub seed: u64,
    /// How the match ended.
    pub outcome: Outcome,
    /// Turn number the match ended on.
    pub turns: u32,
    /// Per-player numbers in seat order.
    pub players: Vec<PlayerSummary>,
    /// Controller faults caught during the match.
    pub controller_faults: u32,
}

impl MatchResult {
    /// The winner, if the match was not drawn.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self.outcome {
            Outcome::Winner(player) => Some(player),
            Outcome::Draw => None,
        }
    }

    fn from_state(seed: u64, outcome: Outcome, state: &MatchState, controller_faults: u32) -> Self {
        let players = PLAYERS
            .iter()
            .map(|&player| {
                let p = state.player(player);
                PlayerSummary {
                    player,
                    hp: p.hp,
                    energy: p.energy,
                    units: state.units_of(player).count(),
                    nexuses: state.nexus_count(player),
                }
            })
            .collect();
        Self {
            seed,
            outcome,
            turns: state.turn(),
            players,
            controller_faults,
        }
    }
}

/// Error type for tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Map generation failed.
    #[error("map generation failed: {0}")]
    MapGeneration(#[from] MapGenError),
    /// The session refused to start.
    #[error("match could not start: {0}")]
    Start(#[from] ActionError),
    /// Control came back before the match ended.
    #[error("match stopped on turn {0} without a result")]
    Unfinished(u32),
}

/// Run a complete AI-vs-AI match.
///
/// # Determinism
///
/// Given the same seed and configuration, this function always produces the
/// same `MatchResult`.
///
/// # Errors
///
/// Returns an error if map generation fails or the match does not finish.
pub fn run_match(seed: u64, config: &MatchConfig) -> Result<MatchResult, TournamentError> {
    play_match(seed, config, None).map(|(result, _)| result)
}

/// Run a complete AI-vs-AI match, optionally observed, keeping the final
/// state.
///
/// # Errors
///
/// Returns an error if map generation fails or the match does not finish.
pub fn play_match(
    seed: u64,
    config: &MatchConfig,
    observer: Option<Box<dyn StateObserver>>,
) -> Result<(MatchResult, MatchState), TournamentError> {
    let layout = generate_layout(seed, &config.rules)?;
    let state = MatchState::new(layout, config.rules, seed);
    let mut session = Session::new(
        state,
        Seat::Controller(Box::new(AiPolicy::new(config.ai))),
        Seat::Controller(Box::new(AiPolicy::new(config.ai))),
    );
    if let Some(observer) = observer {
        session = session.with_observer(observer);
    }
    session.start()?;

    let faults = session.controller_faults();
    let state = session.into_state();
    let outcome = state.outcome().ok_or(TournamentError::Unfinished(state.turn()))?;
    debug!(seed, ?outcome, turns = state.turn(), "match finished");
    let result = MatchResult::from_state(seed, outcome, &state, faults);
    Ok((result, state))
}

/// Aggregated statistics over many matches.
///
/// Built per worker and merged, so it never needs locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentStats {
    /// Matches played.
    pub games_played: u64,
    /// Wins per seat.
    pub wins: [u64; 2],
    /// Drawn matches.
    pub draws: u64,
    /// Matches that failed to run.
    pub errors: u64,
    /// Controller faults across all matches.
    pub controller_faults: u64,
    total_turns: u64,
    total_hp: [i64; 2],
}

impl TournamentStats {
    /// Add a match result.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns);
        self.controller_faults += u64::from(result.controller_faults);
        match result.winner() {
            Some(player) => self.wins[usize::from(player == 2)] += 1,
            None => self.draws += 1,
        }
        for summary in &result.players {
            self.total_hp[usize::from(summary.player == 2)] += i64::from(summary.hp);
        }
    }

    /// Count a match that failed to run.
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Fold another worker's stats into these.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.errors += other.errors;
        self.controller_faults += other.controller_faults;
        self.total_turns += other.total_turns;
        for seat in 0..2 {
            self.wins[seat] += other.wins[seat];
            self.total_hp[seat] += other.total_hp[seat];
        }
    }

    /// Share of matches a player won (0.0-1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins[usize::from(player == 2)] as f64 / self.games_played as f64
    }

    /// Share of drawn matches (0.0-1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn draw_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.draws as f64 / self.games_played as f64
    }

    /// Average match length in turns.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }

    /// Average hp a player had left.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_hp(&self, player: PlayerId) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_hp[usize::from(player == 2)] as f64 / self.games_played as f64
    }
}

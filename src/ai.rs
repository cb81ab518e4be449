//! Heuristic opponent.
//!
//! The policy plays a whole turn through the public intents, in four ordered
//! phases:
//! 1. Purchase units by value per energy
//! 2. Invoke at most one ability per unit, driven by the catalog's AI hints
//! 3. Attack: enemy heart first, then the best-ranked enemy unit
//! 4. Move the units that did not attack to the best-scoring tile
//!
//! Every phase is a bounded single pass, so a turn always terminates. The
//! policy never advances the turn; the session does.

mod abilities;
mod positioning;
mod purchase;
mod targeting;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AiError;
use crate::game::{MatchState, PlayerId, TurnController, TurnSummary, Unit, UnitId};

/// Tuning knobs for the heuristic policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Maximum purchases attempted per turn.
    pub purchase_cap: u32,
    /// Upper bound of the random score added to each candidate tile.
    pub jitter: f64,
    /// Distance at which enemies trigger guard and evade abilities.
    pub threat_radius: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            purchase_cap: 8,
            jitter: 3.0,
            threat_radius: 3,
        }
    }
}

/// The heuristic turn controller.
#[derive(Debug, Clone, Default)]
pub struct AiPolicy {
    config: AiConfig,
}

impl AiPolicy {
    /// Create a policy with the given tuning.
    #[must_use]
    pub const fn new(config: AiConfig) -> Self {
        Self { config }
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &AiConfig {
        &self.config
    }
}

impl TurnController for AiPolicy {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn take_turn(&mut self, state: &mut MatchState) -> Result<TurnSummary, AiError> {
        let player = state.current_player().ok_or(AiError::NotActive)?;

        let purchases = purchase::buy_units(state, player, &self.config)?;
        let abilities = abilities::use_abilities(state, player, &self.config)?;
        let attackers = targeting::attack_all(state, player)?;
        let moves = positioning::advance_units(state, player, &attackers, &self.config)?;

        let summary = TurnSummary {
            purchases,
            abilities,
            attacks: u32::try_from(attackers.len()).unwrap_or(u32::MAX),
            moves,
        };
        debug!(player, turn = state.turn(), ?summary, "ai turn planned");
        Ok(summary)
    }
}

/// Ids of a player's units at the start of a phase.
fn roster(state: &MatchState, player: PlayerId) -> Vec<UnitId> {
    state.units_of(player).map(|u| u.id).collect()
}

/// A unit of `player` that can still act, if it survived earlier phases.
fn ready_unit(state: &MatchState, id: UnitId) -> Option<&Unit> {
    state.unit(id).filter(|u| u.can_act())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{duel_state, place};
    use crate::game::{Coord, Outcome, Phase, Seat, Session, UnitType};

    #[test]
    fn test_broke_and_empty_does_nothing() {
        let mut state = duel_state();
        state.player_mut(1).energy = 0;
        let mut ai = AiPolicy::default();

        let summary = ai.take_turn(&mut state).unwrap();
        assert_eq!(summary, TurnSummary::default());
        assert_eq!(summary.total(), 0);
        assert!(state.units().is_empty());
        assert_eq!(state.turn(), 1);
    }

    #[test]
    fn test_not_active_after_game_over() {
        let mut state = duel_state();
        state.player_mut(2).hp = 0;
        state.advance_turn().unwrap();
        let mut ai = AiPolicy::default();
        assert_eq!(ai.take_turn(&mut state), Err(AiError::NotActive));
    }

    #[test]
    fn test_ai_turn_buys_and_acts() {
        let mut state = duel_state();
        state.player_mut(1).energy = 10;
        let mut ai = AiPolicy::default();

        let summary = ai.take_turn(&mut state).unwrap();
        assert!(summary.purchases >= 1);
        assert!(state.player(1).energy < 10);
        assert!(state.units_of(1).count() >= 1);
    }

    #[test]
    fn test_ai_strikes_heart_in_range() {
        let mut state = duel_state();
        state.player_mut(1).energy = 0;
        let heart = state.heart_of(2).unwrap().pos;
        let archer = place(&mut state, UnitType::Archer, 1, Coord::new(heart.x + 2, heart.y));
        let mut ai = AiPolicy::default();

        let summary = ai.take_turn(&mut state).unwrap();
        assert!(summary.attacks >= 1);
        assert!(state.player(2).hp < 20);
        assert!(state.unit(archer).is_some());
    }

    #[test]
    fn test_ai_vs_ai_match_terminates() {
        let rules = crate::game::RulesConfig {
            max_turns: 60,
            ..crate::game::RulesConfig::default()
        };
        let state = crate::game::test_support::duel_state_with(rules);
        let mut session = Session::new(
            state,
            Seat::Controller(Box::new(AiPolicy::default())),
            Seat::Controller(Box::new(AiPolicy::default())),
        );
        let phase = session.start().unwrap();
        assert!(matches!(phase, Phase::GameOver { .. }));
        assert_eq!(session.controller_faults(), 0);
        let outcome = session.state().outcome().unwrap();
        assert!(matches!(outcome, Outcome::Winner(_) | Outcome::Draw));
        assert!(crate::game::check_invariants(session.state()).is_empty());
    }
}

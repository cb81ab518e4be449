//! Turn scheduler: the end-of-turn state machine.

use tracing::info;

use crate::error::ActionError;
use crate::game::{
    GameEvent, MatchState, NexusCadence, Outcome, Phase, StatusExpiry, grant_income, opponent,
};

impl MatchState {
    /// End the active player's turn.
    ///
    /// In order: transient modifiers are dropped on every unit and frozen or
    /// invisible statuses cleared (all of them, or only expired ones under
    /// [`StatusExpiry::NextTurn`]),
    /// nexus ownership is refreshed and passive damage ticks (a defeat ends
    /// the game here), control passes to the opponent with the turn number
    /// incremented, the opponent's units get a fresh action budget and the
    /// opponent receives energy income. Reaching the turn limit ends the game
    /// on hp.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::GameOver`] if the game has already ended.
    pub fn advance_turn(&mut self) -> Result<Phase, ActionError> {
        let ending = self.ensure_active()?;
        let turn = self.turn();

        let expiry = self.rules().status_expiry;
        for unit in self.units_mut() {
            unit.clear_transient();
            match expiry {
                StatusExpiry::EveryTurn => unit.clear_statuses(),
                StatusExpiry::NextTurn => unit.expire_statuses(turn),
            }
        }

        self.update_ownership();
        let tick_due = match self.rules().nexus_cadence {
            NexusCadence::PerTurn => true,
            NexusCadence::PerRound => ending == 2,
        };
        let defeat = if tick_due {
            self.apply_periodic_damage()
        } else {
            self.defeat_outcome()
        };
        if let Some(outcome) = defeat {
            self.finish(outcome);
            return Ok(self.phase());
        }

        let next = opponent(ending);
        let next_turn = turn + 1;
        self.set_turn(next_turn);
        if next_turn > self.rules().max_turns {
            let outcome = self.hp_outcome();
            info!(max_turns = self.rules().max_turns, "turn limit reached");
            self.finish(outcome);
            return Ok(self.phase());
        }
        self.set_phase(Phase::PlayerTurn { player: next });

        let budget = self.rules().actions_per_turn;
        for unit in self.units_mut().iter_mut().filter(|u| u.owner == next) {
            unit.actions_left = budget;
        }

        let rules = *self.rules();
        let player = self.player_mut(next);
        grant_income(player, next_turn, &rules);
        let energy = player.energy;

        info!(turn = next_turn, player = next, energy, "turn advanced");
        self.push_event(GameEvent::TurnEnded {
            turn: next_turn,
            next_player: next,
            energy,
        });
        self.push_event(GameEvent::SelectionCleared);
        Ok(self.phase())
    }

    /// Higher hp wins; equal hp is a draw.
    #[must_use]
    pub fn hp_outcome(&self) -> Outcome {
        let (one, two) = (self.player(1).hp, self.player(2).hp);
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Outcome::Winner(1),
            std::cmp::Ordering::Less => Outcome::Winner(2),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

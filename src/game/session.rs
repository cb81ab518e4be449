//! Match session: seats, controller hand-off and event delivery.

use std::fmt;

use tracing::{debug, error};

use crate::error::{ActionError, AiError};
use crate::game::{GameEvent, MatchState, Phase, PlayerId};

/// What a controller did during its turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// Units bought.
    pub purchases: u32,
    /// Abilities invoked.
    pub abilities: u32,
    /// Attacks made.
    pub attacks: u32,
    /// Moves made.
    pub moves: u32,
}

impl TurnSummary {
    /// Total intents applied.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.purchases + self.abilities + self.attacks + self.moves
    }
}

/// Plays a whole turn for one seat through the same intents a human uses.
///
/// Controllers never advance the turn themselves; the session does that after
/// `take_turn` returns, whether it succeeded or not.
pub trait TurnController {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Issue intents for the active player.
    ///
    /// # Errors
    ///
    /// Returns an [`AiError`] on any controller fault. The session logs it and
    /// ends the turn anyway.
    fn take_turn(&mut self, state: &mut MatchState) -> Result<TurnSummary, AiError>;
}

/// Receives every event the engine emits. Purely informational.
///
/// Delivery is batched per step: a human intent's events arrive right after
/// that intent, a turn advance's right after the advance, and a controller's
/// events together once its whole turn has been played. The `state` passed
/// alongside is the state at delivery, so within a controller batch it is
/// the state after the controller's last intent; each event carries the
/// details of its own action.
pub trait StateObserver {
    /// Called once per event, in emission order, after the state changed.
    fn on_event(&mut self, event: &GameEvent, state: &MatchState);
}

/// Who sits in a player's chair.
pub enum Seat {
    /// Intents arrive from outside through [`Session::act`].
    Human,
    /// A controller plays automatically when the seat becomes active.
    Controller(Box<dyn TurnController>),
}

impl fmt::Debug for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Human => f.write_str("Human"),
            Seat::Controller(c) => f.debug_tuple("Controller").field(&c.name()).finish(),
        }
    }
}

/// A running match with its seats and optional observer.
pub struct Session {
    state: MatchState,
    seats: [Seat; 2],
    observer: Option<Box<dyn StateObserver>>,
    controller_faults: u32,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("seats", &self.seats)
            .field("controller_faults", &self.controller_faults)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Seat two players at a match.
    #[must_use]
    pub fn new(state: MatchState, first: Seat, second: Seat) -> Self {
        Self {
            state,
            seats: [first, second],
            observer: None,
            controller_faults: 0,
        }
    }

    /// Attach an observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn StateObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The match state.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// Consume the session, keeping the final state.
    #[must_use]
    pub fn into_state(self) -> MatchState {
        self.state
    }

    /// Controller faults caught so far.
    #[must_use]
    pub const fn controller_faults(&self) -> u32 {
        self.controller_faults
    }

    fn seat(&self, player: PlayerId) -> &Seat {
        &self.seats[usize::from(player == 2)]
    }

    /// Apply a human intent and deliver its events.
    ///
    /// # Errors
    ///
    /// Propagates the intent's [`ActionError`].
    pub fn act<T>(
        &mut self,
        intent: impl FnOnce(&mut MatchState) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        let result = intent(&mut self.state);
        self.flush();
        result
    }

    /// Run controller seats until a human seat is active or the game ends.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::GameOver`] if the game had already ended.
    pub fn start(&mut self) -> Result<Phase, ActionError> {
        self.state.ensure_active()?;
        self.run_controllers();
        Ok(self.state.phase())
    }

    /// End the active turn, then let controller seats play.
    ///
    /// Returns with a human seat active or the game over. Every controller
    /// turn is followed by an advance, so this terminates within the turn
    /// limit.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::GameOver`] if the game had already ended.
    pub fn end_turn(&mut self) -> Result<Phase, ActionError> {
        self.state.advance_turn()?;
        self.flush();
        self.run_controllers();
        Ok(self.state.phase())
    }

    fn run_controllers(&mut self) {
        while let Some(player) = self.state.current_player() {
            let turn = self.state.turn();
            let idx = usize::from(player == 2);
            let Seat::Controller(controller) = &mut self.seats[idx] else {
                break;
            };

            match controller.take_turn(&mut self.state) {
                Ok(summary) => {
                    debug!(player, turn, controller = controller.name(), ?summary, "controller turn");
                }
                Err(err) => {
                    self.controller_faults += 1;
                    error!(player, turn, controller = controller.name(), error = %err, "controller fault");
                }
            }
            // Controller intents are delivered as one batch.
            self.flush();

            if self.state.turn() == turn && self.state.current_player() == Some(player) {
                if self.state.advance_turn().is_err() {
                    break;
                }
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        let events = self.state.drain_events();
        if let Some(observer) = self.observer.as_mut() {
            for event in &events {
                observer.on_event(event, &self.state);
            }
        }
    }

    /// Whether the given player's seat is a controller.
    #[must_use]
    pub fn is_controlled(&self, player: PlayerId) -> bool {
        matches!(self.seat(player), Seat::Controller(_))
    }
}

//! Error types for the tactics engine.
//!
//! Illegal intents never mutate state: every rejection is reported as an
//! [`ActionError`] before anything is applied.

use thiserror::Error;

use crate::game::{Coord, PlayerId, UnitId, UnitType};

/// Why an intent (place, move, attack, ability, build, end turn) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The match has ended; no further mutation is accepted.
    #[error("the game is over")]
    GameOver,
    /// The acting player is not the current player.
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),
    /// No unit with this id is on the board.
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),
    /// The catalog has no archetype for this kind.
    #[error("unit type {0} is not in the catalog")]
    UnknownUnitType(UnitType),
    /// The coordinate lies outside the board.
    #[error("{0} is out of bounds")]
    OutOfBounds(Coord),
    /// The unit has spent its action budget for this turn.
    #[error("unit {0} has no actions left")]
    NoActionsLeft(UnitId),
    /// The unit is frozen and cannot act.
    #[error("unit {0} is frozen")]
    Frozen(UnitId),
    /// The player cannot pay for the purchase.
    #[error("not enough energy: need {need}, have {have}")]
    InsufficientEnergy {
        /// Cost of the purchase.
        need: u32,
        /// Energy currently available.
        have: u32,
    },
    /// The player already fielded this unit type (one-of-each rule).
    #[error("{0} was already purchased")]
    AlreadyPurchased(UnitType),
    /// The tile holds a unit.
    #[error("{0} is occupied")]
    Occupied(Coord),
    /// The tile holds a heart, spawner or nexus marker.
    #[error("{0} is reserved")]
    Reserved(Coord),
    /// The unit's terrain affordances forbid the tile.
    #[error("terrain at {0} is not passable for this unit")]
    TerrainForbidden(Coord),
    /// The tile is not adjacent to a spawner owned by the player.
    #[error("{0} is not adjacent to an owned spawner")]
    NotAdjacentToSpawner(Coord),
    /// The tile is outside the unit's reachable set.
    #[error("{0} is not reachable")]
    Unreachable(Coord),
    /// Nothing attackable is on the tile.
    #[error("no enemy target at {0}")]
    NoTarget(Coord),
    /// The target is beyond the unit's effective range.
    #[error("{0} is out of range")]
    OutOfRange(Coord),
    /// A wall blocks the straight line to the target.
    #[error("a wall blocks the line to {0}")]
    LineBlocked(Coord),
    /// The tile is not orthogonally adjacent to the acting unit.
    #[error("{0} is not adjacent")]
    NotAdjacent(Coord),
    /// The unit cannot construct or demolish terrain.
    #[error("unit {0} is not a builder")]
    NotABuilder(UnitId),
    /// The archetype has no ability at this index.
    #[error("unit {unit} has no ability #{index}")]
    UnknownAbility {
        /// Acting unit.
        unit: UnitId,
        /// Requested ability index.
        index: usize,
    },
    /// The ability is passive and cannot be invoked.
    #[error("ability #{index} of unit {unit} is passive")]
    PassiveAbility {
        /// Acting unit.
        unit: UnitId,
        /// Requested ability index.
        index: usize,
    },
}

/// A fault raised by an ability effect.
///
/// The engine catches these at the invocation site; the unit still spends its
/// action and the ability is reported as having had no effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbilityError {
    /// The effect found nothing to act on.
    #[error("no valid target")]
    NoTarget,
    /// The effect's precondition does not hold (already shielded, etc).
    #[error("{0}")]
    Unavailable(&'static str),
    /// The acting unit disappeared while the effect ran.
    #[error("acting unit is gone")]
    ActorMissing,
    /// Any other failure inside the effect.
    #[error("ability failed: {0}")]
    Failed(String),
}

/// A fault raised by a turn controller (the AI policy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    /// The controller was invoked while another player is active.
    #[error("controller invoked out of turn")]
    NotActive,
    /// An intent the controller expected to be legal was rejected.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// Any other controller failure.
    #[error("controller failure: {0}")]
    Internal(String),
}

//! Events emitted by the engine for renderers and logs.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, Outcome, PlayerId, Terrain, UnitId, UnitType};

/// What an attack struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackTarget {
    /// An enemy unit.
    Unit {
        /// Target id.
        id: UnitId,
        /// Target kind.
        unit_type: UnitType,
    },
    /// An enemy heart.
    Heart {
        /// Heart owner.
        owner: PlayerId,
    },
}

/// A state change worth telling an observer about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A unit entered the board.
    Placed {
        /// New unit.
        unit: UnitId,
        /// Its kind.
        unit_type: UnitType,
        /// Its owner.
        owner: PlayerId,
        /// Where it was placed.
        at: Coord,
    },
    /// A unit moved.
    Moved {
        /// Moving unit.
        unit: UnitId,
        /// Start tile.
        from: Coord,
        /// End tile.
        to: Coord,
    },
    /// An attack resolved.
    Attacked {
        /// Attacking unit.
        attacker: UnitId,
        /// What was struck.
        target: AttackTarget,
        /// Damage actually dealt.
        damage: u32,
        /// Whether the target unit died.
        killed: bool,
    },
    /// An active ability was invoked.
    AbilityUsed {
        /// Acting unit.
        unit: UnitId,
        /// Ability name.
        ability: String,
        /// Whether the effect completed.
        applied: bool,
        /// Outcome text.
        message: String,
    },
    /// A tile's terrain changed.
    TerrainChanged {
        /// Tile.
        at: Coord,
        /// New terrain.
        terrain: Terrain,
    },
    /// A nexus changed hands.
    NexusCaptured {
        /// Nexus tile.
        at: Coord,
        /// New owner.
        owner: PlayerId,
    },
    /// Owned nexuses damaged a player.
    NexusDamage {
        /// Damaged player.
        player: PlayerId,
        /// Damage taken.
        amount: u32,
        /// Remaining hp.
        hp: i32,
    },
    /// Control passed to the next player.
    TurnEnded {
        /// New turn number.
        turn: u32,
        /// Player now to act.
        next_player: PlayerId,
        /// That player's energy after income.
        energy: u32,
    },
    /// Any UI selection should be dropped.
    SelectionCleared,
    /// The match ended.
    GameOver {
        /// Result.
        outcome: Outcome,
    },
}

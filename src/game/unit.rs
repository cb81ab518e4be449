//! Unit instances on the board.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Archetype, Coord, PlayerId, UnitType};

/// Unique identifier for a unit, never reused within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit on the board.
///
/// Transient modifiers (`temp_attack`, `range_boost`, `temp_move`) are cleared
/// at the end of every turn. `frozen_until` and `invisible_until` hold the last
/// turn number in which the status applies; under the default
/// [`StatusExpiry::EveryTurn`](crate::game::StatusExpiry) rule both are
/// cleared at the next turn advance anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique id.
    pub id: UnitId,
    /// Catalog key.
    pub kind: UnitType,
    /// Owning player.
    pub owner: PlayerId,
    /// Current position.
    pub pos: Coord,
    /// Current hit points. A unit at 0 is removed immediately.
    pub hp: u32,
    /// Archetype maximum hit points.
    pub max_hp: u32,
    /// Base attack.
    pub attack: u32,
    /// Base attack range (Manhattan).
    pub range: u32,
    /// Base movement budget in steps.
    pub movement: u32,

    /// Attack bonus for this turn.
    pub temp_attack: u32,
    /// Range bonus for this turn.
    pub range_boost: u32,
    /// Movement bonus for this turn.
    pub temp_move: u32,

    /// Frozen through this turn number.
    pub frozen_until: Option<u32>,
    /// Absorbs the next hit completely.
    pub shielded: bool,
    /// Untargetable through this turn number.
    pub invisible_until: Option<u32>,
    /// Damage reduction from terrain.
    pub defense_bonus: u32,

    /// Next attack kills a target at or below this hp.
    pub execute_below: Option<u32>,
    /// Next attack deals double damage.
    pub double_damage: bool,
    /// Next attack freezes its target.
    pub freeze_next: bool,

    /// Actions remaining this turn.
    pub actions_left: u32,
}

impl Unit {
    /// Create a fresh unit from its archetype.
    #[must_use]
    pub fn new(id: UnitId, archetype: &Archetype, owner: PlayerId, pos: Coord, actions: u32) -> Self {
        let stats = archetype.stats;
        Self {
            id,
            kind: archetype.kind,
            owner,
            pos,
            hp: stats.hp,
            max_hp: stats.hp,
            attack: stats.attack,
            range: stats.range,
            movement: stats.movement,
            temp_attack: 0,
            range_boost: 0,
            temp_move: 0,
            frozen_until: None,
            shielded: false,
            invisible_until: None,
            defense_bonus: 0,
            execute_below: None,
            double_damage: false,
            freeze_next: false,
            actions_left: actions,
        }
    }

    /// Attack including this turn's bonus.
    #[must_use]
    pub const fn effective_attack(&self) -> u32 {
        self.attack + self.temp_attack
    }

    /// Range including this turn's bonus.
    #[must_use]
    pub const fn effective_range(&self) -> u32 {
        self.range + self.range_boost
    }

    /// Movement budget including this turn's bonus.
    #[must_use]
    pub const fn effective_movement(&self) -> u32 {
        self.movement + self.temp_move
    }

    /// Whether the unit is currently frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen_until.is_some()
    }

    /// Whether the unit is currently invisible.
    #[must_use]
    pub const fn is_invisible(&self) -> bool {
        self.invisible_until.is_some()
    }

    /// Whether the unit can still take an action.
    #[must_use]
    pub const fn can_act(&self) -> bool {
        self.actions_left > 0 && !self.is_frozen()
    }

    /// Whether the unit is missing hit points.
    #[must_use]
    pub const fn is_wounded(&self) -> bool {
        self.hp < self.max_hp
    }

    /// Drop this turn's modifiers.
    pub fn clear_transient(&mut self) {
        self.temp_attack = 0;
        self.range_boost = 0;
        self.temp_move = 0;
    }

    /// Drop frozen and invisible regardless of their remaining turns.
    pub fn clear_statuses(&mut self) {
        self.frozen_until = None;
        self.invisible_until = None;
    }

    /// Drop statuses whose last turn is `turn` or earlier.
    pub fn expire_statuses(&mut self, turn: u32) {
        if self.frozen_until.is_some_and(|until| until <= turn) {
            self.frozen_until = None;
        }
        if self.invisible_until.is_some_and(|until| until <= turn) {
            self.invisible_until = None;
        }
    }
}

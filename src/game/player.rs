//! Player account state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::UnitType;

/// Unique identifier for a player. Players are numbered 1 and 2.
pub type PlayerId = u8;

/// Both seats, in turn order.
pub const PLAYERS: [PlayerId; 2] = [1, 2];

/// The other player.
#[must_use]
pub const fn opponent(id: PlayerId) -> PlayerId {
    if id == 1 { 2 } else { 1 }
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Hit points; the heart is an alias for this value. At or below zero the
    /// player is defeated.
    pub hp: i32,
    /// Spendable energy, never above the configured cap.
    pub energy: u32,
    /// Unit kinds already fielded this match.
    pub purchased: BTreeSet<UnitType>,
}

impl Player {
    /// Create a new player with starting hp and energy.
    #[must_use]
    pub fn new(id: PlayerId, hp: i32, energy: u32) -> Self {
        Self {
            id,
            hp,
            energy,
            purchased: BTreeSet::new(),
        }
    }

    /// Whether the player has been defeated.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Check if this player already fielded the given kind.
    #[must_use]
    pub fn has_purchased(&self, kind: UnitType) -> bool {
        self.purchased.contains(&kind)
    }

    /// Apply damage to the player's hp.
    pub fn take_damage(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_sub(amount);
    }
}

//! Match invariants: sanity checks that detect engine bugs.
//!
//! Every intent, whether legal or rejected, must leave a state for which
//! [`check_invariants`] returns nothing. The fuzz targets and property tests
//! call it after each step.

use std::collections::HashSet;

use crate::game::{Marker, MatchState, Terrain, terrain_allows};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all match invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &MatchState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });
    let board = state.board();
    let rules = state.rules();

    // Markers never sit on walls
    for (coord, cell) in board.iter() {
        if cell.marker.is_some() && cell.terrain == Terrain::Wall {
            push(format!("Marked cell {coord} is a wall"));
        }
    }

    for nexus in state.nexuses() {
        if board.marker(nexus.pos) != Some(Marker::Nexus) {
            push(format!("Nexus at {} has no nexus marker", nexus.pos));
        }
    }

    let mut ids = HashSet::new();
    let mut tiles = HashSet::new();
    for unit in state.units() {
        if !ids.insert(unit.id) {
            push(format!("Duplicate unit id {}", unit.id));
        }
        if !tiles.insert(unit.pos) {
            push(format!("Two units share {}", unit.pos));
        }
        if unit.hp == 0 || unit.hp > unit.max_hp {
            push(format!(
                "Unit {} has hp {} outside 1..={}",
                unit.id, unit.hp, unit.max_hp
            ));
        }
        if unit.actions_left > rules.actions_per_turn {
            push(format!(
                "Unit {} has {} actions > budget {}",
                unit.id, unit.actions_left, rules.actions_per_turn
            ));
        }
        match board.get(unit.pos) {
            None => push(format!("Unit {} is off the board at {}", unit.id, unit.pos)),
            Some(cell) => {
                if matches!(cell.marker, Some(Marker::Heart(_))) {
                    push(format!("Unit {} stands on a heart at {}", unit.id, unit.pos));
                }
                if !terrain_allows(state.traits_of(unit.kind), cell.terrain) {
                    push(format!(
                        "Unit {} ({}) stands on forbidden {:?} at {}",
                        unit.id, unit.kind, cell.terrain, unit.pos
                    ));
                }
            }
        }
    }

    for player in state.players() {
        if player.energy > rules.energy_cap {
            push(format!(
                "Player {} energy {} exceeds cap {}",
                player.id, player.energy, rules.energy_cap
            ));
        }
    }

    if !state.is_over() && state.defeat_outcome().is_some() {
        push("Game continues with a defeated player".to_string());
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchState) {}
